use crate::{
    auth::config::IntercomConfig,
    health::{HealthCheckResult, HealthChecker},
};

/// Health checker implementation for OAuth service
pub struct OAuthHealthChecker {
    config: IntercomConfig,
}

impl OAuthHealthChecker {
    pub fn new(config: IntercomConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl HealthChecker for OAuthHealthChecker {
    fn name(&self) -> &str {
        "oauth"
    }

    async fn check(&self) -> HealthCheckResult {
        let details = serde_json::json!({
            "provider": "intercom",
            "client_id_configured": !self.config.client_id.is_empty(),
            "client_secret_configured": !self.config.client_secret.is_empty(),
        });

        if self.config.has_credentials() {
            HealthCheckResult::healthy_with_details(details)
        } else {
            HealthCheckResult::degraded_with_details(
                "Intercom OAuth credentials are not configured".to_string(),
                details,
            )
        }
    }

    fn info(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "provider": "intercom",
            "authorize_url": self.config.authorize_url,
            "token_url": self.config.token_url,
            "me_url": self.config.me_url,
        }))
    }
}
