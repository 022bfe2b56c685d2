use crate::{
    auth::{
        config::{IntercomConfig, SiteConfig},
        cookies::CookieStore,
        oauth::{
            flows::{CallbackOutcome, CallbackParams, OAuthFlows, SessionLookup},
            health::OAuthHealthChecker,
            provider::{IdentityProvider, IntercomClient},
        },
    },
    config::Config,
    error::AppError,
};
use std::sync::Arc;
use url::Url;

pub struct OAuthService {
    intercom: IntercomConfig,
    flows: OAuthFlows,
}

impl OAuthService {
    /// Service talking to the Intercom endpoints named in the configuration
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let provider: Arc<dyn IdentityProvider> = Arc::new(IntercomClient::new(&config.intercom)?);
        Ok(Self::with_provider(config, provider))
    }

    /// Service backed by an arbitrary provider implementation
    pub fn with_provider(config: &Config, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            intercom: config.intercom.clone(),
            flows: OAuthFlows::new(provider, config.site.clone()),
        }
    }

    pub fn site(&self) -> &SiteConfig {
        self.flows.site()
    }

    pub fn begin_login(&self, cookies: &mut dyn CookieStore) -> Url {
        self.flows.begin_login(cookies)
    }

    pub async fn complete_callback(
        &self,
        cookies: &mut dyn CookieStore,
        params: CallbackParams,
    ) -> CallbackOutcome {
        self.flows.complete_callback(cookies, params).await
    }

    pub async fn current_profile(&self, cookies: &mut dyn CookieStore) -> SessionLookup {
        self.flows.current_profile(cookies).await
    }

    pub fn logout(&self, cookies: &mut dyn CookieStore) -> String {
        self.flows.logout(cookies)
    }

    /// Create a health checker for this OAuth service
    pub fn health_checker(&self) -> Arc<OAuthHealthChecker> {
        Arc::new(OAuthHealthChecker::new(self.intercom.clone()))
    }
}
