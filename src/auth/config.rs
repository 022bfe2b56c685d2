use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTHORIZE_URL: &str = "https://app.intercom.com/oauth";
pub const DEFAULT_TOKEN_URL: &str = "https://api.intercom.io/auth/eagle/token";
pub const DEFAULT_ME_URL: &str = "https://api.intercom.io/me";

/// Intercom app credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntercomConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_me_url")]
    pub me_url: String,
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_me_url() -> String {
    DEFAULT_ME_URL.to_string()
}

impl Default for IntercomConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            me_url: default_me_url(),
        }
    }
}

impl IntercomConfig {
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Where the browser lands after the OAuth handshake, and how cookies are flagged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
    /// Marks cookies `Secure`
    #[serde(default)]
    pub production: bool,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dashboard_path: default_dashboard_path(),
            production: false,
        }
    }
}

impl SiteConfig {
    /// Base URL without a trailing slash
    pub fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn dashboard_url(&self) -> String {
        let path = self.dashboard_path.trim_start_matches('/');
        format!("{}/{}", self.root(), path)
    }

    /// Root URL carrying a percent-encoded `error` query parameter
    pub fn error_url(&self, message: &str) -> String {
        format!("{}?error={}", self.root(), urlencoding::encode(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intercom_defaults() {
        let config = IntercomConfig::default();
        assert_eq!(config.authorize_url, "https://app.intercom.com/oauth");
        assert_eq!(config.token_url, "https://api.intercom.io/auth/eagle/token");
        assert_eq!(config.me_url, "https://api.intercom.io/me");
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_site_urls() {
        let site = SiteConfig::default();
        assert_eq!(site.dashboard_url(), "http://localhost:3000/dashboard");
        assert_eq!(
            site.error_url("Invalid state parameter"),
            "http://localhost:3000?error=Invalid%20state%20parameter"
        );
    }

    #[test]
    fn test_site_urls_trailing_slash() {
        let site = SiteConfig {
            base_url: "https://demo.example.com/".to_string(),
            dashboard_path: "dashboard".to_string(),
            production: true,
        };
        assert_eq!(site.root(), "https://demo.example.com");
        assert_eq!(site.dashboard_url(), "https://demo.example.com/dashboard");
    }
}
