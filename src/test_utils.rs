use crate::{
    auth::oauth::{IdentityProvider, OAuthError, Profile},
    config::Config,
    server::Server,
};
use async_trait::async_trait;
use oauth2::{AccessToken, AuthorizationCode, CsrfToken};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::{Arc, Mutex};
use url::Url;

/// In-process identity provider with canned answers that records what it was asked
pub struct StubProvider {
    token: Result<String, StatusCode>,
    profile: Result<Profile, StatusCode>,
    exchanged_codes: Mutex<Vec<String>>,
    profile_requests: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            token: Ok("stub-access-token".to_string()),
            profile: Ok(json!({ "type": "admin", "id": "1", "name": "Stub Admin" })),
            exchanged_codes: Mutex::new(Vec::new()),
            profile_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Ok(token.to_string());
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Ok(profile);
        self
    }

    pub fn failing_exchange(mut self, status: StatusCode) -> Self {
        self.token = Err(status);
        self
    }

    pub fn failing_profile(mut self, status: StatusCode) -> Self {
        self.profile = Err(status);
        self
    }

    /// Codes passed to the token exchange, in call order
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes.lock().unwrap().clone()
    }

    /// Tokens used for profile fetches, in call order
    pub fn profile_requests(&self) -> Vec<String> {
        self.profile_requests.lock().unwrap().clone()
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorization_url(&self, state: &CsrfToken) -> Url {
        Url::parse_with_params(
            "https://provider.test/oauth",
            &[("client_id", "test-client-id"), ("state", state.secret())],
        )
        .unwrap()
    }

    async fn exchange_code_for_token(
        &self,
        code: &AuthorizationCode,
    ) -> Result<AccessToken, OAuthError> {
        self.exchanged_codes
            .lock()
            .unwrap()
            .push(code.secret().clone());
        match &self.token {
            Ok(token) => Ok(AccessToken::new(token.clone())),
            Err(status) => Err(OAuthError::TokenExchange { status: *status }),
        }
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, OAuthError> {
        self.profile_requests
            .lock()
            .unwrap()
            .push(token.secret().clone());
        match &self.profile {
            Ok(profile) => Ok(profile.clone()),
            Err(status) => Err(OAuthError::ProviderApi { status: *status }),
        }
    }
}

/// Test server builder wiring a [`StubProvider`] in place of Intercom
pub struct TestServerBuilder {
    config: Config,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Self::test_config(),
            provider: None,
        }
    }

    /// Default configuration with dummy Intercom credentials
    pub fn test_config() -> Config {
        let mut config = Config::default();
        config.intercom.client_id = "test-client-id".to_string();
        config.intercom.client_secret = "test-client-secret".to_string();
        config
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub async fn build(self) -> Server {
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(StubProvider::new()));
        Server::with_provider(self.config, provider).await
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
