use super::error::OAuthError;
use crate::{auth::config::IntercomConfig, error::AppError};
use async_trait::async_trait;
use oauth2::{AccessToken, AuthorizationCode, ClientId, ClientSecret, CsrfToken};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Profile document returned by the provider, passed through untouched
pub type Profile = Value;

/// Outbound side of the OAuth handshake
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser for consent. Pure, no I/O.
    fn authorization_url(&self, state: &CsrfToken) -> Url;

    /// Trade an authorization code for an access token. Single attempt.
    async fn exchange_code_for_token(
        &self,
        code: &AuthorizationCode,
    ) -> Result<AccessToken, OAuthError>;

    /// Fetch the profile of the token's owner. Single attempt.
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, OAuthError>;
}

#[derive(Serialize)]
struct TokenRequestBody<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenEndpointResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// reqwest-backed Intercom client
pub struct IntercomClient {
    client_id: ClientId,
    client_secret: ClientSecret,
    authorize_url: Url,
    token_url: Url,
    me_url: Url,
    http_client: Client,
}

fn parse_endpoint(name: &str, value: &str) -> Result<Url, AppError> {
    Url::parse(value).map_err(|e| {
        AppError::Config(config::ConfigError::Message(format!(
            "Invalid {name} URL '{value}': {e}"
        )))
    })
}

impl IntercomClient {
    pub fn new(config: &IntercomConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            // Following redirects opens the client up to SSRF vulnerabilities.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Internal(format!("reqwest build error: {e}")))?;

        Ok(Self {
            client_id: ClientId::new(config.client_id.clone()),
            client_secret: ClientSecret::new(config.client_secret.clone()),
            authorize_url: parse_endpoint("authorization", &config.authorize_url)?,
            token_url: parse_endpoint("token", &config.token_url)?,
            me_url: parse_endpoint("profile", &config.me_url)?,
            http_client,
        })
    }
}

#[async_trait]
impl IdentityProvider for IntercomClient {
    fn authorization_url(&self, state: &CsrfToken) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("state", state.secret());
        url
    }

    async fn exchange_code_for_token(
        &self,
        code: &AuthorizationCode,
    ) -> Result<AccessToken, OAuthError> {
        let body = TokenRequestBody {
            code: code.secret(),
            client_id: self.client_id.as_str(),
            client_secret: self.client_secret.secret(),
        };

        let response = self
            .http_client
            .post(self.token_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| OAuthError::Transport {
                endpoint: "token",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %detail, "token endpoint rejected the code");
            return Err(OAuthError::TokenExchange { status });
        }

        let token: TokenEndpointResponse =
            response
                .json()
                .await
                .map_err(|source| OAuthError::Transport {
                    endpoint: "token",
                    source,
                })?;

        token
            .access_token
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
            .ok_or(OAuthError::MissingAccessToken)
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Profile, OAuthError> {
        let response = self
            .http_client
            .get(self.me_url.clone())
            .bearer_auth(token.secret())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| OAuthError::Transport {
                endpoint: "profile",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthError::ProviderApi { status });
        }

        response.json().await.map_err(|source| OAuthError::Transport {
            endpoint: "profile",
            source,
        })
    }
}
