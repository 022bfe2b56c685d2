use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the OAuth handshake and of calls made with the resulting token
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Invalid state parameter")]
    InvalidState,
    #[error("No authorization code received")]
    MissingCode,
    #[error("Token exchange failed: {status}")]
    TokenExchange { status: StatusCode },
    #[error("Intercom API error: {status}")]
    ProviderApi { status: StatusCode },
    #[error("Token endpoint response did not contain an access token")]
    MissingAccessToken,
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl OAuthError {
    /// Upstream HTTP status, when the provider answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            OAuthError::TokenExchange { status } | OAuthError::ProviderApi { status } => {
                Some(*status)
            }
            OAuthError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }
}
