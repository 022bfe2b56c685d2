use super::{
    error::OAuthError,
    provider::{IdentityProvider, Profile},
    state::{OAUTH_STATE_TTL_SECONDS, new_state, state_matches},
};
use crate::{
    auth::{
        config::SiteConfig,
        cookies::{
            CookieStore, OAUTH_STATE_COOKIE, SESSION_COOKIE, build_cookie, build_expiring_cookie,
        },
    },
    metrics::track_oauth_operation,
};
use oauth2::{AccessToken, AuthorizationCode};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub const INVALID_STATE_MESSAGE: &str = "Invalid state parameter";
pub const MISSING_CODE_MESSAGE: &str = "No authorization code received";
pub const EXCHANGE_FAILED_MESSAGE: &str = "Failed to exchange authorization code";

/// Query string the provider sends back to the callback
#[derive(Debug, Default, Clone)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Lenient parse of the raw query: the first occurrence of a key wins and
    /// malformed escapes are kept as-is, so the callback always runs to a redirect
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Result of one callback request
#[derive(Debug)]
pub enum CallbackOutcome {
    Authenticated,
    InvalidState,
    MissingCode,
    ExchangeFailed(OAuthError),
}

impl CallbackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallbackOutcome::Authenticated)
    }

    /// Human-readable message carried on the failure redirect
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            CallbackOutcome::Authenticated => None,
            CallbackOutcome::InvalidState => Some(INVALID_STATE_MESSAGE),
            CallbackOutcome::MissingCode => Some(MISSING_CODE_MESSAGE),
            CallbackOutcome::ExchangeFailed(_) => Some(EXCHANGE_FAILED_MESSAGE),
        }
    }

    /// Where the user agent goes next
    pub fn redirect_location(&self, site: &SiteConfig) -> String {
        match self.error_message() {
            None => site.dashboard_url(),
            Some(message) => site.error_url(message),
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            CallbackOutcome::Authenticated => "success",
            CallbackOutcome::InvalidState => "invalid_state",
            CallbackOutcome::MissingCode => "missing_code",
            CallbackOutcome::ExchangeFailed(_) => "exchange_failed",
        }
    }
}

/// Result of resolving the session cookie to a profile
#[derive(Debug)]
pub enum SessionLookup {
    Active(Profile),
    /// No session cookie; nothing was sent upstream
    Missing,
    /// Provider rejected the token; the cookie has been deleted
    Revoked(OAuthError),
}

/// OAuth flow handlers
pub struct OAuthFlows {
    provider: Arc<dyn IdentityProvider>,
    site: SiteConfig,
}

impl OAuthFlows {
    pub fn new(provider: Arc<dyn IdentityProvider>, site: SiteConfig) -> Self {
        Self { provider, site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Store a fresh CSRF state and return the provider URL to redirect to
    pub fn begin_login(&self, cookies: &mut dyn CookieStore) -> Url {
        let state = new_state();
        cookies.set(build_expiring_cookie(
            OAUTH_STATE_COOKIE,
            state.secret().clone(),
            self.site.production,
            OAUTH_STATE_TTL_SECONDS,
        ));

        track_oauth_operation("login", "redirect");
        self.provider.authorization_url(&state)
    }

    /// Validate the returned state, exchange the code, and open the session
    pub async fn complete_callback(
        &self,
        cookies: &mut dyn CookieStore,
        params: CallbackParams,
    ) -> CallbackOutcome {
        let outcome = self.run_callback(cookies, params).await;

        match &outcome {
            CallbackOutcome::Authenticated => info!("OAuth login completed"),
            CallbackOutcome::ExchangeFailed(e) => warn!("OAuth token exchange failed: {}", e),
            other => warn!("OAuth callback rejected: {:?}", other),
        }
        track_oauth_operation("callback", outcome.metric_label());

        outcome
    }

    async fn run_callback(
        &self,
        cookies: &mut dyn CookieStore,
        params: CallbackParams,
    ) -> CallbackOutcome {
        // Single use: the stored state goes away whatever happens next
        let stored_state = cookies.get(OAUTH_STATE_COOKIE);
        cookies.remove(OAUTH_STATE_COOKIE);

        if !state_matches(stored_state.as_deref(), params.state.as_deref()) {
            return CallbackOutcome::InvalidState;
        }

        let Some(code) = params.code.filter(|code| !code.is_empty()) else {
            if let Some(error) = params.error.as_deref() {
                warn!(
                    error,
                    description = params.error_description.as_deref().unwrap_or_default(),
                    "provider returned an error instead of a code"
                );
            }
            return CallbackOutcome::MissingCode;
        };

        match self
            .provider
            .exchange_code_for_token(&AuthorizationCode::new(code))
            .await
        {
            Ok(token) => {
                cookies.set(build_cookie(
                    SESSION_COOKIE,
                    token.secret().clone(),
                    self.site.production,
                ));
                CallbackOutcome::Authenticated
            }
            Err(e) => CallbackOutcome::ExchangeFailed(e),
        }
    }

    /// Resolve the session cookie to the provider profile
    pub async fn current_profile(&self, cookies: &mut dyn CookieStore) -> SessionLookup {
        let Some(token) = cookies.get(SESSION_COOKIE).filter(|token| !token.is_empty()) else {
            debug!("no session cookie present");
            return SessionLookup::Missing;
        };

        match self
            .provider
            .fetch_profile(&AccessToken::new(token))
            .await
        {
            Ok(profile) => {
                track_oauth_operation("profile", "success");
                SessionLookup::Active(profile)
            }
            Err(e) => {
                warn!("Profile fetch failed, dropping session: {}", e);
                cookies.remove(SESSION_COOKIE);
                track_oauth_operation("profile", "revoked");
                SessionLookup::Revoked(e)
            }
        }
    }

    /// Drop the session cookie and return the post-logout destination
    pub fn logout(&self, cookies: &mut dyn CookieStore) -> String {
        cookies.remove(SESSION_COOKIE);
        track_oauth_operation("logout", "success");
        self.site.root().to_string()
    }
}
