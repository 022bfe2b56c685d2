//! OAuth 2.0 authorization-code login against Intercom.
//!
//! `provider` talks to Intercom, `flows` drives the login / callback / session /
//! logout sequence over an injected cookie store, and `service` wires the two
//! together from configuration.

pub mod error;
pub mod flows;
pub mod health;
pub mod provider;
pub mod service;
pub mod state;

pub use error::OAuthError;
pub use flows::{CallbackOutcome, CallbackParams, OAuthFlows, SessionLookup};
pub use health::OAuthHealthChecker;
pub use provider::{IdentityProvider, IntercomClient, Profile};
pub use service::OAuthService;
pub use state::OAUTH_STATE_TTL_SECONDS;
