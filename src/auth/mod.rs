pub mod config;
pub mod cookies;
pub mod oauth;

pub use config::{IntercomConfig, SiteConfig};
pub use cookies::{CookieStore, MemoryCookies, OAUTH_STATE_COOKIE, SESSION_COOKIE};
pub use oauth::*;
