//! Cookie access for the OAuth flows.
//!
//! The flows only see the [`CookieStore`] trait. Handlers pass in the request's
//! [`CookieJar`], which turns every change into a `Set-Cookie` header on the
//! response; tests use [`MemoryCookies`]. A removal always produces an expired
//! `Set-Cookie`, whether or not the request carried the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use time::Duration;

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
pub const SESSION_COOKIE: &str = "session_token";

/// Key-value view over the user agent's cookies
///
/// `Send` because the flows hold `&mut dyn CookieStore` across `.await`.
pub trait CookieStore: Send {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, cookie: Cookie<'static>);
    fn remove(&mut self, name: &str);
}

/// HttpOnly, `SameSite=Lax`, `Path=/` cookie, `Secure` when requested
pub fn build_cookie(name: &str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Same as [`build_cookie`] with a `Max-Age`
pub fn build_expiring_cookie(
    name: &str,
    value: String,
    secure: bool,
    max_age_seconds: i64,
) -> Cookie<'static> {
    let mut cookie = build_cookie(name, value, secure);
    cookie.set_max_age(Duration::seconds(max_age_seconds));
    cookie
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        // Removal cookies stay in the jar with an empty value
        CookieJar::get(self, name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn set(&mut self, cookie: Cookie<'static>) {
        *self = std::mem::take(self).add(cookie);
    }

    fn remove(&mut self, name: &str) {
        // Path must match the one the cookie was set with. `CookieJar::remove`
        // stays silent for cookies the request did not carry, so add the
        // expired cookie directly.
        let mut removal = Cookie::build((name.to_string(), "")).path("/").build();
        removal.make_removal();
        *self = std::mem::take(self).add(removal);
    }
}

/// In-process cookie store that records every mutation
#[derive(Debug, Default, Clone)]
pub struct MemoryCookies {
    cookies: HashMap<String, Cookie<'static>>,
    removed: Vec<String>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.cookies
            .insert(name.to_string(), Cookie::new(name.to_string(), value.to_string()));
        self
    }

    /// Full cookie, including attributes, as last set
    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.get(name)
    }

    pub fn was_removed(&self, name: &str) -> bool {
        self.removed.iter().any(|removed| removed == name)
    }
}

impl CookieStore for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).map(|cookie| cookie.value().to_string())
    }

    fn set(&mut self, cookie: Cookie<'static>) {
        self.removed.retain(|removed| removed != cookie.name());
        self.cookies.insert(cookie.name().to_string(), cookie);
    }

    fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
        self.removed.push(name.to_string());
    }
}
