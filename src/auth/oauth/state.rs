use oauth2::CsrfToken;
use uuid::Uuid;

/// CSRF state cookie lifetime (10 minutes)
pub const OAUTH_STATE_TTL_SECONDS: i64 = 600;

/// Fresh single-use CSRF state for one login attempt
pub fn new_state() -> CsrfToken {
    CsrfToken::new(Uuid::new_v4().to_string())
}

/// Byte-for-byte comparison of the stored and returned state
pub fn state_matches(stored: Option<&str>, returned: Option<&str>) -> bool {
    match (stored, returned) {
        (Some(stored), Some(returned)) => !stored.is_empty() && stored == returned,
        _ => false,
    }
}
