use crate::{
    auth::oauth::{CallbackParams, SessionLookup},
    server::Server,
};
use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

pub fn create_auth_routes() -> Router<Server> {
    Router::new()
        .route("/login", get(login_handler))
        .route("/callback", get(callback_handler))
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler))
}

/// GET /login: store the CSRF state and send the browser to Intercom
pub async fn login_handler(
    State(server): State<Server>,
    mut jar: CookieJar,
) -> (CookieJar, Redirect) {
    let authorization_url = server.oauth_service.begin_login(&mut jar);
    (jar, Redirect::temporary(authorization_url.as_str()))
}

/// GET /callback?code=..&state=..
pub async fn callback_handler(
    State(server): State<Server>,
    mut jar: CookieJar,
    RawQuery(query): RawQuery,
) -> (CookieJar, Redirect) {
    let params = CallbackParams::from_query(query.as_deref());
    let outcome = server
        .oauth_service
        .complete_callback(&mut jar, params)
        .await;
    let location = outcome.redirect_location(server.oauth_service.site());
    (jar, Redirect::temporary(&location))
}

/// POST /logout
pub async fn logout_handler(
    State(server): State<Server>,
    mut jar: CookieJar,
) -> (CookieJar, Redirect) {
    let location = server.oauth_service.logout(&mut jar);
    // 303 so the browser follows up with a GET
    (jar, Redirect::to(&location))
}

/// GET /me: the Intercom profile behind the session cookie
pub async fn me_handler(State(server): State<Server>, mut jar: CookieJar) -> (CookieJar, Response) {
    let response = match server.oauth_service.current_profile(&mut jar).await {
        SessionLookup::Active(profile) => Json(profile).into_response(),
        SessionLookup::Missing => unauthenticated("Not authenticated"),
        SessionLookup::Revoked(_) => unauthenticated("Token invalid or revoked"),
    };
    (jar, response)
}

fn unauthenticated(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
