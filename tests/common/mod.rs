use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    response::Response,
};
use intercom_oauth::{Config, Server};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header as header_matcher, method, path},
};

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const TOKEN_PATH: &str = "/auth/eagle/token";
pub const ME_PATH: &str = "/me";

/// Real server wired to a wiremock stand-in for the Intercom API
pub struct TestHarness {
    #[allow(dead_code)]
    pub config: Config,
    pub app: Router,
    pub intercom: MockServer,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Harness with test credentials and endpoints, then `customize` applied
    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let intercom = MockServer::start().await;

        let mut config = Config::default();
        config.intercom.client_id = CLIENT_ID.to_string();
        config.intercom.client_secret = CLIENT_SECRET.to_string();
        config.intercom.token_url = format!("{}{}", intercom.uri(), TOKEN_PATH);
        config.intercom.me_url = format!("{}{}", intercom.uri(), ME_PATH);
        config.metrics.enabled = false;
        customize(&mut config);

        let server = Server::new(config.clone()).await.unwrap();
        let app = server.create_app();

        Self {
            config,
            app,
            intercom,
        }
    }

    pub async fn make_request(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Token endpoint accepting `code` and answering with `access_token`
    #[allow(dead_code)]
    pub async fn mock_token_exchange(&self, code: &str, access_token: &str) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_json(json!({
                "code": code,
                "client_id": CLIENT_ID,
                "client_secret": CLIENT_SECRET,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": access_token,
                "access_token": access_token,
                "token_type": "Bearer",
            })))
            .expect(1)
            .mount(&self.intercom)
            .await;
    }

    /// Token endpoint that must never be called
    #[allow(dead_code)]
    pub async fn forbid_token_exchange(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.intercom)
            .await;
    }

    /// Profile endpoint answering `profile` for `access_token`
    #[allow(dead_code)]
    pub async fn mock_profile(&self, access_token: &str, profile: Value) {
        Mock::given(method("GET"))
            .and(path(ME_PATH))
            .and(header_matcher(
                "authorization",
                format!("Bearer {access_token}").as_str(),
            ))
            .and(header_matcher("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .mount(&self.intercom)
            .await;
    }

    /// Profile endpoint that must never be called
    #[allow(dead_code)]
    pub async fn forbid_profile(&self) {
        Mock::given(method("GET"))
            .and(path(ME_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.intercom)
            .await;
    }

    /// Walk /login and return the state value written to the cookie
    #[allow(dead_code)]
    pub async fn start_login(&self) -> String {
        let response = self.make_request(RequestBuilder::login()).await;
        cookies::value(&response, "oauth_state").expect("login must set oauth_state")
    }
}

pub struct RequestBuilder;

impl RequestBuilder {
    pub fn login() -> Request<Body> {
        Request::builder().uri("/login").body(Body::empty()).unwrap()
    }

    /// `query` is appended verbatim; `cookie` is a full `name=value` pair
    #[allow(dead_code)]
    pub fn callback(query: &str, cookie: Option<&str>) -> Request<Body> {
        with_cookie(
            Request::builder().uri(format!("/callback?{query}")),
            cookie,
        )
    }

    #[allow(dead_code)]
    pub fn me(session_token: Option<&str>) -> Request<Body> {
        let cookie = session_token.map(|token| format!("session_token={token}"));
        with_cookie(Request::builder().uri("/me"), cookie.as_deref())
    }

    #[allow(dead_code)]
    pub fn logout(session_token: Option<&str>) -> Request<Body> {
        let cookie = session_token.map(|token| format!("session_token={token}"));
        with_cookie(
            Request::builder().method(Method::POST).uri("/logout"),
            cookie.as_deref(),
        )
    }
}

fn with_cookie(builder: axum::http::request::Builder, cookie: Option<&str>) -> Request<Body> {
    let builder = match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    };
    builder.body(Body::empty()).unwrap()
}

/// Reading `Set-Cookie` headers off a response
#[allow(dead_code)]
pub mod cookies {
    use axum::{http::header, response::Response};

    /// Full `Set-Cookie` header written for `name`
    pub fn header(response: &Response, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&prefix))
            .map(str::to_string)
    }

    /// Value written for `name`; empty for a removal cookie
    pub fn value(response: &Response, name: &str) -> Option<String> {
        header(response, name).map(|set_cookie| {
            set_cookie[name.len() + 1..]
                .split(';')
                .next()
                .unwrap_or_default()
                .to_string()
        })
    }

    pub fn is_removal(response: &Response, name: &str) -> bool {
        header(response, name)
            .is_some_and(|set_cookie| set_cookie.contains("Max-Age=0"))
    }
}

#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[allow(dead_code)]
pub async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
