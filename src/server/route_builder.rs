/// Middleware factory functions for common patterns
pub mod middleware_factories {
    use crate::utils::request_id::RequestIdExt;
    use axum::{body::Body, extract::Request, middleware::Next, response::Response};
    use std::time::Instant;
    use tracing::info;

    /// Structured request/response log lines; `/health` is skipped
    pub async fn request_response_logger(req: Request<Body>, next: Next) -> Response {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        if path.starts_with("/health") {
            return next.run(req).await;
        }

        let request_id = req.extensions().request_id();
        let user_agent = req
            .headers()
            .get(axum::http::header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        // Query strings are left out: the callback carries the authorization code
        info!(
            method = %method,
            path = %path,
            user_agent = %user_agent,
            request_id = %request_id,
            "HTTP request"
        );

        let start = Instant::now();
        let response = next.run(req).await;

        info!(
            method = %method,
            path = %path,
            status = %response.status().as_u16(),
            latency_ms = %start.elapsed().as_millis(),
            request_id = %request_id,
            "HTTP response"
        );

        response
    }
}
