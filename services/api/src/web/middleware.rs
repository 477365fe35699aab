//! services/api/src/web/middleware.rs
//!
//! Origin check for state-changing requests.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::error::HttpError;
use crate::web::state::AppState;

/// Rejects non-safe requests sent from a foreign origin.
///
/// The rendering surface runs with an opaque origin and sends `Origin: null`, so
/// generated code cannot reset the session or write the clipboard. Requests
/// without an `Origin` header (curl, scripts) are let through.
pub async fn reject_foreign_origin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    if req.method().is_safe() {
        return Ok(next.run(req).await);
    }

    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok());
        if !origin_allowed(origin, &state.config.allowed_origin, host) {
            warn!(
                method = %req.method(),
                path = %req.uri().path(),
                origin = ?origin,
                "Rejected cross-origin request"
            );
            return Err(HttpError::new(
                StatusCode::FORBIDDEN,
                "Cross-origin request rejected",
            ));
        }
    }

    Ok(next.run(req).await)
}

/// An origin is accepted when it is the configured one or the server's own.
fn origin_allowed(origin: &HeaderValue, allowed_origin: &str, host: Option<&str>) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    if origin == "null" {
        return false;
    }
    if origin == allowed_origin {
        return true;
    }
    match (origin.split_once("://"), host) {
        (Some((_, authority)), Some(host)) => authority.eq_ignore_ascii_case(host),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: &str = "http://localhost:3000";

    #[test]
    fn opaque_origins_are_rejected() {
        let origin = HeaderValue::from_static("null");
        assert!(!origin_allowed(&origin, ALLOWED, Some("localhost:3000")));
    }

    #[test]
    fn the_configured_origin_is_accepted() {
        let origin = HeaderValue::from_static("http://localhost:3000");
        assert!(origin_allowed(&origin, ALLOWED, None));
    }

    #[test]
    fn the_servers_own_origin_is_accepted() {
        let origin = HeaderValue::from_static("http://127.0.0.1:8080");
        assert!(origin_allowed(&origin, ALLOWED, Some("127.0.0.1:8080")));
    }

    #[test]
    fn other_sites_are_rejected() {
        let origin = HeaderValue::from_static("https://evil.example");
        assert!(!origin_allowed(&origin, ALLOWED, Some("127.0.0.1:3000")));
        assert!(!origin_allowed(&origin, ALLOWED, None));
    }
}
