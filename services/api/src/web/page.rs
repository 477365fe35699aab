//! services/api/src/web/page.rs
//!
//! Serves the single page that drives the API.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
