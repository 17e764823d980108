use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Router};
use axum_macros::debug_handler;

use crate::error::AppError;

pub(crate) const PING_PATH: &str = "/ping";
pub(crate) const HELLO_PATH: &str = "/hello/:name";

/// Readiness probe, kept out of the request logs.
pub(crate) fn ping_router() -> Router {
    Router::new().route(PING_PATH, get(ping))
}

pub(crate) fn router() -> Router {
    Router::new().route(HELLO_PATH, get(hello))
}

#[debug_handler]
async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "Pong\n")
}

#[debug_handler]
async fn hello(Path(name): Path<String>) -> Result<String, AppError> {
    if name.is_empty() {
        return Err(AppError::EmptyPathParam("name"));
    }

    Ok(format!("Hello, {name}!\n"))
}
