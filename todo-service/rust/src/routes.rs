use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{health, infra::db::Db, middleware::log_requests, todos};

/// Builds the route table. Everything except the readiness probe goes through
/// the request logger, a panicking handler turns into a 500 for that request.
pub(crate) fn router(db: &Db) -> Router {
    let logged = Router::new()
        .merge(health::router())
        .nest(todos::PATH, todos::router(db))
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(log_requests));

    Router::new().merge(health::ping_router()).merge(logged)
}
