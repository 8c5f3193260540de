//! Beer Ledger API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/beers", routes())
}

fn routes() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/scan", post(handler::scan))
        .route("/purchase", post(handler::purchase))
        .layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/stats", get(handler::stats))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
