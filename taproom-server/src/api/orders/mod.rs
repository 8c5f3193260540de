//! Order API 模块

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_staff;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/", post(handler::submit))
        .route("/{id}/status", get(handler::status));

    let staff_routes = Router::new()
        .route("/pending", get(handler::pending))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .layer(middleware::from_fn(require_staff));

    customer_routes.merge(staff_routes)
}
