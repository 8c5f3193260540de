//! Admin API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/users", get(handler::list_users))
        .route(
            "/users/{id}/role",
            put(handler::update_role),
        )
        .route("/users/{id}", axum::routing::delete(handler::delete_user))
        .route(
            "/settings/campaign-threshold",
            get(handler::get_campaign_threshold).put(handler::set_campaign_threshold),
        )
        .route(
            "/settings/table-count",
            get(handler::get_table_count).put(handler::set_table_count),
        )
        .route("/purchases", get(handler::list_purchases))
        .layer(middleware::from_fn(require_admin))
}
