//! User Profile API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users/profile", get(handler::profile))
        .route("/api/users/history", get(handler::history))
}
