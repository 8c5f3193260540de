//! Authentication Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_staff;
use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login, /api/auth/register: public (no auth required)
/// - /api/auth/pending-users/*: staff only (auth handled at Router level)
pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/register", post(handler::register));

    let staff_routes = Router::new()
        .route("/api/auth/pending-users", get(handler::pending_users))
        .route(
            "/api/auth/pending-users/{id}/approve",
            post(handler::approve_pending_user),
        )
        .route(
            "/api/auth/pending-users/{id}/reject",
            post(handler::reject_pending_user),
        )
        .layer(middleware::from_fn(require_staff));

    public_routes.merge(staff_routes)
}
