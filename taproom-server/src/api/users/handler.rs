//! User Profile API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{purchase, user};
use crate::{AppError, AppResult};

use shared::models::{Profile, Purchase};

/// GET /api/users/profile - 当前用户资料
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Profile>> {
    let profile = user::find_profile(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current.id)))?;
    Ok(Json(profile))
}

/// GET /api/users/history - 当前用户消费历史 (最新在前)
pub async fn history(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<Purchase>>> {
    let purchases = purchase::find_by_user(&state.pool, current.id).await?;
    Ok(Json(purchases))
}
