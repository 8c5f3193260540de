//! Admin API Handlers
//!
//! User administration, campaign settings and the purchase ledger view.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{purchase, user};
use crate::{AppResult, security_log};

use shared::models::{Profile, PurchaseRecord, Role};

/// Role update payload
#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// Settings value payload / response
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingValue {
    pub value: i64,
}

/// GET /api/admin/users - 所有用户
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<Profile>>> {
    let users = user::find_all_profiles(&state.pool).await?;
    Ok(Json(users))
}

/// PUT /api/admin/users/:id/role - 更新用户角色
///
/// Role deserialization rejects anything outside the three known
/// roles before the handler runs.
pub async fn update_role(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<bool>> {
    user::update_role(&state.pool, id, payload.role).await?;

    security_log!(
        "INFO",
        "role_updated",
        admin_id = admin.id,
        user_id = id,
        new_role = payload.role.as_str()
    );

    Ok(Json(true))
}

/// DELETE /api/admin/users/:id - 删除用户及其订单和消费记录
pub async fn delete_user(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    user::delete(&state.pool, id).await?;

    security_log!("INFO", "user_deleted", admin_id = admin.id, user_id = id);

    Ok(Json(true))
}

/// GET /api/admin/settings/campaign-threshold
pub async fn get_campaign_threshold(
    State(state): State<ServerState>,
) -> AppResult<Json<SettingValue>> {
    let value = state.settings.campaign_threshold().await;
    Ok(Json(SettingValue { value }))
}

/// PUT /api/admin/settings/campaign-threshold
pub async fn set_campaign_threshold(
    State(state): State<ServerState>,
    Json(payload): Json<SettingValue>,
) -> AppResult<Json<SettingValue>> {
    state.settings.set_campaign_threshold(payload.value).await?;

    tracing::info!(value = payload.value, "Campaign threshold updated");

    Ok(Json(SettingValue {
        value: payload.value,
    }))
}

/// GET /api/admin/settings/table-count
pub async fn get_table_count(State(state): State<ServerState>) -> AppResult<Json<SettingValue>> {
    let value = state.settings.table_count().await;
    Ok(Json(SettingValue { value }))
}

/// PUT /api/admin/settings/table-count
pub async fn set_table_count(
    State(state): State<ServerState>,
    Json(payload): Json<SettingValue>,
) -> AppResult<Json<SettingValue>> {
    state.settings.set_table_count(payload.value).await?;

    tracing::info!(value = payload.value, "Table count updated");

    Ok(Json(SettingValue {
        value: payload.value,
    }))
}

/// GET /api/admin/purchases - 全部消费记录 (最新在前)
pub async fn list_purchases(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<PurchaseRecord>>> {
    let records = purchase::find_all_records(&state.pool).await?;
    Ok(Json(records))
}
