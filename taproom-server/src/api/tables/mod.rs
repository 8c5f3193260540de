//! 公开桌台数量路由
//!
//! 点单表单需要在登录前渲染桌号选择，所以这个接口是公开的。

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// 桌台数量路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/tables/count", get(count))
}

#[derive(Serialize)]
pub struct TableCountResponse {
    pub table_count: i64,
}

/// GET /api/tables/count
async fn count(State(state): State<ServerState>) -> Json<TableCountResponse> {
    let table_count = state.settings.table_count().await;
    Json(TableCountResponse { table_count })
}
