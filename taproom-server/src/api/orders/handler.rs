//! Order API Handlers
//!
//! Submission, the staff approval queue and the two decisions.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::validation::{validate_quantity, validate_table_number};
use crate::AppResult;

use shared::models::{Order, OrderCreate, OrderReceipt, OrderStatus, PendingOrder};

/// Approval response: the decided order plus the resulting ledger
/// counters for normal orders
#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beer_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_beer_earned: Option<bool>,
}

/// POST /api/orders - 提交订单
///
/// Duplicate submissions with the same idempotency key return the
/// original order's receipt. Gift orders redeem one earned free beer
/// at submission time; the quantity is forced to 1.
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderReceipt>> {
    let table_count = state.settings.table_count().await;
    validate_table_number(payload.table_number, table_count)?;

    let quantity = if payload.gift {
        1
    } else {
        validate_quantity(payload.quantity)?;
        payload.quantity
    };

    let idempotency_key = payload
        .idempotency_key
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let outcome = order::submit(
        &state.pool,
        user.id,
        payload.table_number,
        quantity,
        payload.gift,
        &idempotency_key,
    )
    .await?;

    if outcome.created {
        tracing::info!(
            order_id = outcome.order.id,
            user_id = user.id,
            table = payload.table_number,
            quantity = quantity,
            gift = payload.gift,
            "Order submitted"
        );
    } else {
        tracing::debug!(
            order_id = outcome.order.id,
            idempotency_key = %idempotency_key,
            "Duplicate order submission deduplicated"
        );
    }

    Ok(Json(OrderReceipt {
        order_id: outcome.order.id,
        idempotency_key: outcome.order.idempotency_key,
    }))
}

/// GET /api/orders/pending - 待处理订单队列 (员工)
pub async fn pending(State(state): State<ServerState>) -> AppResult<Json<Vec<PendingOrder>>> {
    let orders = order::find_pending(&state.pool).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id/status - 查询订单状态 (仅限下单人)
pub async fn status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderStatus>> {
    let status = order::status_for(&state.pool, id, user.id).await?;
    Ok(Json(status))
}

/// POST /api/orders/:id/approve - 批准订单 (员工)
pub async fn approve(
    State(state): State<ServerState>,
    staff: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApproveResponse>> {
    let threshold = state.settings.campaign_threshold().await;
    let outcome = order::approve(&state.pool, id, staff.id, threshold).await?;

    tracing::info!(
        order_id = id,
        staff_id = staff.id,
        gift = outcome.order.gift,
        "Order approved"
    );

    let (beer_count, free_beer_earned) = match &outcome.accrual {
        Some(a) => (Some(a.beer_count), Some(a.reward_earned)),
        None => (None, None),
    };

    Ok(Json(ApproveResponse {
        order: outcome.order,
        beer_count,
        free_beer_earned,
    }))
}

/// POST /api/orders/:id/reject - 拒绝订单 (员工)
pub async fn reject(
    State(state): State<ServerState>,
    staff: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    order::reject(&state.pool, id).await?;

    tracing::info!(order_id = id, staff_id = staff.id, "Order rejected");

    Ok(Json(true))
}
