//! Beer Ledger API Handlers
//!
//! Scan accrual, bar purchases and the admin statistics view.

use axum::{Json, extract::State};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{ledger, purchase, user};
use crate::loyalty::ScanToken;
use crate::utils::validation::validate_quantity;
use crate::{AppError, AppResult};

use shared::models::BeerStats;

/// Scan request payload
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub token: String,
}

/// Scan response
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// True when one drink was credited to the running count
    pub credited: bool,
    /// True when the scan redeemed an earned free beer
    pub gift_awarded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beer_count: Option<i64>,
}

/// Bar purchase request payload
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub customer_id: i64,
    pub quantity: i64,
}

/// Bar purchase response
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub beer_count: i64,
    pub free_beer_earned: bool,
}

/// POST /api/beers/scan - 扫描顾客积分码 (员工)
///
/// Credit codes are only accepted during the wall-clock minute they
/// were generated in; gift codes are checked against the ledger
/// count instead.
pub async fn scan(
    State(state): State<ServerState>,
    staff: CurrentUser,
    Json(req): Json<ScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    let now = Local::now().naive_local();
    let token = ScanToken::parse(&req.token, now)?;

    match token {
        ScanToken::Gift { username } => {
            let customer = user::find_by_username(&state.pool, &username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User {username} not found")))?;

            ledger::redeem_gift_scan(&state.pool, customer.id).await?;

            tracing::info!(
                customer_id = customer.id,
                staff_id = staff.id,
                "Gift scan redeemed"
            );

            Ok(Json(ScanResponse {
                credited: false,
                gift_awarded: true,
                beer_count: Some(0),
            }))
        }
        ScanToken::Credit { username } => {
            let customer = user::find_by_username(&state.pool, &username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User {username} not found")))?;

            let threshold = state.settings.campaign_threshold().await;
            let outcome = ledger::credit_drinks(&state.pool, customer.id, staff.id, 1, threshold)
                .await?;

            tracing::info!(
                customer_id = customer.id,
                staff_id = staff.id,
                beer_count = outcome.beer_count,
                "Credit scan accepted"
            );

            Ok(Json(ScanResponse {
                credited: true,
                gift_awarded: false,
                beer_count: Some(outcome.beer_count),
            }))
        }
    }
}

/// POST /api/beers/purchase - 吧台直接记账 (员工)
///
/// Same accrual arithmetic and transactional shape as order approval.
pub async fn purchase(
    State(state): State<ServerState>,
    staff: CurrentUser,
    Json(req): Json<PurchaseRequest>,
) -> AppResult<Json<PurchaseResponse>> {
    validate_quantity(req.quantity)?;

    let threshold = state.settings.campaign_threshold().await;
    let outcome =
        ledger::credit_drinks(&state.pool, req.customer_id, staff.id, req.quantity, threshold)
            .await?;

    tracing::info!(
        customer_id = req.customer_id,
        staff_id = staff.id,
        quantity = req.quantity,
        beer_count = outcome.beer_count,
        "Bar purchase credited"
    );

    Ok(Json(PurchaseResponse {
        beer_count: outcome.beer_count,
        free_beer_earned: outcome.reward_earned,
    }))
}

/// GET /api/beers/stats - 销售统计 (管理员)
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<BeerStats>> {
    let day_start = local_day_start()?;
    let stats = purchase::stats(&state.pool, day_start).await?;
    Ok(Json(stats))
}

/// Millisecond timestamp of local midnight, for the "today" window
fn local_day_start() -> AppResult<i64> {
    let midnight = Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::internal("Failed to compute local midnight"))?;
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| AppError::internal("Failed to compute local midnight"))
}
