//! Order Model
//!
//! A table order moves `pending → approved` or `pending → rejected`,
//! decided by staff exactly once. Submission is deduplicated by the
//! idempotency key (unique at the database level).

use serde::{Deserialize, Serialize};

/// Order lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub table_number: i64,
    pub quantity: i64,
    pub gift: bool,
    pub status: OrderStatus,
    pub idempotency_key: String,
    pub created_at: i64,
}

/// Submit order payload
///
/// `idempotency_key` is client-generated; the server fills in a UUID
/// when absent. A gift order redeems one earned free beer, quantity
/// is fixed at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_number: i64,
    pub quantity: i64,
    #[serde(default)]
    pub gift: bool,
    pub idempotency_key: Option<String>,
}

/// Submit order response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub idempotency_key: String,
}

/// Pending order row for the staff queue (joined with username)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PendingOrder {
    pub id: i64,
    pub table_number: i64,
    pub quantity: i64,
    pub gift: bool,
    pub username: String,
    pub created_at: i64,
}
