//! Purchase Ledger Model
//!
//! Every credited drink (approved order, scan, bar purchase) appends a
//! purchase row; the ledger is append-only and drives the statistics.

use serde::{Deserialize, Serialize};

/// Purchase ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: i64,
    pub user_id: i64,
    pub staff_id: i64,
    pub quantity: i64,
    pub purchased_at: i64,
}

/// Purchase entry joined with customer and staff names (admin view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PurchaseRecord {
    pub id: i64,
    pub customer_name: String,
    pub staff_name: String,
    pub quantity: i64,
    pub purchased_at: i64,
}

/// Top customer row for statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopCustomer {
    pub username: String,
    pub total_beers: i64,
}

/// Aggregate beer statistics (admin view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeerStats {
    pub beers_sold_today: i64,
    pub total_beers_sold: i64,
    pub top_customers: Vec<TopCustomer>,
}
