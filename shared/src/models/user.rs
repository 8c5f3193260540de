//! User Model
//!
//! A user is a customer unless promoted; the loyalty ledger
//! (`beer_count` / `free_beers`) is embedded in the user row and is
//! only ever mutated by the order/scan controllers.

use serde::{Deserialize, Serialize};

/// User role, ordered by privilege
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    Customer,
    Staff,
    Admin,
}

impl Role {
    /// Staff and admin may approve orders and scan codes
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Full user row (internal; never serialized to clients as-is)
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub beer_count: i64,
    pub free_beers: i64,
    pub failed_attempts: i64,
    pub lock_until: Option<i64>,
    pub created_at: i64,
}

/// User profile exposed to clients (no credentials)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub beer_count: i64,
    pub free_beers: i64,
    pub created_at: i64,
}

/// Registration queue entry, awaiting staff approval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PendingUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}
