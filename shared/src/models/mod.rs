//! Data Models
//!
//! Database entities and API payloads shared across the workspace.

pub mod order;
pub mod purchase;
pub mod user;

pub use order::{Order, OrderCreate, OrderReceipt, OrderStatus, PendingOrder};
pub use purchase::{BeerStats, Purchase, PurchaseRecord, TopCustomer};
pub use user::{PendingUser, Profile, Role, User};
