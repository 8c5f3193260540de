//! Shared types for the Taproom bar backend
//!
//! Data models and DTOs used by the server (and any future client):
//!
//! - [`models`] - database entities and API payloads
//! - [`client`] - auth request/response DTOs
//! - [`util`] - id and timestamp helpers

pub mod client;
pub mod models;
pub mod util;

pub use models::{Order, OrderStatus, Role};
