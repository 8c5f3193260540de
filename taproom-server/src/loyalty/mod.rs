//! Loyalty core
//!
//! The arithmetic and parsing at the heart of the drink campaign:
//!
//! - [`ledger`] - threshold accrual applied on every credit
//! - [`token`] - scan token parsing and freshness validation
//!
//! Both are pure; the transactional wrapping lives in
//! `db::repository` so the rules stay trivially testable.

pub mod ledger;
pub mod token;

pub use ledger::{AccrualOutcome, apply_accrual, gift_scan_allowed};
pub use token::ScanToken;
