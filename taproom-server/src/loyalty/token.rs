//! Scan token parsing
//!
//! Customers present a plaintext code the staff scans at the bar:
//!
//! - credit: `"<username>|YYYY-MM-DD-HH:MM"`, where the timestamp
//!   must match the current wall-clock minute exactly, which stops
//!   stale screenshots from being replayed later
//! - gift:   `"<username>|hediye|<timestamp>"`, redemption of an
//!   earned free beer; validated against the ledger count, not the
//!   clock
//!
//! The token carries no signature. The minute window is the only
//! defense, accepted on the assumption that codes are scanned in
//! person at the counter.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::utils::{AppError, AppResult};

/// Marker distinguishing gift redemption codes ("hediye" on the
/// printed campaign cards)
const GIFT_MARKER: &str = "hediye";

/// Parsed scan token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanToken {
    /// Credit one drink to the named customer
    Credit { username: String },
    /// Redeem one earned free beer for the named customer
    Gift { username: String },
}

impl ScanToken {
    /// Parse a raw scan payload against the current wall-clock time.
    ///
    /// `now` is the server's local time; only credit tokens are
    /// checked for freshness.
    pub fn parse(raw: &str, now: NaiveDateTime) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.contains('|') {
            return Err(AppError::validation("invalid scan code"));
        }

        if raw.contains(&format!("|{GIFT_MARKER}|")) {
            return Self::parse_gift(raw);
        }

        Self::parse_credit(raw, now)
    }

    fn parse_gift(raw: &str) -> AppResult<Self> {
        let mut parts = raw.split('|');
        let username = parts.next().unwrap_or_default();
        let marker = parts.next().unwrap_or_default();
        if username.is_empty() || marker != GIFT_MARKER {
            return Err(AppError::validation("invalid gift code"));
        }
        Ok(ScanToken::Gift {
            username: username.to_string(),
        })
    }

    fn parse_credit(raw: &str, now: NaiveDateTime) -> AppResult<Self> {
        let (username, time_str) = raw
            .split_once('|')
            .ok_or_else(|| AppError::validation("invalid scan code"))?;
        if username.is_empty() || time_str.is_empty() {
            return Err(AppError::validation("invalid scan code"));
        }

        // YYYY-MM-DD-HH:MM, numeric compare so zero-padding is irrelevant
        let parts: Vec<i64> = time_str
            .split(['-', ':'])
            .map(|p| p.parse::<i64>())
            .collect::<Result<_, _>>()
            .map_err(|_| AppError::validation("invalid scan code timestamp"))?;
        if parts.len() != 5 {
            return Err(AppError::validation("invalid scan code timestamp"));
        }

        let fresh = parts[0] == now.year() as i64
            && parts[1] == now.month() as i64
            && parts[2] == now.day() as i64
            && parts[3] == now.hour() as i64
            && parts[4] == now.minute() as i64;
        if !fresh {
            return Err(AppError::validation("scan code expired, please retry"));
        }

        Ok(ScanToken::Credit {
            username: username.to_string(),
        })
    }
}
