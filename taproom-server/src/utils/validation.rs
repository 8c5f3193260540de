//! Input validation helpers
//!
//! Centralized limits and validation functions for request payloads.
//! SQLite TEXT has no built-in length enforcement, so limits are
//! applied here before anything reaches the database.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Usernames: alphanumeric, 3..=32 chars
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 5;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Largest quantity a single table order may carry
pub const MAX_ORDER_QUANTITY: i64 = 10;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a username: non-empty, alphanumeric, within length limits.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    let name = username.trim();
    if name.len() < MIN_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if name.len() > MAX_USERNAME_LEN {
        return Err(AppError::validation(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::validation(
            "username must contain only letters and digits",
        ));
    }
    Ok(())
}

/// Validate a password against the length limits.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a table number against the configured table count.
pub fn validate_table_number(table_number: i64, table_count: i64) -> Result<(), AppError> {
    if table_number < 1 || table_number > table_count {
        return Err(AppError::validation(format!(
            "table number must be between 1 and {table_count}"
        )));
    }
    Ok(())
}

/// Validate an order quantity (non-gift orders).
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity < 1 || quantity > MAX_ORDER_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity must be between 1 and {MAX_ORDER_QUANTITY}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("Customer42").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(11).is_err());
    }

    #[test]
    fn table_number_bounds() {
        assert!(validate_table_number(1, 20).is_ok());
        assert!(validate_table_number(20, 20).is_ok());
        assert!(validate_table_number(0, 20).is_err());
        assert!(validate_table_number(21, 20).is_err());
    }
}
