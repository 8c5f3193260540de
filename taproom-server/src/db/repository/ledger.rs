//! Ledger Repository
//!
//! Direct ledger mutations that bypass the pending-order stage: bar
//! purchases credited by staff and scan accruals. Same transactional
//! shape as order approval: read counters, apply the accrual rule,
//! write counters and the purchase entry as one unit.

use super::{RepoError, RepoResult, purchase};
use crate::loyalty::ledger::{AccrualOutcome, apply_accrual, gift_scan_allowed};
use sqlx::SqlitePool;

/// Credit `quantity` drinks to a customer and append the purchase
/// entry. Used by the bar purchase endpoint and by credit scans
/// (quantity 1).
pub async fn credit_drinks(
    pool: &SqlitePool,
    customer_id: i64,
    staff_id: i64,
    quantity: i64,
    threshold: i64,
) -> RepoResult<AccrualOutcome> {
    let mut tx = pool.begin().await?;

    let (beer_count, free_beers): (i64, i64) =
        sqlx::query_as("SELECT beer_count, free_beers FROM users WHERE id = ?")
            .bind(customer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {customer_id} not found")))?;

    let outcome = apply_accrual(beer_count, free_beers, quantity, threshold);

    sqlx::query("UPDATE users SET beer_count = ?, free_beers = ? WHERE id = ?")
        .bind(outcome.beer_count)
        .bind(outcome.free_beers)
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

    purchase::insert_entry(&mut *tx, customer_id, staff_id, quantity).await?;

    tx.commit().await?;
    Ok(outcome)
}

/// Redeem a gift scan: only allowed while the running count sits at
/// the reward boundary; resets the count and banks one free beer.
pub async fn redeem_gift_scan(pool: &SqlitePool, customer_id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let beer_count: i64 = sqlx::query_scalar("SELECT beer_count FROM users WHERE id = ?")
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {customer_id} not found")))?;

    if !gift_scan_allowed(beer_count) {
        return Err(RepoError::Validation(
            "gift code is only valid at the 10th or 11th beer".into(),
        ));
    }

    sqlx::query("UPDATE users SET beer_count = 0, free_beers = free_beers + 1 WHERE id = ?")
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::user;
    use crate::db::test_pool;
    use shared::models::Role;

    async fn seed(pool: &SqlitePool, name: &str, beer_count: i64, free_beers: i64) -> i64 {
        let u = user::create(pool, name, "hash", Role::Customer).await.unwrap();
        sqlx::query("UPDATE users SET beer_count = ?, free_beers = ? WHERE id = ?")
            .bind(beer_count)
            .bind(free_beers)
            .bind(u.id)
            .execute(pool)
            .await
            .unwrap();
        u.id
    }

    #[tokio::test]
    async fn credit_accrues_and_records_purchase() {
        let pool = test_pool().await;
        let staff = user::create(&pool, "staff1", "hash", Role::Staff)
            .await
            .unwrap();
        let alice = seed(&pool, "alice", 9, 0).await;

        let outcome = credit_drinks(&pool, alice, staff.id, 1, 10).await.unwrap();
        assert!(outcome.reward_earned);
        assert_eq!(outcome.beer_count, 0);
        assert_eq!(outcome.free_beers, 1);

        let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = ?")
            .bind(alice)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn credit_unknown_user_fails() {
        let pool = test_pool().await;
        let err = credit_drinks(&pool, 999, 1, 1, 10).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn gift_scan_at_boundary_resets_count() {
        let pool = test_pool().await;
        let alice = seed(&pool, "alice", 10, 0).await;
        redeem_gift_scan(&pool, alice).await.unwrap();

        let (count, free): (i64, i64) =
            sqlx::query_as("SELECT beer_count, free_beers FROM users WHERE id = ?")
                .bind(alice)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!((count, free), (0, 1));

        // 11 is tolerated as well (count bumped between button and scan)
        let bob = seed(&pool, "bob", 11, 0).await;
        redeem_gift_scan(&pool, bob).await.unwrap();
    }

    #[tokio::test]
    async fn gift_scan_off_boundary_rejected() {
        let pool = test_pool().await;
        let alice = seed(&pool, "alice", 5, 0).await;
        let err = redeem_gift_scan(&pool, alice).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let bob = seed(&pool, "bob", 12, 0).await;
        assert!(redeem_gift_scan(&pool, bob).await.is_err());
    }
}
