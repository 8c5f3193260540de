//! Order Repository
//!
//! The order lifecycle state machine: submission (deduplicated by the
//! idempotency key), staff approval (which mutates the loyalty
//! ledger) and rejection. Every mutation sequence runs inside one
//! transaction so a failure never leaves a partial ledger update
//! behind.

use super::{RepoError, RepoResult, purchase};
use crate::loyalty::ledger::{AccrualOutcome, apply_accrual};
use shared::models::{Order, OrderStatus, PendingOrder};
use sqlx::SqlitePool;

/// Result of an order submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub order: Order,
    /// False when the idempotency key matched an existing order
    pub created: bool,
}

/// Result of an order approval
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub order: Order,
    /// Ledger change for normal orders; None for gift orders, whose
    /// reservation already happened at submission
    pub accrual: Option<AccrualOutcome>,
}

/// Submit an order, deduplicated by `idempotency_key`.
///
/// The insert is `ON CONFLICT DO NOTHING` + fetch-by-key: at most one
/// row ever exists per key, and a duplicate submission returns the
/// original order unchanged. A gift order reserves one earned free
/// beer in the same transaction; if the customer has none the whole
/// submission rolls back.
pub async fn submit(
    pool: &SqlitePool,
    user_id: i64,
    table_number: i64,
    quantity: i64,
    gift: bool,
    idempotency_key: &str,
) -> RepoResult<SubmitOutcome> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    let created = sqlx::query(
        "INSERT INTO orders (id, user_id, table_number, quantity, gift, status, idempotency_key, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7) \
         ON CONFLICT(idempotency_key) DO NOTHING",
    )
    .bind(id)
    .bind(user_id)
    .bind(table_number)
    .bind(quantity)
    .bind(gift)
    .bind(idempotency_key)
    .bind(now)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    // Reserve the reward at submission so it cannot be spent twice
    // concurrently. Only on first insert: a resubmitted key must not
    // reserve again.
    if created && gift {
        let reserved = sqlx::query(
            "UPDATE users SET free_beers = free_beers - 1 WHERE id = ? AND free_beers >= 1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if reserved == 0 {
            // Dropping the transaction rolls the order row back too
            return Err(RepoError::Validation(
                "no free beer available to redeem".into(),
            ));
        }
    }

    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE idempotency_key = ?")
        .bind(idempotency_key)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::Database("order row missing after insert".into()))?;

    tx.commit().await?;

    Ok(SubmitOutcome { order, created })
}

/// Approve a pending order.
///
/// Runs as one atomic unit: load the pending order, mutate the
/// customer ledger (normal orders), append the purchase entry, mark
/// the order approved. Any order that is not pending (including one
/// already decided) reports NotFound, keeping the response surface
/// simple.
pub async fn approve(
    pool: &SqlitePool,
    order_id: i64,
    staff_id: i64,
    threshold: i64,
) -> RepoResult<ApprovalOutcome> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE id = ? AND status = 'pending'",
    )
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;

    let accrual = if order.gift {
        // The free_beers decrement already happened at submission;
        // approval only records the redemption unit.
        purchase::insert_entry(&mut *tx, order.user_id, staff_id, 1).await?;
        None
    } else {
        let (beer_count, free_beers): (i64, i64) =
            sqlx::query_as("SELECT beer_count, free_beers FROM users WHERE id = ?")
                .bind(order.user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    RepoError::NotFound(format!("User {} not found", order.user_id))
                })?;

        let outcome = apply_accrual(beer_count, free_beers, order.quantity, threshold);

        sqlx::query("UPDATE users SET beer_count = ?, free_beers = ? WHERE id = ?")
            .bind(outcome.beer_count)
            .bind(outcome.free_beers)
            .bind(order.user_id)
            .execute(&mut *tx)
            .await?;

        purchase::insert_entry(&mut *tx, order.user_id, staff_id, order.quantity).await?;
        Some(outcome)
    };

    sqlx::query("UPDATE orders SET status = 'approved' WHERE id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let order = Order {
        status: OrderStatus::Approved,
        ..order
    };
    Ok(ApprovalOutcome { order, accrual })
}

/// Reject an order. Unconditional: any state may be rejected, and no
/// ledger mutation happens (a gift reservation is not restored).
pub async fn reject(pool: &SqlitePool, order_id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = 'rejected' WHERE id = ?")
        .bind(order_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    Ok(())
}

/// Pending orders for the staff queue, oldest first
pub async fn find_pending(pool: &SqlitePool) -> RepoResult<Vec<PendingOrder>> {
    let rows = sqlx::query_as::<_, PendingOrder>(
        "SELECT o.id, o.table_number, o.quantity, o.gift, u.username, o.created_at \
         FROM orders o \
         JOIN users u ON o.user_id = u.id \
         WHERE o.status = 'pending' \
         ORDER BY o.created_at ASC, o.id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Status of an order owned by `user_id`
pub async fn status_for(
    pool: &SqlitePool,
    order_id: i64,
    user_id: i64,
) -> RepoResult<OrderStatus> {
    sqlx::query_scalar::<_, OrderStatus>(
        "SELECT status FROM orders WHERE id = ? AND user_id = ?",
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
