//! Purchase Ledger Repository

use super::RepoResult;
use shared::models::{BeerStats, Purchase, PurchaseRecord, TopCustomer};
use sqlx::{SqliteConnection, SqlitePool};

/// Append one ledger entry inside an open transaction.
///
/// Every path that credits drinks (order approval, scan, bar
/// purchase) runs through here so the ledger stays append-only and
/// complete.
pub(crate) async fn insert_entry(
    conn: &mut SqliteConnection,
    user_id: i64,
    staff_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO purchases (id, user_id, staff_id, quantity, purchased_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(user_id)
    .bind(staff_id)
    .bind(quantity)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Purchase history for one customer, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Purchase>> {
    let rows = sqlx::query_as::<_, Purchase>(
        "SELECT * FROM purchases WHERE user_id = ? ORDER BY purchased_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All purchases joined to customer and staff names, newest first
pub async fn find_all_records(pool: &SqlitePool) -> RepoResult<Vec<PurchaseRecord>> {
    let rows = sqlx::query_as::<_, PurchaseRecord>(
        "SELECT p.id, u.username AS customer_name, s.username AS staff_name, p.quantity, p.purchased_at \
         FROM purchases p \
         JOIN users u ON p.user_id = u.id \
         JOIN users s ON p.staff_id = s.id \
         ORDER BY p.purchased_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Aggregate statistics: all-time volume, volume since `day_start`,
/// and the five highest-volume customers.
pub async fn stats(pool: &SqlitePool, day_start: i64) -> RepoResult<BeerStats> {
    let total_beers_sold: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM purchases")
            .fetch_one(pool)
            .await?;

    let beers_sold_today: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM purchases WHERE purchased_at >= ?",
    )
    .bind(day_start)
    .fetch_one(pool)
    .await?;

    let top_customers = sqlx::query_as::<_, TopCustomer>(
        "SELECT u.username, SUM(p.quantity) AS total_beers \
         FROM users u \
         JOIN purchases p ON u.id = p.user_id \
         GROUP BY u.id, u.username \
         ORDER BY total_beers DESC \
         LIMIT 5",
    )
    .fetch_all(pool)
    .await?;

    Ok(BeerStats {
        beers_sold_today,
        total_beers_sold,
        top_customers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::user;
    use crate::db::test_pool;
    use shared::models::Role;

    #[tokio::test]
    async fn history_and_stats() {
        let pool = test_pool().await;
        let staff = user::create(&pool, "staff1", "hash", Role::Staff)
            .await
            .unwrap();
        let alice = user::create(&pool, "alice", "hash", Role::Customer)
            .await
            .unwrap();
        let bob = user::create(&pool, "bob", "hash", Role::Customer)
            .await
            .unwrap();

        let mut tx = pool.begin().await.unwrap();
        insert_entry(&mut *tx, alice.id, staff.id, 3).await.unwrap();
        insert_entry(&mut *tx, alice.id, staff.id, 2).await.unwrap();
        insert_entry(&mut *tx, bob.id, staff.id, 4).await.unwrap();
        tx.commit().await.unwrap();

        let history = find_by_user(&pool, alice.id).await.unwrap();
        assert_eq!(history.len(), 2);

        let records = find_all_records(&pool).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].staff_name, "staff1");

        let stats = stats(&pool, 0).await.unwrap();
        assert_eq!(stats.total_beers_sold, 9);
        assert_eq!(stats.beers_sold_today, 9);
        assert_eq!(stats.top_customers[0].username, "alice");
        assert_eq!(stats.top_customers[0].total_beers, 5);
        assert_eq!(stats.top_customers[1].username, "bob");
        assert_eq!(stats.top_customers[1].total_beers, 4);

        // Day boundary in the future excludes everything
        let far_future = shared::util::now_millis() + 86_400_000;
        let stats = super::stats(&pool, far_future).await.unwrap();
        assert_eq!(stats.beers_sold_today, 0);
        assert_eq!(stats.total_beers_sold, 9);
    }
}
