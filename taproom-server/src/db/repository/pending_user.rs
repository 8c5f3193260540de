//! Pending User Repository
//!
//! Registration queue: new accounts wait here until staff approve
//! them into the users table or reject them.

use super::{RepoError, RepoResult};
use shared::models::{PendingUser, Role, User};
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> RepoResult<PendingUser> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO pending_users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepoError::Duplicate(format!("username {username}"))
        }
        other => RepoError::from(other),
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pending user".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PendingUser>> {
    let row = sqlx::query_as::<_, PendingUser>("SELECT * FROM pending_users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<PendingUser>> {
    let row = sqlx::query_as::<_, PendingUser>("SELECT * FROM pending_users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Queue entries oldest first, so approvals happen in arrival order
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PendingUser>> {
    let rows =
        sqlx::query_as::<_, PendingUser>("SELECT * FROM pending_users ORDER BY created_at ASC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Approve a pending registration: move the row into `users` as a
/// customer and drop it from the queue, atomically.
pub async fn approve(pool: &SqlitePool, id: i64) -> RepoResult<User> {
    let pending = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Pending user {id} not found")))?;

    let user_id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, beer_count, free_beers, failed_attempts, created_at) VALUES (?1, ?2, ?3, ?4, 0, 0, 0, ?5)",
    )
    .bind(user_id)
    .bind(&pending.username)
    .bind(&pending.password_hash)
    .bind(Role::Customer)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepoError::Duplicate(format!("username {}", pending.username))
        }
        other => RepoError::from(other),
    })?;
    sqlx::query("DELETE FROM pending_users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    super::user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to approve pending user".into()))
}

/// Reject a pending registration (delete the queue entry)
pub async fn reject(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM pending_users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Pending user {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn approve_moves_row_into_users() {
        let pool = test_pool().await;
        let pending = create(&pool, "alice", "hash").await.unwrap();

        let user = approve(&pool, pending.id).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.beer_count, 0);

        // Queue entry is gone, double approval reports NotFound
        assert!(find_by_id(&pool, pending.id).await.unwrap().is_none());
        assert!(matches!(
            approve(&pool, pending.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn reject_drops_queue_entry() {
        let pool = test_pool().await;
        let pending = create(&pool, "bob", "hash").await.unwrap();
        reject(&pool, pending.id).await.unwrap();
        assert!(find_by_id(&pool, pending.id).await.unwrap().is_none());
        assert!(matches!(
            reject(&pool, pending.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn queue_is_oldest_first() {
        let pool = test_pool().await;
        let a = create(&pool, "a1", "hash").await.unwrap();
        let b = create(&pool, "b2", "hash").await.unwrap();
        sqlx::query("UPDATE pending_users SET created_at = 1 WHERE id = ?")
            .bind(a.id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE pending_users SET created_at = 2 WHERE id = ?")
            .bind(b.id)
            .execute(&pool)
            .await
            .unwrap();

        let all = find_all(&pool).await.unwrap();
        assert_eq!(all[0].username, "a1");
        assert_eq!(all[1].username, "b2");
    }
}
