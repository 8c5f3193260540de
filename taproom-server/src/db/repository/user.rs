//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Profile, Role, User};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_profile(pool: &SqlitePool, id: i64) -> RepoResult<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>(
        "SELECT id, username, role, beer_count, free_beers, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_all_profiles(pool: &SqlitePool) -> RepoResult<Vec<Profile>> {
    let rows = sqlx::query_as::<_, Profile>(
        "SELECT id, username, role, beer_count, free_beers, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a new user with a fresh ledger. Role defaults are decided
/// by the caller (registration approval always passes `customer`).
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: Role,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, beer_count, free_beers, failed_attempts, created_at) VALUES (?1, ?2, ?3, ?4, 0, 0, 0, ?5)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(role)
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
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update_role(pool: &SqlitePool, id: i64, role: Role) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(role)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    Ok(())
}

/// Delete a user together with their ledger history and orders.
///
/// Purchase rows where the user acted as crediting staff are removed
/// as well; the foreign key would otherwise block the delete.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM purchases WHERE user_id = ? OR staff_id = ?")
        .bind(id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM orders WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    tx.commit().await?;
    Ok(())
}

// ── Login bookkeeping ───────────────────────────────────────────────

pub async fn record_login_failure(
    pool: &SqlitePool,
    id: i64,
    attempts: i64,
    lock_until: Option<i64>,
) -> RepoResult<()> {
    sqlx::query("UPDATE users SET failed_attempts = ?, lock_until = ? WHERE id = ?")
        .bind(attempts)
        .bind(lock_until)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn reset_login_failures(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE users SET failed_attempts = 0, lock_until = NULL WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
