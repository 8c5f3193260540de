//! Settings Repository
//!
//! Plain key/value rows; interpretation and caching live in
//! `services::settings`.

use super::RepoResult;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool, key: &str) -> RepoResult<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn get_missing_returns_none() {
        let pool = test_pool().await;
        assert_eq!(get(&pool, "campaign_threshold").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_upserts() {
        let pool = test_pool().await;
        set(&pool, "campaign_threshold", "12").await.unwrap();
        set(&pool, "campaign_threshold", "15").await.unwrap();
        assert_eq!(
            get(&pool, "campaign_threshold").await.unwrap().as_deref(),
            Some("15")
        );
    }
}
