//! Campaign settings service
//!
//! Explicit injected state object around the settings table with a
//! process-wide read cache. Reads hit the cache after the first
//! lookup; a read failure (missing row, missing schema) falls back to
//! the default and caches it. Writes upsert the row and refresh the
//! cache synchronously; last writer wins, staleness is bounded by
//! the next explicit write.

use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;

use crate::db::repository::settings;
use crate::utils::{AppError, AppResult};

/// Drinks required to earn one free beer
pub const KEY_CAMPAIGN_THRESHOLD: &str = "campaign_threshold";
pub const DEFAULT_CAMPAIGN_THRESHOLD: i64 = 10;

/// Number of tables shown on the order form
pub const KEY_TABLE_COUNT: &str = "table_count";
pub const DEFAULT_TABLE_COUNT: i64 = 20;

/// Cached campaign settings
#[derive(Clone)]
pub struct SettingsService {
    pool: SqlitePool,
    cache: Arc<DashMap<&'static str, i64>>,
}

impl SettingsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Current campaign threshold, cached after first read
    pub async fn campaign_threshold(&self) -> i64 {
        self.cached(KEY_CAMPAIGN_THRESHOLD, DEFAULT_CAMPAIGN_THRESHOLD)
            .await
    }

    /// Current table count, cached after first read
    pub async fn table_count(&self) -> i64 {
        self.cached(KEY_TABLE_COUNT, DEFAULT_TABLE_COUNT).await
    }

    pub async fn set_campaign_threshold(&self, value: i64) -> AppResult<()> {
        self.store(KEY_CAMPAIGN_THRESHOLD, value).await
    }

    pub async fn set_table_count(&self, value: i64) -> AppResult<()> {
        self.store(KEY_TABLE_COUNT, value).await
    }

    async fn cached(&self, key: &'static str, default: i64) -> i64 {
        if let Some(value) = self.cache.get(key) {
            return *value;
        }

        // Any read failure falls back to the default; the bar must
        // keep serving even with a broken settings table.
        let value = match settings::get(&self.pool, key).await {
            Ok(Some(raw)) => raw.parse::<i64>().unwrap_or(default),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "settings read failed, using default");
                default
            }
        };

        self.cache.insert(key, value);
        value
    }

    async fn store(&self, key: &'static str, value: i64) -> AppResult<()> {
        if value < 1 {
            return Err(AppError::validation(format!("{key} must be at least 1")));
        }
        settings::set(&self.pool, key, &value.to_string()).await?;
        self.cache.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn defaults_when_unset() {
        let service = SettingsService::new(test_pool().await);
        assert_eq!(service.campaign_threshold().await, 10);
        assert_eq!(service.table_count().await, 20);
    }

    #[tokio::test]
    async fn write_updates_cache_synchronously() {
        let service = SettingsService::new(test_pool().await);
        // Prime the cache with the default first
        assert_eq!(service.campaign_threshold().await, 10);

        service.set_campaign_threshold(12).await.unwrap();
        assert_eq!(service.campaign_threshold().await, 12);
    }

    #[tokio::test]
    async fn persisted_value_read_on_cold_cache() {
        let pool = test_pool().await;
        settings::set(&pool, KEY_CAMPAIGN_THRESHOLD, "7").await.unwrap();

        let service = SettingsService::new(pool);
        assert_eq!(service.campaign_threshold().await, 7);
    }

    #[tokio::test]
    async fn rejects_values_below_one() {
        let service = SettingsService::new(test_pool().await);
        assert!(service.set_campaign_threshold(0).await.is_err());
        assert!(service.set_table_count(0).await.is_err());
    }

    #[tokio::test]
    async fn unparsable_value_falls_back_to_default() {
        let pool = test_pool().await;
        settings::set(&pool, KEY_CAMPAIGN_THRESHOLD, "not-a-number")
            .await
            .unwrap();

        let service = SettingsService::new(pool);
        assert_eq!(service.campaign_threshold().await, 10);
    }
}
