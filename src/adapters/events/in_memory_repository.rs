//! In-memory processed-webhook store.
//!
//! Records expire after the dedup TTL, the same retention the Redis store
//! gets from `EX`. Expired records read as absent; `purge_expired` removes
//! them and is meant to run on a timer. A restart forgets every key, so
//! redeliveries after a restart run their effects again.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::WebhookConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{RepositoryError, SaveResult, WebhookEventRecord, WebhookEventRepository};

#[derive(Debug)]
pub struct InMemoryWebhookEventRepository {
    records: RwLock<HashMap<String, WebhookEventRecord>>,
    ttl: Duration,
}

impl InMemoryWebhookEventRepository {
    /// Store with the default dedup TTL.
    pub fn new() -> Self {
        Self::with_ttl(WebhookConfig::default().dedup_ttl())
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of records held, expired ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drops records older than the TTL.
    pub async fn purge_expired(&self) -> u64 {
        let cutoff = self.cutoff();
        let removed = Self::retain_from(&mut *self.records.write().await, cutoff);
        if removed > 0 {
            tracing::debug!(removed, "Purged expired webhook records");
        }
        removed
    }

    fn cutoff(&self) -> Timestamp {
        Timestamp::now().minus(self.ttl)
    }

    fn retain_from(records: &mut HashMap<String, WebhookEventRecord>, cutoff: Timestamp) -> u64 {
        let before = records.len();
        records.retain(|_, record| record.processed_at >= cutoff);
        (before - records.len()) as u64
    }
}

impl Default for InMemoryWebhookEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<WebhookEventRecord>, RepositoryError> {
        let cutoff = self.cutoff();
        Ok(self
            .records
            .read()
            .await
            .get(key)
            .filter(|record| record.processed_at >= cutoff)
            .cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, RepositoryError> {
        let cutoff = self.cutoff();
        let mut records = self.records.write().await;
        if let Some(existing) = records.get(&record.key) {
            if existing.processed_at >= cutoff {
                return Ok(SaveResult::AlreadyExists);
            }
        }
        records.insert(record.key.clone(), record);
        Ok(SaveResult::Inserted)
    }

    async fn release(&self, key: &str) -> Result<(), RepositoryError> {
        self.records.write().await.remove(key);
        Ok(())
    }

    async fn delete_before(&self, cutoff: Timestamp) -> Result<u64, RepositoryError> {
        Ok(Self::retain_from(&mut *self.records.write().await, cutoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str) -> WebhookEventRecord {
        record_at(key, Timestamp::now())
    }

    fn record_at(key: &str, processed_at: Timestamp) -> WebhookEventRecord {
        WebhookEventRecord {
            key: key.to_string(),
            order_id: "order_1".to_string(),
            status: Some("SUCCESS".to_string()),
            processed_at,
        }
    }

    #[tokio::test]
    async fn save_is_insert_if_absent() {
        let repo = InMemoryWebhookEventRepository::new();

        assert_eq!(repo.save(record("k1")).await.unwrap(), SaveResult::Inserted);
        assert_eq!(repo.save(record("k1")).await.unwrap(), SaveResult::AlreadyExists);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn find_returns_saved_record() {
        let repo = InMemoryWebhookEventRepository::new();
        assert!(repo.find_by_key("k1").await.unwrap().is_none());

        repo.save(record("k1")).await.unwrap();

        let found = repo.find_by_key("k1").await.unwrap().unwrap();
        assert_eq!(found.order_id, "order_1");
    }

    #[tokio::test]
    async fn release_frees_the_key() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.save(record("k1")).await.unwrap();

        repo.release("k1").await.unwrap();

        assert!(repo.find_by_key("k1").await.unwrap().is_none());
        assert_eq!(repo.save(record("k1")).await.unwrap(), SaveResult::Inserted);
    }

    #[tokio::test]
    async fn expired_record_reads_as_absent_and_can_be_reclaimed() {
        let repo = InMemoryWebhookEventRepository::with_ttl(Duration::from_secs(60));
        let stale = Timestamp::now().minus(Duration::from_secs(120));
        repo.save(record_at("k1", stale)).await.unwrap();

        assert!(repo.find_by_key("k1").await.unwrap().is_none());
        assert_eq!(repo.save(record("k1")).await.unwrap(), SaveResult::Inserted);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn purge_expired_drops_only_stale_records() {
        let repo = InMemoryWebhookEventRepository::with_ttl(Duration::from_secs(60));
        let stale = Timestamp::now().minus(Duration::from_secs(120));
        repo.save(record_at("old", stale)).await.unwrap();
        repo.save(record("fresh")).await.unwrap();

        assert_eq!(repo.purge_expired().await, 1);
        assert_eq!(repo.len().await, 1);
        assert!(repo.find_by_key("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_before_counts_removed_records() {
        let repo = InMemoryWebhookEventRepository::new();
        repo.save(record_at("a", Timestamp::from_unix_secs(1_000))).await.unwrap();
        repo.save(record_at("b", Timestamp::from_unix_secs(2_000))).await.unwrap();
        repo.save(record_at("c", Timestamp::from_unix_secs(3_000))).await.unwrap();

        let removed = repo
            .delete_before(Timestamp::from_unix_secs(2_500))
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(repo.len().await, 1);
    }
}
