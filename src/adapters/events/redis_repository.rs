//! Redis processed-webhook store.
//!
//! Keys are `webhook:processed:<idempotency key>`, written with
//! `SET NX EX` so concurrent deliveries agree on one winner. Redis expires
//! records after the configured TTL, so `delete_before` has nothing to do.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::ports::{RepositoryError, SaveResult, WebhookEventRecord, WebhookEventRepository};

const KEY_PREFIX: &str = "webhook:processed:";

#[derive(Clone)]
pub struct RedisWebhookEventRepository {
    conn: MultiplexedConnection,
    ttl: Duration,
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    order_id: String,
    status: Option<String>,
    processed_at: u64,
}

impl RedisWebhookEventRepository {
    pub fn new(conn: MultiplexedConnection, ttl: Duration) -> Self {
        Self { conn, ttl }
    }

    fn storage_key(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

fn unavailable(e: redis::RedisError) -> RepositoryError {
    RepositoryError(e.to_string())
}

#[async_trait]
impl WebhookEventRepository for RedisWebhookEventRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<WebhookEventRecord>, RepositoryError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::storage_key(key))
            .await
            .map_err(unavailable)?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let stored: StoredRecord = serde_json::from_str(&raw)
            .map_err(|e| RepositoryError(format!("corrupt record for {}: {}", key, e)))?;

        Ok(Some(WebhookEventRecord {
            key: key.to_string(),
            order_id: stored.order_id,
            status: stored.status,
            processed_at: Timestamp::from_unix_secs(stored.processed_at),
        }))
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, RepositoryError> {
        let value = serde_json::to_string(&StoredRecord {
            order_id: record.order_id,
            status: record.status,
            processed_at: record.processed_at.as_unix_secs(),
        })
        .map_err(|e| RepositoryError(e.to_string()))?;

        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(Self::storage_key(&record.key))
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        Ok(match reply {
            Some(_) => SaveResult::Inserted,
            None => SaveResult::AlreadyExists,
        })
    }

    async fn release(&self, key: &str) -> Result<(), RepositoryError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn
            .del(Self::storage_key(key))
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete_before(&self, _cutoff: Timestamp) -> Result<u64, RepositoryError> {
        Ok(0)
    }
}

impl std::fmt::Debug for RedisWebhookEventRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisWebhookEventRepository")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
