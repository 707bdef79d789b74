/// Redis list storage with graceful degradation.
///
/// Writes return `bool` and reads return `Option<T>`. On any Redis error the
/// operation logs a warning and reports failure; callers keep working without
/// Redis.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

use crate::error::CommonError;

#[derive(Clone)]
pub struct RedisStore {
    client: Option<redis::Client>,
}

impl RedisStore {
    /// Build a store for `url`. A `None` URL or an invalid one yields a store
    /// whose operations are all no-ops.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, store disabled"))
                .ok()
        });
        Self { client }
    }

    /// PING the server. Returns `true` if Redis is reachable.
    pub async fn is_available(&self) -> bool {
        let Ok(mut conn) = self.try_connection().await else {
            return false;
        };
        let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    /// Read the whole list stored at `key`. A missing key reads as an empty list.
    pub async fn list_all(&self, key: &str) -> Option<Vec<String>> {
        let mut conn = self.connection().await?;
        conn.lrange(key, 0, -1)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis LRANGE failed"))
            .ok()
    }

    /// Append `value` to the list at `key`, keep only the newest `max_len`
    /// entries and refresh the key's TTL. Runs as one MULTI/EXEC.
    pub async fn push_capped(&self, key: &str, value: &str, max_len: usize, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        let keep_from = -(max_len.max(1) as isize);
        let result: Result<(), _> = redis::pipe()
            .atomic()
            .rpush(key, value)
            .ignore()
            .ltrim(key, keep_from, -1)
            .ignore()
            .expire(key, expire_secs(ttl_secs))
            .ignore()
            .query_async(&mut conn)
            .await;
        result
            .inspect_err(|e| warn!(error = %e, key, "redis RPUSH/LTRIM failed"))
            .is_ok()
    }

    pub async fn delete(&self, key: &str) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.del::<_, ()>(key)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis DEL failed"))
            .is_ok()
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        self.try_connection()
            .await
            .inspect_err(|e| {
                if !matches!(e, CommonError::RedisUnavailable) {
                    warn!(error = %e, "redis connection failed");
                }
            })
            .ok()
    }

    async fn try_connection(&self) -> Result<MultiplexedConnection, CommonError> {
        let client = self.client.as_ref().ok_or(CommonError::RedisUnavailable)?;
        Ok(client.get_multiplexed_async_connection().await?)
    }
}

/// EXPIRE takes a signed count and deletes the key when it is negative.
fn expire_secs(ttl_secs: u64) -> i64 {
    i64::try_from(ttl_secs).unwrap_or(i64::MAX)
}
