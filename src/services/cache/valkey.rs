use async_trait::async_trait;

use crate::services::cache::client::{BalanceCache, CacheError, CacheResult};

/// Valkey/Redis-backed balance cache.
///
/// Reads `GET <prefix><account_id>` and parses the reply as a signed integer.
/// The keyspace is populated and refreshed by an external process; this
/// client never writes.
#[derive(Clone, Debug)]
pub struct ValkeyBalanceCache {
    manager: redis::aio::ConnectionManager,
    key_prefix: String,
}

impl ValkeyBalanceCache {
    // Create a Valkey client from a URL like `redis://localhost:6379`
    pub async fn new(url: &str, key_prefix: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::BackendConnection(e.to_string()))?;

        Ok(Self {
            manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key_for(&self, account_id: &str) -> String {
        format!("{}{}", self.key_prefix, account_id)
    }
}

#[async_trait]
impl BalanceCache for ValkeyBalanceCache {
    fn backend_name(&self) -> &'static str {
        "valkey"
    }

    async fn get_balance(&self, account_id: &str) -> CacheResult<i64> {
        // Use a clone of the connection manager
        let mut conn = self.manager.clone();

        let resp: Option<String> = redis::cmd("GET")
            .arg(self.key_for(account_id))
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::BackendCommand(e.to_string()))?;

        let raw = resp.ok_or_else(|| CacheError::Miss(account_id.to_string()))?;

        raw.parse::<i64>()
            .map_err(|_| CacheError::InvalidValue(format!("not an integer: {:?}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_url_is_a_connection_error() {
        // Invalid scheme fails at Client::open, before any I/O.
        let err = ValkeyBalanceCache::new("not-a-url", "balance:")
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::BackendConnection(_)));
    }
}
