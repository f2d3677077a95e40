//! Balance cache interface used by the read path.
use async_trait::async_trait;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/value).
///
/// Note:
/// - We keep this independent from `AppError`; the handler decides how each
///   category maps to a response (today: all of them fail the request).
/// - A miss is an error here, not an `Option`: the external populator is
///   expected to hold every live account, so an absent key is a load failure.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("no cached balance for account {0}")]
    Miss(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// A minimal balance cache interface.
///
/// This service performs exactly one kind of access: a point read of the
/// balance for an account. Population, refresh and eviction belong to the
/// external cache owner, so no write operations are exposed.
///
/// Implementations must be Send + Sync; the router shares one behind an Arc.
#[async_trait]
pub trait BalanceCache: Send + Sync + 'static {
    // Returns the cache backend name (for logging/metrics).
    fn backend_name(&self) -> &'static str;

    // Read the balance for one account.
    async fn get_balance(&self, account_id: &str) -> CacheResult<i64>;
}
