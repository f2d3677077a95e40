pub mod client;
pub mod valkey;

pub use client::{BalanceCache, CacheError};
pub use valkey::ValkeyBalanceCache;
