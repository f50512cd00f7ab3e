//! Storage layer for computed property caches
//!
//! Provides the key-value object store abstraction that computed properties
//! persist into, plus an in-memory and a local filesystem implementation.
//! Keys are path-like (`<property_name>/<date_key>.json`) and are resolved
//! relative to each store's base location.

pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::InMemoryStore;

use crate::error::Result;
use async_trait::async_trait;

/// Object store trait defining all required operations
///
/// Failures to reach the backend surface as
/// [`SkillsMlError::StoreUnavailable`](crate::error::SkillsMlError::StoreUnavailable).
/// Implementations do not retry.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object stored under `key`, or `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous object
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Human-readable location, used in log lines
    fn describe(&self) -> String;
}

/// Compose the cache key for a property partition
pub fn partition_key(property_name: &str, date_key: &str) -> String {
    format!("{}/{}.json", property_name, date_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_key() {
        assert_eq!(
            partition_key("yearly_pay", "2016-01-01"),
            "yearly_pay/2016-01-01.json"
        );
    }
}
