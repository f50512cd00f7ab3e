//! In-memory object store
//!
//! Clones share the same underlying map, which lets callers hand one clone to
//! a computed property and keep another to inspect what was written.

use crate::error::Result;
use crate::storage::ObjectStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local object store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether nothing has been stored yet
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// All keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let guard = self.objects.read().await;
        let mut keys: Vec<String> = guard.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let guard = self.objects.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        debug!("Storing {} bytes under {}", bytes.len(), key);
        let mut guard = self.objects.write().await;
        guard.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_none() {
        let store = InMemoryStore::new();
        let value = tokio_test::block_on(store.get("nothing/here.json")).unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryStore::new();
        store.put("a/b.json", b"{}").await.unwrap();

        assert_eq!(store.get("a/b.json").await.unwrap(), Some(b"{}".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_objects() {
        let store = InMemoryStore::new();
        let observer = store.clone();
        store.put("k.json", b"[]").await.unwrap();

        assert_eq!(observer.keys().await, vec!["k.json".to_string()]);
        assert!(!observer.is_empty().await);
    }
}
