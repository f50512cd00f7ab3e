//! Local filesystem object store
//!
//! Keys map onto relative paths under a root directory. Writes go to a
//! uniquely named sibling file first and are renamed into place, so readers
//! never observe a half-written partition.

use crate::error::{Result, SkillsMlError};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Object store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path, rejecting keys that escape the root
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(SkillsMlError::invalid_field(
                "key",
                format!("'{}' is not a relative object key", key),
            ));
        }
        Ok(self.root.join(relative))
    }
}

fn unavailable(action: &str, path: &Path, err: std::io::Error) -> SkillsMlError {
    SkillsMlError::StoreUnavailable(format!("{} {}: {}", action, path.display(), err))
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable("reading", &path, e)),
        }
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable("creating", parent, e))?;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| unavailable("writing", &tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(unavailable("renaming into", &path, e));
        }

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_object_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        assert!(store.get("prop/2016-01-01.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_creates_directories() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path().join("nested"));

        store.put("prop/2016-01-01.json", b"{\"1\":1}").await.unwrap();

        assert!(dir.path().join("nested/prop/2016-01-01.json").exists());
        assert_eq!(
            store.get("prop/2016-01-01.json").await.unwrap(),
            Some(b"{\"1\":1}".to_vec())
        );
    }

    #[tokio::test]
    async fn test_put_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        store.put("prop/k.json", b"1").await.unwrap();
        store.put("prop/k.json", b"2").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("prop"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.get("prop/k.json").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());
        assert!(store.get("../outside.json").await.is_err());
        assert!(store.put("/abs.json", b"x").await.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_root_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let file_root = dir.path().join("not-a-dir");
        std::fs::write(&file_root, b"plain file").unwrap();
        let store = FsStore::new(&file_root);

        let err = store.put("prop/k.json", b"x").await.unwrap_err();
        assert!(matches!(err, SkillsMlError::StoreUnavailable(_)));
    }
}
