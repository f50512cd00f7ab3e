//! Layered configuration for skills-ml
//!
//! Values are resolved from, in increasing precedence:
//! 1. Built-in defaults
//! 2. An optional TOML file (`skills-ml.toml` or an explicit path)
//! 3. Environment variables prefixed `SKILLS_ML` (e.g. `SKILLS_ML__STORAGE__PATH`)

use crate::error::{Result, SkillsMlError};
use crate::storage::{FsStore, InMemoryStore, ObjectStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "skills-ml";

/// Environment variable prefix
const ENV_PREFIX: &str = "SKILLS_ML";

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendKind {
    /// Local directory tree
    Filesystem,
    /// Process-local map, lost on exit
    Memory,
}

/// Where computed property caches live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `filesystem` or `memory`
    pub backend: String,

    /// Filesystem root for caches
    pub path: String,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsMlConfig {
    pub storage: StorageConfig,

    /// Default log level for the binary
    pub log_level: String,
}

impl Default for SkillsMlConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: "filesystem".to_string(),
                path: "computed_properties".to_string(),
            },
            log_level: "info".to_string(),
        }
    }
}

impl StorageConfig {
    /// Parse the configured backend name
    pub fn backend_kind(&self) -> Result<StorageBackendKind> {
        match self.backend.as_str() {
            "filesystem" => Ok(StorageBackendKind::Filesystem),
            "memory" => Ok(StorageBackendKind::Memory),
            other => Err(SkillsMlError::Configuration(format!(
                "unknown storage backend '{}', expected filesystem or memory",
                other
            ))),
        }
    }
}

impl SkillsMlConfig {
    /// Load configuration, optionally from an explicit file path
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("storage.backend", defaults.storage.backend.clone())?
            .set_default("storage.path", defaults.storage.path.clone())?
            .set_default("log_level", defaults.log_level.clone())?;

        builder = match path {
            Some(p) => {
                debug!("Loading configuration from {}", p.display());
                builder.add_source(config::File::from(p).required(true))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: SkillsMlConfig = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.path.trim().is_empty() {
            return Err(SkillsMlError::Configuration(
                "storage.path must not be empty".to_string(),
            ));
        }
        self.storage.backend_kind()?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(SkillsMlError::Configuration(format!(
                "unknown log_level '{}'",
                other
            ))),
        }
    }

    /// Build the configured object store
    pub fn build_store(&self) -> Result<Arc<dyn ObjectStore>> {
        let store: Arc<dyn ObjectStore> = match self.storage.backend_kind()? {
            StorageBackendKind::Filesystem => Arc::new(FsStore::new(&self.storage.path)),
            StorageBackendKind::Memory => Arc::new(InMemoryStore::new()),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_default_config_is_valid() {
        let config = SkillsMlConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.storage.backend_kind().unwrap(),
            StorageBackendKind::Filesystem
        );
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut config = SkillsMlConfig::default();
        config.storage.path = "  ".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("storage.path must not be empty"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = SkillsMlConfig::default();
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(SkillsMlError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[storage]\nbackend = \"s3\"").unwrap();

        let err = SkillsMlConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, SkillsMlError::Configuration(_)));
        assert!(err.to_string().contains("unknown storage backend 's3'"));

        let mut config = SkillsMlConfig::default();
        config.storage.backend = "s3".to_string();
        assert!(matches!(
            config.build_store(),
            Err(SkillsMlError::Configuration(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\n[storage]\nbackend = \"memory\"\npath = \"/tmp/props\""
        )
        .unwrap();

        let config = SkillsMlConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.storage.backend_kind().unwrap(),
            StorageBackendKind::Memory
        );
        assert!(config.build_store().is_ok());
        assert_eq!(config.storage.path, "/tmp/props");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = SkillsMlConfig::load(Some(Path::new("/nonexistent/skills-ml.toml")));
        assert!(matches!(result, Err(SkillsMlError::Config(_))));
    }
}
