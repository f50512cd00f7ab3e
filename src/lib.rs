//! skills-ml - job posting features and occupation classifier evaluation
//!
//! A Rust library for workforce analytics that provides:
//! - Job posting records with typed access to schema.org style fields
//! - Computed properties cached per date partition in an object store
//! - Cross-partition aggregation of computed properties
//! - Classification metrics with occupation major group roll-ups
//!
//! # Architecture
//!
//! The crate is organized into several layers:
//! - **Types**: Core identifiers (PostingId, DateKey)
//! - **Job postings**: Posting records and document text strategies
//! - **Storage**: Object stores (filesystem, in-memory)
//! - **Computed properties**: Per-posting features and their caches
//! - **Evaluation**: Classifier metrics over labelled results
//!
//! # Example
//!
//! ```ignore
//! use skills_ml::computed_properties::{computers::TitleCleanPhaseOne, ComputedProperty};
//! use skills_ml::{JobPosting, SkillsMlConfig};
//!
//! #[tokio::main]
//! async fn main() -> skills_ml::Result<()> {
//!     let config = SkillsMlConfig::load(None)?;
//!     let property = ComputedProperty::new(TitleCleanPhaseOne, config.build_store()?);
//!
//!     let postings = vec![JobPosting::from_slice(
//!         br#"{"id": 1, "datePosted": "2016-01-01", "title": "Software Engineer - Tulsa"}"#,
//!     )?];
//!     property.compute_on_collection(&postings).await?;
//!
//!     let cache = property.cache_for_key("2016-01-01").await?;
//!     assert_eq!(cache["1"], "software engineer tulsa");
//!     Ok(())
//! }
//! ```

pub mod computed_properties;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod job_postings;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use computed_properties::{ComputeSummary, ComputedProperty, PropertyComputer};
pub use config::SkillsMlConfig;
pub use error::{Result, SkillsMlError};
pub use evaluation::{ClassificationEvaluator, OccupationClassificationEvaluator};
pub use job_postings::JobPosting;
pub use storage::{FsStore, InMemoryStore, ObjectStore};
pub use types::{DateKey, PostingId};
