//! Computed properties over job postings
//!
//! A computed property derives one value per posting (a cleaned title, a
//! normalized salary, an occupation code, ...) and persists the results per
//! date partition so they are only ever computed once.
//!
//! # Architecture
//!
//! - **PropertyComputer**: the variant-specific logic. Names the property,
//!   describes its output columns and computes the value for one posting.
//! - **ComputedProperty**: the cache-or-compute driver. Groups postings by
//!   date partition, skips ids already cached, computes the rest and writes
//!   each touched partition back to the [`ObjectStore`] once.
//! - **PropertyFrame**: tabular view of one partition for reporting.
//!
//! # Usage
//!
//! ```rust,no_run
//! use skills_ml::computed_properties::{computers::YearlyPay, ComputedProperty};
//! use skills_ml::storage::InMemoryStore;
//! use skills_ml::JobPosting;
//! use std::sync::Arc;
//!
//! # async fn example() -> skills_ml::Result<()> {
//! let property = ComputedProperty::new(YearlyPay, Arc::new(InMemoryStore::new()));
//! let postings = vec![JobPosting::from_slice(
//!     br#"{"id": 1, "datePosted": "2016-01-01", "baseSalary": {"salaryFrequency": "yearly", "minValue": 50000}}"#,
//! )?];
//!
//! property.compute_on_collection(&postings).await?;
//! let cache = property.cache_for_key("2016-01-01").await?;
//! assert_eq!(cache["1"], 50000.0);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod aggregators;
pub mod computers;
pub mod frame;

pub use aggregate::AggregateFunction;
pub use aggregators::{aggregate_properties, AggregateRow};
pub use frame::PropertyFrame;

use crate::error::Result;
use crate::job_postings::JobPosting;
use crate::storage::{partition_key, ObjectStore};
use crate::types::{DateKey, PostingId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Persisted mapping of posting id to computed value for one partition
pub type PropertyCache = BTreeMap<String, Value>;

/// Postings between progress log lines
const PROGRESS_INTERVAL: usize = 1000;

/// Output column descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyColumn {
    pub name: String,
    pub description: String,

    /// Aggregations that make sense over this column, used by reporting
    pub compatible_aggregate_functions: Vec<AggregateFunction>,
}

impl PropertyColumn {
    /// Create a column descriptor
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        compatible_aggregate_functions: Vec<AggregateFunction>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            compatible_aggregate_functions,
        }
    }
}

/// Variant-specific logic of a computed property
pub trait PropertyComputer: Send + Sync {
    /// Stable name, also the storage prefix of the property's caches
    fn property_name(&self) -> String;

    /// What the property measures
    fn property_description(&self) -> String;

    /// Output columns
    fn property_columns(&self) -> Vec<PropertyColumn>;

    /// Compute the value for a single posting
    fn compute(&self, posting: &JobPosting) -> Result<Value>;
}

/// Counts from one [`ComputedProperty::compute_on_collection`] call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComputeSummary {
    /// Newly computed values
    pub computed: usize,
    /// Postings whose value was already cached
    pub cached: usize,
    /// Postings skipped because their computation failed
    pub failed: usize,
    /// Partitions written back to the store
    pub partitions_written: usize,
}

/// Cache-or-compute driver for a [`PropertyComputer`]
#[derive(Clone)]
pub struct ComputedProperty {
    computer: Arc<dyn PropertyComputer>,
    store: Arc<dyn ObjectStore>,
}

impl ComputedProperty {
    /// Bind a computer to the store its caches live in
    pub fn new(computer: impl PropertyComputer + 'static, store: Arc<dyn ObjectStore>) -> Self {
        Self::from_arc(Arc::new(computer), store)
    }

    /// Bind an already shared computer
    pub fn from_arc(computer: Arc<dyn PropertyComputer>, store: Arc<dyn ObjectStore>) -> Self {
        Self { computer, store }
    }

    pub fn property_name(&self) -> String {
        self.computer.property_name()
    }

    pub fn property_description(&self) -> String {
        self.computer.property_description()
    }

    pub fn property_columns(&self) -> Vec<PropertyColumn> {
        self.computer.property_columns()
    }

    /// Compute the property for every posting not yet cached
    ///
    /// Every posting must carry an `id` and a `datePosted`; both are checked
    /// before anything is computed or written. Postings whose computation
    /// fails are logged and left out of the cache, the rest of their
    /// partition is still persisted.
    pub async fn compute_on_collection(&self, postings: &[JobPosting]) -> Result<ComputeSummary> {
        let name = self.property_name();
        info!("Computing {} on {} job postings", name, postings.len());

        let mut partitions: BTreeMap<DateKey, Vec<(&PostingId, &JobPosting)>> = BTreeMap::new();
        for posting in postings {
            let id = posting.id()?;
            let date_key = posting.date_key()?;
            partitions.entry(date_key).or_default().push((id, posting));
        }

        let mut summary = ComputeSummary::default();
        let mut processed = 0usize;

        for (date_key, members) in partitions {
            let cache = self.cache_for_key(date_key.as_str()).await?;
            let mut fresh = PropertyCache::new();

            for (id, posting) in members {
                processed += 1;
                if processed % PROGRESS_INTERVAL == 0 {
                    info!("Computation of {} on posting {}", name, processed);
                }

                if cache.contains_key(id.as_str()) || fresh.contains_key(id.as_str()) {
                    summary.cached += 1;
                    continue;
                }

                match self.computer.compute(posting) {
                    Ok(value) => {
                        fresh.insert(id.to_string(), value);
                        summary.computed += 1;
                    }
                    Err(e) => {
                        warn!("Skipping posting {} for {}: {}", id, name, e);
                        summary.failed += 1;
                    }
                }
            }

            if fresh.is_empty() {
                debug!("No new values for {} on {}", name, date_key);
                continue;
            }

            self.save_partition(&date_key, fresh).await?;
            summary.partitions_written += 1;
        }

        info!(
            "Finished {}: {} computed, {} cached, {} failed",
            name, summary.computed, summary.cached, summary.failed
        );
        Ok(summary)
    }

    /// Persisted mapping for a partition, empty if never computed
    pub async fn cache_for_key(&self, date_key: &str) -> Result<PropertyCache> {
        let key = partition_key(&self.property_name(), date_key);
        match self.store.get(&key).await? {
            Some(bytes) => {
                let cache: PropertyCache = serde_json::from_slice(&bytes)?;
                debug!("Loaded {} cached values from {}", cache.len(), key);
                Ok(cache)
            }
            None => {
                debug!("No cache at {} in {}", key, self.store.describe());
                Ok(PropertyCache::new())
            }
        }
    }

    /// Partition as a table with one row per posting id
    pub async fn df_for_key(&self, date_key: &str) -> Result<PropertyFrame> {
        let cache = self.cache_for_key(date_key).await?;
        Ok(PropertyFrame::from_cache(&cache, &self.property_columns()))
    }

    /// Merge fresh values into the stored partition and write it back
    ///
    /// The partition is re-read right before writing. Values already
    /// persisted win, so ids stored by a concurrent writer since our first
    /// read are kept rather than clobbered.
    async fn save_partition(&self, date_key: &DateKey, fresh: PropertyCache) -> Result<()> {
        let key = partition_key(&self.property_name(), date_key.as_str());
        let mut merged = self.cache_for_key(date_key.as_str()).await?;
        let added = fresh.len();
        for (id, value) in fresh {
            merged.entry(id).or_insert(value);
        }

        let bytes = serde_json::to_vec(&merged)?;
        self.store.put(&key, &bytes).await?;
        debug!("Saved {} values ({} new) to {}", merged.len(), added, key);
        Ok(())
    }
}

impl std::fmt::Debug for ComputedProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedProperty")
            .field("property_name", &self.property_name())
            .field("store", &self.store.describe())
            .finish()
    }
}
