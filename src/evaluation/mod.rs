//! Evaluation of classifiers against labelled results.
//!
//! # Architecture
//!
//! - **ResultGenerator**: yields encoded (prediction, truth) pairs and
//!   declares the [`TargetVariable`] they are encoded against
//! - **ClassificationEvaluator**: decodes the pairs once and exposes
//!   memoized accuracy, per-label and averaged precision/recall/F1 and the
//!   confusion matrix
//! - **OccupationClassificationEvaluator**: adds major group roll-ups for
//!   hierarchical occupation codes
//!
//! # Usage
//!
//! ```rust
//! use skills_ml::evaluation::{OccupationClassificationEvaluator, SocTarget, VecResultGenerator};
//!
//! # fn example() -> skills_ml::Result<()> {
//! let generator = VecResultGenerator::from_labels(
//!     SocTarget::full_soc(["11-1011.00", "15-1132.00", "15-1133.00"]),
//!     &[("15-1132.00", "15-1133.00"), ("11-1011.00", "11-1011.00")],
//! )?;
//! let evaluator = OccupationClassificationEvaluator::new(&generator)?;
//!
//! assert_eq!(evaluator.base().accuracy(), 0.5);
//! assert_eq!(evaluator.accuracy_major_group(), Some(1.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod classification;
pub mod metrics;
pub mod occupation;
pub mod target;

pub use classification::{ClassificationEvaluator, ClassificationReport};
pub use metrics::LabelScores;
pub use occupation::{major_group, Granularity, MajorGroupReport, OccupationClassificationEvaluator};
pub use target::{LabelEncoder, ResultGenerator, SocTarget, TargetVariable, VecResultGenerator};
