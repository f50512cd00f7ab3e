//! Concrete [`PropertyComputer`](super::PropertyComputer) variants
//!
//! Computers that wrap an injected capability (geography lookup, occupation
//! classification, skill extraction) take it as a trait object so callers can
//! plug in their own algorithms.

pub mod geography;
pub mod posting_id_present;
pub mod skill_counts;
pub mod soc_classify;
pub mod title_clean;
pub mod yearly_pay;

pub use geography::{GeoQuerier, Geography};
pub use posting_id_present::PostingIdPresent;
pub use skill_counts::{SkillCounts, SkillExtractor};
pub use soc_classify::{SocClassifier, SocClassifyProperty};
pub use title_clean::{TitleCleanPhaseOne, TitleCleanPhaseTwo, TitleDictionary};
pub use yearly_pay::YearlyPay;
