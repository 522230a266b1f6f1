//! Privacy policy analysis model: the structured result schema, keyword
//! detectors, scoring rules, the rule-based analyzer and the chunk merge.

pub mod detectors;
pub mod merge;
pub mod rule_based;
pub mod schema;
pub mod score;
pub mod scoring;
pub mod templates;

pub use merge::{MergeError, merge, normalize};
pub use rule_based::RuleBasedAnalyzer;
pub use schema::{AnalysisMethod, AnalysisOutcome, NOT_SPECIFIED, PartialAnalysis, StructuredAnalysis};
pub use score::{Grade, privacy_score};
