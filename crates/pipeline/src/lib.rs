pub mod batch;
pub mod error;
pub mod orchestrator;
pub mod pacing;
pub mod policy;

pub use batch::{BatchConfig, BatchItem, PolicyAnalyzer};
pub use error::PipelineError;
pub use orchestrator::{AnalysisRun, Pipeline};
pub use pacing::Pacer;
pub use policy::{AnalysisPlan, SizePolicy};
