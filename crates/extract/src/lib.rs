//! Provider side of policy analysis: prompting chat models, recovering JSON
//! from their output, and the `AnalysisProvider` capability shared with the
//! rule-based analyzer.

pub mod error;
pub mod json;
pub mod llm;
pub mod prompt;
pub mod provider;

pub use error::ProviderError;
pub use json::{extract_json, parse_partial};
pub use llm::ChatClient;
pub use provider::{AnalysisProvider, AnalysisScope, LlmProvider};
