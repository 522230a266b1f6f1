use analysis::{
    AnalysisMethod, AnalysisOutcome, RuleBasedAnalyzer, StructuredAnalysis, merge, normalize,
};
use extract::{AnalysisProvider, AnalysisScope};
use ingest::{Chunker, generate_doc_id, truncate_chars};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::pacing::Pacer;
use crate::policy::{AnalysisPlan, SizePolicy};

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub outcome: AnalysisOutcome,
    /// Characters in the analyzed text.
    pub text_length: usize,
    /// Provider calls that produced a usable result.
    pub chunks_analyzed: usize,
    pub chunks_failed: usize,
    pub elapsed: Duration,
}

struct ProviderRun {
    analysis: StructuredAnalysis,
    chunks_analyzed: usize,
    chunks_failed: usize,
}

/// A provider run that produced nothing usable.
struct ProviderFailure {
    error: PipelineError,
    chunks_failed: usize,
}

impl ProviderFailure {
    fn new(error: impl Into<PipelineError>, chunks_failed: usize) -> Self {
        Self {
            error: error.into(),
            chunks_failed,
        }
    }
}

pub struct Pipeline {
    provider: Arc<dyn AnalysisProvider>,
    fallback: RuleBasedAnalyzer,
    policy: SizePolicy,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn AnalysisProvider>, policy: SizePolicy) -> Self {
        Self {
            provider,
            fallback: RuleBasedAnalyzer::new(),
            policy,
        }
    }

    /// A pipeline that never leaves the process.
    pub fn rule_based() -> Self {
        Self::new(Arc::new(RuleBasedAnalyzer::new()), SizePolicy::default())
    }

    pub fn method(&self) -> AnalysisMethod {
        self.provider.method()
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.model()
    }

    /// Analyze normalized policy text.
    ///
    /// Provider failures never surface here: they are logged and the text is
    /// re-analyzed with the rule-based analyzer, tagged with `ai_error`.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisRun, PipelineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let text_length = text.chars().count();
        let method = self.provider.method();
        let started = Instant::now();

        match self.run_provider(text).await {
            Ok(run) => {
                info!(
                    method = %method,
                    text_length,
                    chunks = run.chunks_analyzed,
                    failed = run.chunks_failed,
                    "Analysis completed"
                );
                Ok(AnalysisRun {
                    outcome: AnalysisOutcome::new(run.analysis, method),
                    text_length,
                    chunks_analyzed: run.chunks_analyzed,
                    chunks_failed: run.chunks_failed,
                    elapsed: started.elapsed(),
                })
            }
            Err(failure) => {
                warn!(
                    method = %method,
                    error = %failure.error,
                    failed = failure.chunks_failed,
                    "Provider analysis failed, using rule-based fallback"
                );
                Ok(AnalysisRun {
                    outcome: AnalysisOutcome::fallback(
                        self.fallback.analyze(text),
                        failure.error.to_string(),
                    ),
                    text_length,
                    chunks_analyzed: 0,
                    chunks_failed: failure.chunks_failed,
                    elapsed: started.elapsed(),
                })
            }
        }
    }

    async fn run_provider(&self, text: &str) -> Result<ProviderRun, ProviderFailure> {
        // Local analysis has no context window to respect.
        if !self.provider.method().is_external() {
            return self.analyze_single(text).await;
        }

        match self.policy.plan(text) {
            AnalysisPlan::Single => {
                debug!(path = "single", "Selected analysis path");
                let text = truncate_chars(text, self.policy.single_call_char_cap);
                self.analyze_single(text).await
            }
            AnalysisPlan::Chunked { chunk_chars } => {
                debug!(path = "chunked", chunk_chars, "Selected analysis path");
                self.analyze_chunked(text, chunk_chars).await
            }
        }
    }

    async fn analyze_single(&self, text: &str) -> Result<ProviderRun, ProviderFailure> {
        let partial = self
            .provider
            .analyze(text, AnalysisScope::Full)
            .await
            .map_err(|e| ProviderFailure::new(e, 1))?;

        Ok(ProviderRun {
            analysis: normalize(&partial),
            chunks_analyzed: 1,
            chunks_failed: 0,
        })
    }

    async fn analyze_chunked(
        &self,
        text: &str,
        chunk_chars: usize,
    ) -> Result<ProviderRun, ProviderFailure> {
        let chunks = Chunker::with_max_chars(chunk_chars).chunk_text(&generate_doc_id(text), text);
        let total = chunks.len();
        info!(chunks = total, "Analyzing policy in chunks");

        let mut pacer = Pacer::new(self.policy.chunk_delay);
        let mut partials = Vec::with_capacity(total);

        for chunk in &chunks {
            let body = truncate_chars(&chunk.text, self.policy.chunk_char_cap);
            let scope = AnalysisScope::Chunk {
                index: chunk.index,
                total,
            };

            debug!(chunk = chunk.index + 1, total, chars = chunk.char_len(), "Analyzing chunk");
            match pacer.run(self.provider.analyze(body, scope)).await {
                Ok(partial) => partials.push(Some(partial)),
                Err(e) => {
                    warn!(chunk = chunk.index + 1, total, error = %e, "Chunk analysis failed");
                    partials.push(None);
                }
            }
        }

        let chunks_failed = partials.iter().filter(|p| p.is_none()).count();
        let analysis = merge(&partials).map_err(|e| ProviderFailure::new(e, chunks_failed))?;

        Ok(ProviderRun {
            analysis,
            chunks_analyzed: total - chunks_failed,
            chunks_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rule_based_pipeline() {
        let pipeline = Pipeline::rule_based();
        let run = pipeline
            .analyze("We collect your email address. You may request deletion of your data.")
            .await
            .unwrap();

        assert_eq!(run.outcome.analysis_method, AnalysisMethod::EnhancedRuleBased);
        assert!(!run.outcome.is_fallback());
        assert_eq!(run.chunks_analyzed, 1);
        assert!(run.outcome.analysis.user_rights.deletion);
    }

    #[tokio::test]
    async fn test_rule_based_pipeline_matches_direct_analysis() {
        let text = "This Privacy Policy explains how we share data with third parties for advertising. \
                    We use cookies and encryption.";
        let run = Pipeline::rule_based().analyze(text).await.unwrap();

        assert_eq!(run.outcome.analysis, RuleBasedAnalyzer::new().analyze(text));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let err = Pipeline::rule_based().analyze("   \n ").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
        assert!(err.is_input_error());
    }
}
