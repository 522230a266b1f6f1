use analysis::{AnalysisMethod, PartialAnalysis, RuleBasedAnalyzer};
use async_trait::async_trait;
use tracing::debug;

use crate::error::ProviderError;
use crate::json::parse_partial;
use crate::llm::ChatClient;
use crate::prompt::build_analysis_prompt;

/// How much of the policy a single provider call sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisScope {
    Full,
    Chunk { index: usize, total: usize },
}

/// Something that can turn policy text into a (possibly partial) analysis.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    fn method(&self) -> AnalysisMethod;

    fn model(&self) -> Option<&str> {
        None
    }

    async fn analyze(&self, text: &str, scope: AnalysisScope) -> Result<PartialAnalysis, ProviderError>;
}

/// Analysis through a chat-completion model.
pub struct LlmProvider {
    client: ChatClient,
    max_tokens: u32,
}

impl LlmProvider {
    pub fn new(client: ChatClient, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }
}

#[async_trait]
impl AnalysisProvider for LlmProvider {
    fn method(&self) -> AnalysisMethod {
        self.client.method()
    }

    fn model(&self) -> Option<&str> {
        Some(self.client.model())
    }

    async fn analyze(&self, text: &str, scope: AnalysisScope) -> Result<PartialAnalysis, ProviderError> {
        let prompt = build_analysis_prompt(text, scope);
        let raw = self.client.complete(&prompt, self.max_tokens).await?;
        debug!(provider = %self.method(), response_chars = raw.len(), "Received completion");

        parse_partial(&raw)
    }
}

#[async_trait]
impl AnalysisProvider for RuleBasedAnalyzer {
    fn method(&self) -> AnalysisMethod {
        AnalysisMethod::EnhancedRuleBased
    }

    async fn analyze(&self, text: &str, _scope: AnalysisScope) -> Result<PartialAnalysis, ProviderError> {
        Ok(RuleBasedAnalyzer::analyze(self, text).into())
    }
}
