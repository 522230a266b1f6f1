use analysis::RuleBasedAnalyzer;
use anyhow::Context;
use extract::{AnalysisProvider, ChatClient, LlmProvider};
use ingest::{HttpFetcher, RetryPolicy};
use pipeline::{Pipeline, PolicyAnalyzer};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::ReportCache;
use crate::config::{AppConfig, ProviderConfig, ProviderKind};
use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<PolicyAnalyzer>,
    pub cache: Arc<ReportCache>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let provider = build_provider(&config.provider)?;
        let pipeline = Pipeline::new(provider, config.size_policy());
        info!(method = %pipeline.method(), model = ?pipeline.model(), "Analysis provider configured");

        let retry = RetryPolicy::new(
            config.retry.max_retries,
            config.retry.initial_backoff_ms,
            config.retry.max_backoff_ms,
        );
        let fetcher =
            HttpFetcher::new(retry, config.provider.timeout()).context("Failed to build HTTP client")?;

        let analyzer = PolicyAnalyzer::new(Arc::new(pipeline), Arc::new(fetcher), config.batch_config());
        let cache = ReportCache::new(config.cache.enabled, config.cache.max_entries);

        Ok(Self::from_parts(analyzer, cache))
    }

    pub fn from_parts(analyzer: PolicyAnalyzer, cache: ReportCache) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            cache: Arc::new(cache),
            metrics: Metrics::new(),
        }
    }
}

/// Build the configured provider. External providers without a key degrade
/// to rule-based analysis.
pub fn build_provider(config: &ProviderConfig) -> anyhow::Result<Arc<dyn AnalysisProvider>> {
    if config.kind == ProviderKind::RuleBased {
        return Ok(Arc::new(RuleBasedAnalyzer::new()));
    }

    let Some(api_key) = config.api_key() else {
        warn!(provider = ?config.kind, "No API key configured, falling back to rule-based analysis");
        return Ok(Arc::new(RuleBasedAnalyzer::new()));
    };

    let api_key = api_key.to_string();
    let model = config.model.clone();
    let client = match config.kind {
        ProviderKind::OpenAi => ChatClient::openai(api_key, model, config.timeout()),
        _ => ChatClient::mistral(api_key, model, config.timeout()),
    }
    .context("Failed to build LLM client")?;

    let client = match &config.base_url {
        Some(base_url) => client.with_base_url(base_url.clone()),
        None => client,
    };

    Ok(Arc::new(LlmProvider::new(client, config.max_tokens)))
}
