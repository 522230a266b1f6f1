use ingest::DocumentFetcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::orchestrator::{AnalysisRun, Pipeline};
use crate::pacing::Pacer;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_items: usize,
    pub item_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_items: 10,
            item_delay: Duration::from_secs(1),
        }
    }
}

/// Outcome for one URL of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub url: String,
    pub result: Result<AnalysisRun, PipelineError>,
}

/// Fetches policies by URL and feeds them through a [`Pipeline`].
pub struct PolicyAnalyzer {
    pipeline: Arc<Pipeline>,
    fetcher: Arc<dyn DocumentFetcher>,
    batch: BatchConfig,
}

impl PolicyAnalyzer {
    pub fn new(pipeline: Arc<Pipeline>, fetcher: Arc<dyn DocumentFetcher>, batch: BatchConfig) -> Self {
        Self {
            pipeline,
            fetcher,
            batch,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisRun, PipelineError> {
        self.pipeline.analyze(text).await
    }

    pub async fn analyze_url(&self, url: &str) -> Result<AnalysisRun, PipelineError> {
        let text = self.fetcher.fetch(url).await?;
        self.pipeline.analyze(&text).await
    }

    /// Reject empty batches and batches over the configured size.
    pub fn check_batch(&self, urls: &[String]) -> Result<(), PipelineError> {
        if urls.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        if urls.len() > self.batch.max_items {
            return Err(PipelineError::BatchTooLarge {
                size: urls.len(),
                max: self.batch.max_items,
            });
        }
        Ok(())
    }

    /// Analyze each URL in order, one at a time. A failing URL only fails its
    /// own slot.
    pub async fn analyze_batch(&self, urls: &[String]) -> Result<Vec<BatchItem>, PipelineError> {
        self.check_batch(urls)?;

        let mut pacer = Pacer::new(self.batch.item_delay);
        let mut items = Vec::with_capacity(urls.len());

        for url in urls {
            let result = pacer.run(self.analyze_url(url)).await;
            if let Err(e) = &result {
                warn!(url = %url, error = %e, "Batch item failed");
            }
            items.push(BatchItem {
                url: url.clone(),
                result,
            });
        }

        let succeeded = items.iter().filter(|item| item.result.is_ok()).count();
        info!(total = items.len(), succeeded, "Batch analysis completed");

        Ok(items)
    }
}
