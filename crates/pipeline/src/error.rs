use analysis::MergeError;
use extract::ProviderError;
use ingest::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("policy text is empty")]
    EmptyInput,
    #[error("batch is empty")]
    EmptyBatch,
    #[error("batch of {size} exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },
    #[error("failed to fetch policy: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl PipelineError {
    /// Errors caused by the request itself rather than by a collaborator.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::EmptyBatch
                | Self::BatchTooLarge { .. }
                | Self::Fetch(FetchError::InvalidUrl(_))
        )
    }
}
