use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured for {0}")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("provider returned an empty completion")]
    EmptyCompletion,
    #[error("no JSON object found in response: {0}")]
    InvalidJson(String),
    #[error("response does not match the analysis schema: {0}")]
    Schema(#[from] serde_json::Error),
}
