use analysis::AnalysisMethod;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;
use crate::prompt::SYSTEM_PROMPT;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const MISTRAL_DEFAULT_MODEL: &str = "mistral-small-latest";

/// Client for OpenAI-compatible chat completion endpoints (OpenAI, Mistral).
#[derive(Clone)]
pub struct ChatClient {
    method: AnalysisMethod,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatClient {
    pub fn new(
        method: AnalysisMethod,
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey(method.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            method,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
        })
    }

    pub fn openai(api_key: String, model: Option<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new(
            AnalysisMethod::OpenAi,
            OPENAI_BASE_URL.to_string(),
            api_key,
            model.unwrap_or_else(|| OPENAI_DEFAULT_MODEL.to_string()),
            timeout,
        )
    }

    pub fn mistral(api_key: String, model: Option<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::new(
            AnalysisMethod::MistralAi,
            MISTRAL_BASE_URL.to_string(),
            api_key,
            model.unwrap_or_else(|| MISTRAL_DEFAULT_MODEL.to_string()),
            timeout,
        )
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn method(&self) -> AnalysisMethod {
        self.method
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature: 0.1,
            response_format: ResponseFormat { kind: "json_object" },
        };

        debug!(provider = %self.method, model = %self.model, prompt_chars = prompt.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion)
    }
}
