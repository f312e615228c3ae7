//! OpenAI-compatible chat completions client with logprob reporting
//!
//! Works against any provider speaking OpenAI's `/v1/chat/completions` format.

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokenlens_core::{
    Completion, CompletionProvider, CompletionRequest, Message, TokenLogProb, TokenlensError,
};
use url::Url;

use crate::config::{OpenAiConfig, DEFAULT_BASE_URL};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Request body for chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub logprobs: bool,
    pub stream: bool,
}

/// Non-streaming response from chat completions, reduced to the fields read
/// here; serde skips the rest.
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub logprobs: Option<ChoiceLogprobs>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChoiceLogprobs {
    #[serde(default)]
    pub content: Option<Vec<LogprobEntry>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LogprobEntry {
    pub token: String,
    pub logprob: f64,
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    base_url: Url,
    api_key: SecretString,
    default_model: String,
}

pub struct OpenAiCompatibleBuilder {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    default_model: String,
}

impl Default for OpenAiCompatibleBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }
}

fn parse_base_url(value: &str) -> Result<Url, TokenlensError> {
    Url::parse(value)
        .map_err(|err| TokenlensError::InvalidConfig(format!("invalid base url '{value}': {err}")))
}

impl OpenAiCompatibleBuilder {
    pub fn base_url(mut self, value: impl AsRef<str>) -> Result<Self, TokenlensError> {
        self.base_url = Some(parse_base_url(value.as_ref())?);
        Ok(self)
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(value.into()));
        self
    }

    pub fn default_model(mut self, value: impl Into<String>) -> Self {
        self.default_model = value.into();
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, TokenlensError> {
        let api_key = self
            .api_key
            .ok_or_else(|| TokenlensError::InvalidConfig("api_key is required".to_string()))?;
        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };
        let http = Client::builder()
            .build()
            .map_err(|err| TokenlensError::LlmProvider(err.to_string()))?;

        Ok(OpenAiCompatibleClient {
            http,
            base_url,
            api_key,
            default_model: self.default_model,
        })
    }
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::default()
    }

    pub fn from_config(config: &OpenAiConfig) -> Result<Self, TokenlensError> {
        Self::builder()
            .base_url(&config.base_url)?
            .api_key(config.api_key.expose_secret().clone())
            .build()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    fn to_wire(&self, request: CompletionRequest) -> ChatCompletionRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model
        };
        ChatCompletionRequest {
            model,
            messages: request.messages,
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
            logprobs: request.logprobs,
            stream: false,
        }
    }
}

fn provider_error(status: StatusCode, body: &str) -> TokenlensError {
    let message = serde_json::from_str::<OpenAiError>(body)
        .map(|err| err.error.message)
        .unwrap_or_else(|_| body.to_string());
    TokenlensError::LlmProvider(format!("http {}: {}", status.as_u16(), message))
}

fn into_completion(
    response: ChatCompletionResponse,
    logprobs_requested: bool,
) -> Result<Completion, TokenlensError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TokenlensError::LlmProvider("no choices returned".to_string()))?;

    let entries = choice
        .logprobs
        .and_then(|logprobs| logprobs.content)
        .unwrap_or_default();
    if logprobs_requested && entries.is_empty() {
        tracing::warn!(model = %response.model, "response carried no token logprobs");
    }
    tracing::debug!(tokens = entries.len(), "received token logprobs");

    Ok(Completion {
        text: choice.message.content.unwrap_or_default(),
        logprobs: entries
            .into_iter()
            .map(|entry| TokenLogProb::new(entry.token, entry.logprob))
            .collect(),
    })
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompatibleClient {
    fn fallback_model(&self) -> Option<&str> {
        Some(&self.default_model)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, TokenlensError> {
        let logprobs_requested = request.logprobs;
        let body = self.to_wire(request);
        tracing::debug!(
            model = %body.model,
            messages = body.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| TokenlensError::LlmProvider(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| TokenlensError::LlmProvider(err.to_string()))?;
        if !status.is_success() {
            return Err(provider_error(status, &text));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        into_completion(parsed, logprobs_requested)
    }
}
