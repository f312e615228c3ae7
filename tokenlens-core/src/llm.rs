use serde::{Deserialize, Serialize};

use crate::TokenlensError;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Log-probability of one generated token, in generation order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TokenLogProb {
    pub token: String,
    pub logprob: f64,
}

impl TokenLogProb {
    pub fn new(token: impl Into<String>, logprob: f64) -> Self {
        Self {
            token: token.into(),
            logprob,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub logprobs: bool,
}

/// Generated text plus its per-token log-probabilities.
///
/// `logprobs` is empty when the service did not report any.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Completion {
    pub text: String,
    #[serde(default)]
    pub logprobs: Vec<TokenLogProb>,
}

/// A completion service able to report token log-probabilities.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model used when a request leaves `model` empty.
    fn fallback_model(&self) -> Option<&str> {
        None
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, TokenlensError>;
}
