use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenlensError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
