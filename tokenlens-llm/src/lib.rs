//! OpenAI-compatible completion provider for tokenlens.
//!
//! Environment variables read by [`OpenAiConfig::from_env`]:
//! - `OPENAI_API_KEY`
//! - `OPENAI_BASE_URL` (optional)

mod config;
pub mod openai_compatible;

pub use config::{OpenAiConfig, API_KEY_ENV, API_KEY_PLACEHOLDER, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use openai_compatible::{
    ChatCompletionRequest, OpenAiCompatibleBuilder, OpenAiCompatibleClient, DEFAULT_MODEL,
};
pub use tokenlens_core::{Completion, CompletionProvider, CompletionRequest, Message, Role};
