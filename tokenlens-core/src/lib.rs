//! Core data model and confidence math for tokenlens.
//!
//! Turns per-token log-probabilities reported by a completion service into
//! linear probabilities, confidence buckets and a sequence-level score
//! (Seq-Logprob and perplexity).

mod analyze;
mod confidence;
mod error;
mod llm;
mod stats;

pub use analyze::{analyze_prompt, request_completion, Analysis, MAX_OUTPUT_TOKENS, SYSTEM_PROMPT};
pub use confidence::{ColorTier, ConfidenceLevel};
pub use error::TokenlensError;
pub use llm::{Completion, CompletionProvider, CompletionRequest, Message, Role, TokenLogProb};
pub use stats::{
    calculate_seq_logprob, extract_token_probabilities, CompletionResult, SequenceStats,
    TokenStat, PERPLEXITY_EXPONENT_LIMIT,
};
