use serde::{Deserialize, Serialize};

use crate::TokenLogProb;

/// Bound applied to the perplexity exponent so `exp` stays finite in f64.
pub const PERPLEXITY_EXPONENT_LIMIT: f64 = 700.0;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TokenStat {
    pub token: String,
    pub probability: f64,
    pub logprob: f64,
}

/// Seq-Logprob summary of a whole completion (Guerreiro et al. 2022).
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct SequenceStats {
    pub avg_logprob: f64,
    pub avg_probability: f64,
    pub perplexity: f64,
    pub num_tokens: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CompletionResult {
    pub completion_text: String,
    pub token_stats: Vec<TokenStat>,
    pub sequence_stats: Option<SequenceStats>,
}

impl CompletionResult {
    pub fn from_logprobs(completion_text: impl Into<String>, logprobs: &[TokenLogProb]) -> Self {
        Self {
            completion_text: completion_text.into(),
            token_stats: extract_token_probabilities(logprobs),
            sequence_stats: calculate_seq_logprob(logprobs),
        }
    }
}

pub fn extract_token_probabilities(logprobs: &[TokenLogProb]) -> Vec<TokenStat> {
    logprobs
        .iter()
        .map(|entry| TokenStat {
            token: entry.token.clone(),
            probability: entry.logprob.exp2(),
            logprob: entry.logprob,
        })
        .collect()
}

/// Mean log-probability over the sequence plus the derived probability and
/// perplexity. Returns `None` for an empty sequence.
pub fn calculate_seq_logprob(logprobs: &[TokenLogProb]) -> Option<SequenceStats> {
    if logprobs.is_empty() {
        return None;
    }

    let num_tokens = logprobs.len();
    let sum: f64 = logprobs.iter().map(|entry| entry.logprob).sum();
    let avg_logprob = sum / num_tokens as f64;
    let exponent = (-avg_logprob).clamp(-PERPLEXITY_EXPONENT_LIMIT, PERPLEXITY_EXPONENT_LIMIT);

    Some(SequenceStats {
        avg_logprob,
        avg_probability: avg_logprob.exp2(),
        perplexity: exponent.exp(),
        num_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_keeps_token_count_in_sync() {
        let logprobs = vec![TokenLogProb::new("a", -0.25), TokenLogProb::new("b", -1.0)];
        let result = CompletionResult::from_logprobs("ab", &logprobs);
        let stats = result.sequence_stats.expect("stats");
        assert_eq!(stats.num_tokens, result.token_stats.len());
        assert_eq!(result.completion_text, "ab");
    }

    #[test]
    fn zero_logprob_is_certain() {
        let stats = extract_token_probabilities(&[TokenLogProb::new("x", 0.0)]);
        assert_eq!(stats[0].probability, 1.0);
    }
}
