use crate::{
    Completion, CompletionProvider, CompletionRequest, CompletionResult, Message, TokenlensError,
};

/// Output-token cap sent with every completion request.
pub const MAX_OUTPUT_TOKENS: u32 = 30;

pub const SYSTEM_PROMPT: &str = "Complete the following sentence with factual information.";

/// One analyzed prompt: the request parameters shown in the report header and
/// the statistics derived from the response.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub result: CompletionResult,
}

/// Sends `prompt` with logprob reporting enabled and returns the raw completion.
pub async fn request_completion<P>(
    provider: &P,
    prompt: &str,
    temperature: f32,
    model: &str,
) -> Result<Completion, TokenlensError>
where
    P: CompletionProvider + ?Sized,
{
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)],
        temperature,
        max_tokens: MAX_OUTPUT_TOKENS,
        logprobs: true,
    };
    provider.complete(request).await
}

/// Requests a completion and derives its statistics. An empty `model` is
/// replaced by the provider's fallback so the report names the model used.
pub async fn analyze_prompt<P>(
    provider: &P,
    prompt: &str,
    model: &str,
    temperature: f32,
) -> Result<Analysis, TokenlensError>
where
    P: CompletionProvider + ?Sized,
{
    let model = match provider.fallback_model() {
        Some(fallback) if model.is_empty() => fallback,
        _ => model,
    };
    let completion = request_completion(provider, prompt, temperature, model).await?;
    let result = CompletionResult::from_logprobs(completion.text, &completion.logprobs);

    Ok(Analysis {
        prompt: prompt.to_string(),
        model: model.to_string(),
        temperature,
        result,
    })
}
