use std::sync::Mutex;

use tokenlens_core::{
    analyze_prompt, Completion, CompletionProvider, CompletionRequest, Role, TokenLogProb,
    TokenlensError, MAX_OUTPUT_TOKENS, SYSTEM_PROMPT,
};

struct ScriptedProvider {
    response: Result<Completion, String>,
    fallback: Option<String>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    fn ok(completion: Completion) -> Self {
        Self {
            response: Ok(completion),
            fallback: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            fallback: None,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    fn fallback_model(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, TokenlensError> {
        self.seen.lock().unwrap().push(request);
        self.response.clone().map_err(TokenlensError::LlmProvider)
    }
}

#[tokio::test]
async fn analyze_sends_one_logprob_request() {
    let provider = ScriptedProvider::ok(Completion {
        text: "Season 1".to_string(),
        logprobs: vec![
            TokenLogProb::new("Season", -0.1),
            TokenLogProb::new(" 1", -0.5),
            TokenLogProb::new(".", -2.0),
        ],
    });

    let analysis = analyze_prompt(&provider, "Which season?", "gpt-4o-mini", 1.1)
        .await
        .expect("analysis");

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let request = &seen[0];
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.temperature, 1.1);
    assert_eq!(request.max_tokens, MAX_OUTPUT_TOKENS);
    assert_eq!(request.max_tokens, 30);
    assert!(request.logprobs);
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
    assert_eq!(request.messages[1].role, Role::User);
    assert_eq!(request.messages[1].content, "Which season?");

    assert_eq!(analysis.prompt, "Which season?");
    assert_eq!(analysis.model, "gpt-4o-mini");
    assert_eq!(analysis.result.completion_text, "Season 1");
    assert_eq!(analysis.result.token_stats.len(), 3);
    let stats = analysis.result.sequence_stats.expect("stats");
    assert_eq!(stats.num_tokens, 3);
}

#[tokio::test]
async fn missing_logprobs_degrade_to_empty_result() {
    let provider = ScriptedProvider::ok(Completion {
        text: "no data".to_string(),
        logprobs: vec![],
    });

    let analysis = analyze_prompt(&provider, "hi", "gpt-4o-mini", 0.0)
        .await
        .expect("analysis");
    assert!(analysis.result.token_stats.is_empty());
    assert!(analysis.result.sequence_stats.is_none());
    assert_eq!(analysis.result.completion_text, "no data");
}

#[tokio::test]
async fn provider_errors_propagate() {
    let provider = ScriptedProvider::failing("no choices returned");

    let err = analyze_prompt(&provider, "hi", "gpt-4o-mini", 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, TokenlensError::LlmProvider(ref msg) if msg == "no choices returned"));
}

#[tokio::test]
async fn empty_model_resolves_to_provider_fallback() {
    let mut provider = ScriptedProvider::ok(Completion::default());
    provider.fallback = Some("gpt-4o".to_string());

    let analysis = analyze_prompt(&provider, "hi", "", 1.0).await.expect("analysis");
    assert_eq!(analysis.model, "gpt-4o");
    assert_eq!(provider.seen.lock().unwrap()[0].model, "gpt-4o");

    let analysis = analyze_prompt(&provider, "hi", "gpt-4o-mini", 1.0)
        .await
        .expect("analysis");
    assert_eq!(analysis.model, "gpt-4o-mini");
}

#[tokio::test]
async fn empty_model_without_fallback_is_kept() {
    let provider = ScriptedProvider::ok(Completion::default());

    let analysis = analyze_prompt(&provider, "hi", "", 1.0).await.expect("analysis");
    assert_eq!(analysis.model, "");
}
