//! tokenlens - visualize how confident a model is in each token it generates.

use anyhow::Result;
use tokenlens_cli::Renderer;
use tokenlens_core::analyze_prompt;
use tokenlens_llm::{OpenAiCompatibleClient, OpenAiConfig, API_KEY_ENV, DEFAULT_MODEL};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const PROMPT: &str =
    "In which episode of Friends Rachel shoves up a marshmallow in Monica's nose?";
const TEMPERATURE: f32 = 1.1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries the report; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = match OpenAiConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(error = %err, "configuration rejected");
            println!("⚠️  Please set the {API_KEY_ENV} environment variable");
            std::process::exit(1);
        }
    };

    let client = OpenAiCompatibleClient::from_config(&config)?;
    println!("✅ OpenAI client initialized\n");

    let analysis = analyze_prompt(&client, PROMPT, DEFAULT_MODEL, TEMPERATURE).await?;
    print!("{}", Renderer::for_stdout().report(&analysis));
    Ok(())
}
