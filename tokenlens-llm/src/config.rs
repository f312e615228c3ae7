use secrecy::{ExposeSecret, SecretString};
use tokenlens_core::TokenlensError;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Value shipped in sample configs; never a usable key.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn from_env() -> Result<Self, TokenlensError> {
        Self::resolve(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        )
    }

    /// Validates raw settings. A missing, blank or placeholder key is rejected.
    pub fn resolve(
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, TokenlensError> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != API_KEY_PLACEHOLDER)
            .ok_or_else(|| {
                TokenlensError::InvalidConfig(format!("{API_KEY_ENV} is not set"))
            })?;
        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key: SecretString::new(api_key),
            base_url,
        })
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}
