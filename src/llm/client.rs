//! Chat-completion client that turns a prompt into raw model text.

use crate::telemetry::llm_span;
use crate::types::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::Instrument;

/// Default model (Groq-hosted Llama).
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Anything that can complete a prompt.
///
/// The pipeline only depends on this trait, so tests swap in canned responses.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete `prompt` and return the model's raw text output.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier used for completions.
    fn model(&self) -> &str;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Groq,
    OpenAI,
    Anthropic,
}

impl LlmProvider {
    /// Pick the provider from the model name.
    ///
    /// - `claude*` → Anthropic
    /// - `gpt-*`, `o1*`, `o3*` → OpenAI
    /// - everything else (llama, mixtral, gemma, qwen, ...) → Groq
    pub fn detect(model: &str) -> Self {
        if model.starts_with("claude") || model.starts_with("anthropic") {
            LlmProvider::Anthropic
        } else if model.starts_with("gpt-") || model.starts_with("o1") || model.starts_with("o3") {
            LlmProvider::OpenAI
        } else {
            LlmProvider::Groq
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Default API base URL.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "https://api.groq.com/openai/v1",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
            LlmProvider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "groq",
            LlmProvider::OpenAI => "openai",
            LlmProvider::Anthropic => "anthropic",
        }
    }
}

/// OpenAI-compatible chat completion response (Groq and OpenAI).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Anthropic API response.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

/// HTTP client for a hosted completion model.
///
/// One request per call, no timeout, no retry. Sampling parameters are left
/// at the provider's defaults.
pub struct LlmClient {
    api_key: String,
    model: String,
    provider: LlmProvider,
    base_url: String,
    client: Client,
}

impl LlmClient {
    /// Create new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Provider API key
    /// * `model` - Model name (e.g., "llama-3.1-8b-instant", "gpt-4o-mini", "claude-3-5-haiku-latest")
    pub fn new(api_key: String, model: String) -> Self {
        let provider = LlmProvider::detect(&model);
        Self {
            api_key,
            model,
            provider,
            base_url: provider.default_base_url().to_string(),
            client: Client::new(),
        }
    }

    /// Create a client for `model`, reading the provider's key from the environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the API key variable is unset or empty
    pub fn from_env(model: &str) -> Result<Self> {
        let provider = LlmProvider::detect(model);
        let api_key = std::env::var(provider.api_key_env())
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "{} environment variable not set",
                    provider.api_key_env()
                ))
            })?;

        Ok(Self::new(api_key, model.to_string()))
    }

    /// Point the client at a different API root (OpenAI-compatible gateways, local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call an OpenAI-compatible chat completions endpoint (Groq, OpenAI).
    async fn call_chat_completions(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "user", "content": prompt}
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::llm(format!(
                "{} API error {}: {}",
                self.provider.as_str(),
                status,
                body
            )));
        }

        parse_chat_response(&body)
    }

    /// Call Anthropic Messages API.
    async fn call_anthropic(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": 1024,
                "messages": [
                    {"role": "user", "content": prompt}
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::llm(format!("anthropic API error {}: {}", status, body)));
        }

        parse_anthropic_response(&body)
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let span = llm_span(self.provider.as_str(), &self.model);
        async {
            let text = match self.provider {
                LlmProvider::Groq | LlmProvider::OpenAI => self.call_chat_completions(prompt).await,
                LlmProvider::Anthropic => self.call_anthropic(prompt).await,
            }?;
            tracing::debug!(chars = text.len(), "completion received");
            Ok::<_, Error>(text)
        }
        .instrument(span)
        .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Extract the first choice's message content from a chat completion body.
fn parse_chat_response(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::llm(format!("Failed to parse completion response: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::llm("No choices in completion response"))?;

    Ok(choice.message.content.unwrap_or_default())
}

/// Concatenate the text blocks of an Anthropic Messages body.
fn parse_anthropic_response(body: &str) -> Result<String> {
    let parsed: AnthropicResponse = serde_json::from_str(body)
        .map_err(|e| Error::llm(format!("Failed to parse Anthropic response: {}", e)))?;

    if parsed.content.is_empty() {
        return Err(Error::llm("No content in Anthropic response"));
    }

    Ok(parsed.content.into_iter().map(|c| c.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_detection() {
        assert_eq!(LlmProvider::detect("llama-3.1-8b-instant"), LlmProvider::Groq);
        assert_eq!(LlmProvider::detect("mixtral-8x7b-32768"), LlmProvider::Groq);
        assert_eq!(LlmProvider::detect("gpt-4o-mini"), LlmProvider::OpenAI);
        assert_eq!(LlmProvider::detect("o3-mini"), LlmProvider::OpenAI);
        assert_eq!(
            LlmProvider::detect("claude-3-5-haiku-latest"),
            LlmProvider::Anthropic
        );
    }

    #[test]
    fn test_client_defaults() {
        let client = LlmClient::new("key".into(), DEFAULT_MODEL.into());
        assert_eq!(client.provider(), LlmProvider::Groq);
        assert_eq!(client.base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(client.model(), DEFAULT_MODEL);

        let client = client.with_base_url("http://localhost:8080/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"SELECT COUNT(*) FROM STUDENT;"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "SELECT COUNT(*) FROM STUDENT;");
    }

    #[test]
    fn test_parse_chat_response_keeps_text_verbatim() {
        let body = r#"{"choices":[{"message":{"content":"```SELECT * FROM STUDENT;```"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "```SELECT * FROM STUDENT;```");

        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "");
    }

    #[test]
    fn test_parse_chat_response_errors() {
        assert!(matches!(
            parse_chat_response(r#"{"choices":[]}"#),
            Err(Error::Llm(_))
        ));
        assert!(matches!(parse_chat_response("not json"), Err(Error::Llm(_))));
    }

    #[test]
    fn test_parse_anthropic_response() {
        let body = r#"{"content":[{"type":"text","text":"SELECT NAME "},{"type":"text","text":"FROM STUDENT;"}]}"#;
        assert_eq!(parse_anthropic_response(body).unwrap(), "SELECT NAME FROM STUDENT;");
        assert!(parse_anthropic_response(r#"{"content":[]}"#).is_err());
    }
}
