//! OpenAI-compatible chat-completion generator
//!
//! Posts the rendered prompt to `{base_url}/chat/completions` with JSON
//! response mode and parses the first choice as raw scenario patterns.

use crate::prompt::{render_prompt, system_prompt};
use async_trait::async_trait;
use feedback_core::{FeedbackGenerator, GenerationError, GenerationRequest, LlmConfig};
use feedback_scenario::RawPatterns;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Message in a chat request or response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

/// Response body from `/chat/completions`
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; only the first is used
    pub choices: Vec<ChatChoice>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// Assistant message
    pub message: ChatMessage,
}

/// Generator backed by a chat-completion endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionGenerator {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl ChatCompletionGenerator {
    /// Create generator, reading the API key from `config.api_key_env`
    #[must_use]
    pub fn new(config: LlmConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    /// With explicit API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With shared HTTP client
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Whether an API key is configured
    #[inline]
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Completion endpoint URL
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Request body for a generation request
    #[must_use]
    pub fn build_request(&self, request: &GenerationRequest) -> ChatRequest {
        let language = request.profile.language;
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::new("system", system_prompt(language)),
                ChatMessage::new("user", render_prompt(request)),
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

#[async_trait]
impl FeedbackGenerator for ChatCompletionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
        let mut builder = self
            .client
            .post(self.endpoint())
            .json(&self.build_request(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        // A body cut off mid-read is a transport fault, not a bad completion
        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let completion: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::Malformed("completion has no choices".into()))?;

        parse_patterns(&content)
    }

    fn name(&self) -> &'static str {
        "chat-completion"
    }
}

/// Map a non-success status onto the generation error taxonomy
#[must_use]
pub fn status_error(status: StatusCode, body: &str) -> GenerationError {
    let detail = format!("{status}: {}", body.chars().take(200).collect::<String>());
    if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationError::RateLimited(detail)
    } else if status.is_server_error() {
        GenerationError::Transport(detail)
    } else {
        GenerationError::Rejected(detail)
    }
}

/// Parse completion text as raw patterns, tolerating a fenced code block
///
/// # Errors
/// `GenerationError::Malformed` if the text is not a JSON object of string arrays
pub fn parse_patterns(content: &str) -> Result<RawPatterns, GenerationError> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| GenerationError::Malformed(e.to_string()))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
