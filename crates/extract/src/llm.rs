use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ExtractError, Result};
use crate::schema::OutputSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// How the model is asked to shape its output
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free-form JSON mode
    Json,
    Schema(OutputSchema),
}

/// A chat-completion backend returning the raw response text.
#[async_trait]
pub trait ChatClient {
    fn model(&self) -> &str;

    async fn chat(&self, messages: &[ChatMessage], format: &ResponseFormat) -> Result<String>;
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// Pull a readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match &value["error"] {
            Value::String(message) => message.clone(),
            Value::Object(obj) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string()),
            _ => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

async fn send_json<B: Serialize>(
    client: &reqwest::Client,
    url: &str,
    api_key: Option<&str>,
    body: &B,
) -> Result<String> {
    let mut request = client.post(url).json(body);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    debug!(url = url, status = status.as_u16(), body = %text, "Model service response");

    if !status.is_success() {
        warn!(url = url, status = status.as_u16(), "Model request failed");
        return Err(ExtractError::Status {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    Ok(text)
}

// ---------- Native Ollama API ----------

#[derive(Clone)]
pub struct OllamaClient {
    config: ClientConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    format: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaResponseMessage>,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    pub fn default() -> Result<Self> {
        Self::new(ClientConfig::default())
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, messages: &[ChatMessage], format: &ResponseFormat) -> Result<String> {
        let url = self.config.endpoint("/api/chat");

        let request = OllamaChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            format: match format {
                ResponseFormat::Json => json!("json"),
                ResponseFormat::Schema(output) => output.schema.clone(),
            },
            options: self
                .config
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        };

        info!(model = %self.config.model, url = %url, "Sending chat request to Ollama");

        let body = send_json(&self.client, &url, None, &request).await?;
        let response: OllamaChatResponse =
            serde_json::from_str(&body).map_err(ExtractError::MalformedResponse)?;

        // Blank content is left for the parser to reject
        response
            .message
            .map(|message| message.content)
            .ok_or(ExtractError::EmptyResponse)
    }
}

// ---------- OpenAI-compatible API ----------

#[derive(Clone)]
pub struct OpenAiCompatClient {
    config: ClientConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_format: Value,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    refusal: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = build_http_client(&config)?;
        Ok(Self { config, client })
    }

    pub fn default() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    fn response_format(format: &ResponseFormat) -> Value {
        match format {
            ResponseFormat::Json => json!({ "type": "json_object" }),
            ResponseFormat::Schema(output) => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": output.name,
                    "schema": output.schema,
                }
            }),
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiCompatClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, messages: &[ChatMessage], format: &ResponseFormat) -> Result<String> {
        let url = self.config.endpoint("/v1/chat/completions");

        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            response_format: Self::response_format(format),
        };

        info!(model = %self.config.model, url = %url, "Sending chat completion request");

        let body = send_json(&self.client, &url, Some(&self.config.api_key), &request).await?;
        let response: CompletionResponse =
            serde_json::from_str(&body).map_err(ExtractError::MalformedResponse)?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(ExtractError::EmptyResponse)?;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(ExtractError::Refusal(refusal));
        }

        message.content.ok_or(ExtractError::EmptyResponse)
    }
}
