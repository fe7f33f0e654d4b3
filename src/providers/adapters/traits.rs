//! Provider Adapter Traits
//! Interfaces implemented by the host's OpenAI-compatible backends, and the
//! request types the AIPing shims hand to them

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Credentials supplied by the host for a single invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Any other provider form fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

/// Free-form model parameters as configured by the user
pub type ModelParameters = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Chat message forwarded to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    /// Plain text or a list of content parts
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: Value::String(text.into()),
            name: None,
            tool_call_id: None,
        }
    }
}

/// Tool definition offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessageTool {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Chat completion request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub prompt_messages: Vec<PromptMessage>,
    pub model_parameters: ModelParameters,
    pub tools: Option<Vec<PromptMessageTool>>,
    pub stop: Option<Vec<String>>,
    pub stream: bool,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingInputType {
    #[default]
    Document,
    Query,
}

/// Text embedding request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingRequest {
    pub model: String,
    pub texts: Vec<String>,
    pub user: Option<String>,
    pub input_type: EmbeddingInputType,
}

/// Rerank request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RerankRequest {
    pub model: String,
    pub query: String,
    pub docs: Vec<String>,
    pub score_threshold: Option<f64>,
    pub top_n: Option<usize>,
    pub user: Option<String>,
}

/// Failure reported by a backend. Shims never produce these themselves.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// OpenAI-compatible chat backend.
/// Credentials are taken mutably so decorators can fill in defaults before
/// delegating.
#[async_trait]
pub trait LargeLanguageModel: Send + Sync {
    type Output: Send;

    async fn invoke(
        &self,
        request: ChatRequest,
        credentials: &mut Credentials,
    ) -> Result<Self::Output, AdapterError>;

    async fn validate_credentials(
        &self,
        model: &str,
        credentials: &mut Credentials,
    ) -> Result<(), AdapterError>;

    async fn get_num_tokens(
        &self,
        model: &str,
        credentials: &mut Credentials,
        prompt_messages: &[PromptMessage],
        tools: Option<&[PromptMessageTool]>,
    ) -> Result<usize, AdapterError>;
}

/// OpenAI-compatible embedding backend
#[async_trait]
pub trait TextEmbeddingModel: Send + Sync {
    type Output: Send;

    async fn invoke(
        &self,
        request: EmbeddingRequest,
        credentials: &mut Credentials,
    ) -> Result<Self::Output, AdapterError>;

    async fn get_num_tokens(
        &self,
        model: &str,
        credentials: &mut Credentials,
        texts: &[String],
    ) -> Result<Vec<usize>, AdapterError>;

    async fn validate_credentials(
        &self,
        model: &str,
        credentials: &mut Credentials,
    ) -> Result<(), AdapterError>;
}

/// OpenAI-compatible rerank backend
#[async_trait]
pub trait RerankModel: Send + Sync {
    type Output: Send;

    async fn invoke(
        &self,
        request: RerankRequest,
        credentials: &mut Credentials,
    ) -> Result<Self::Output, AdapterError>;

    async fn validate_credentials(
        &self,
        model: &str,
        credentials: &mut Credentials,
    ) -> Result<(), AdapterError>;
}
