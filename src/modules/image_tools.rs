//! Image Tools
//! Shared plumbing for the AIPing image generation tools: the tool trait,
//! the messages a tool streams back, and the generation request pipeline

use super::image_codec::decode_image;
use crate::config::{PluginConfig, MAX_REQUEST_TIMEOUT};
use crate::providers::constants::IMAGE_GENERATIONS_ROUTE;
use crate::providers::{build_http_client, join_endpoint, resolve_endpoint_url};
use futures::stream::{BoxStream, Stream};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

// ============================================================================
// Messages
// ============================================================================

/// One item of a tool's output sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvokeMessage {
    Text(String),
    Blob { blob: Vec<u8>, mime_type: String },
}

impl ToolInvokeMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn blob(blob: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::Blob {
            blob,
            mime_type: mime_type.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Blob { .. } => None,
        }
    }
}

/// A tool the host can invoke with its parameter map
pub trait PluginTool {
    /// Name under `tools/` the host registers the tool as
    const NAME: &'static str;
    type Params;

    fn invoke(&self, params: Self::Params) -> BoxStream<'static, ToolInvokeMessage>;
}

/// Tool credentials as configured in the provider form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolCredentials {
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
}

impl ToolCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint_url: None,
            api_key: api_key.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

/// Parse the `extra_body` tool parameter. Absent or blank means `{}`.
pub fn parse_extra_body(raw: Option<&str>) -> Result<Value, serde_json::Error> {
    match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => serde_json::from_str(raw),
        _ => Ok(Value::Object(Map::new())),
    }
}

// ============================================================================
// Generation client
// ============================================================================

#[derive(Debug, Clone)]
pub struct ImageGenerationClient {
    http: reqwest::Client,
    credentials: ToolCredentials,
}

impl ImageGenerationClient {
    pub fn new(credentials: ToolCredentials) -> Self {
        Self::with_timeout(credentials, MAX_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(credentials: ToolCredentials, timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
            credentials,
        }
    }

    /// Use the request timeout from the loaded plugin configuration.
    pub fn from_config(credentials: ToolCredentials, config: &PluginConfig) -> Self {
        Self::with_timeout(credentials, config.request_timeout)
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// POST one generation request and stream back status text and images.
    pub fn generate(
        self,
        model: String,
        input: Value,
        extra_body: Value,
    ) -> impl Stream<Item = ToolInvokeMessage> + Send + 'static {
        async_stream::stream! {
            yield ToolInvokeMessage::text("Generating image with AIPing API...");

            let endpoint_url = resolve_endpoint_url(self.credentials.endpoint_url.as_deref());
            let url = match join_endpoint(&endpoint_url, IMAGE_GENERATIONS_ROUTE) {
                Ok(url) => url,
                Err(e) => {
                    yield ToolInvokeMessage::text(format!("Error generating image: {}", e));
                    return;
                }
            };

            info!("[AIPing] Generating image: url={}, model={}", url, model);

            let body = json!({
                "model": model,
                "input": input,
                "extra_body": extra_body,
            });

            let response = match self
                .http
                .post(url)
                .bearer_auth(&self.credentials.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("[AIPing] Image generation request failed: {}", e);
                    yield ToolInvokeMessage::text(format!("Error generating image: {}", e));
                    return;
                }
            };

            let status = response.status();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    yield ToolInvokeMessage::text(format!("Error generating image: {}", e));
                    return;
                }
            };

            // Non-2xx is reported, then the body is still inspected for images
            if !status.is_success() {
                warn!("[AIPing] Image generation returned {}", status);
                yield ToolInvokeMessage::text(format!("Error generating image: {}", text));
            }

            let result: Value = match serde_json::from_str(&text) {
                Ok(result) => result,
                Err(e) => {
                    yield ToolInvokeMessage::text(format!("Error generating image: {}", e));
                    return;
                }
            };

            let images = match result.get("data").and_then(Value::as_array) {
                Some(images) if !images.is_empty() => images.clone(),
                _ => {
                    let data = result.get("data").cloned().unwrap_or(Value::Null);
                    yield ToolInvokeMessage::text(format!(
                        "Error generating image: image list is {}",
                        data
                    ));
                    return;
                }
            };

            debug!("[AIPing] Received {} image(s)", images.len());

            for image in images {
                let image_url = match image.get("url") {
                    Some(Value::String(image_url)) => image_url.clone(),
                    other => {
                        yield ToolInvokeMessage::text(format!(
                            "Error generating image: image is not a string {}",
                            other.cloned().unwrap_or(Value::Null)
                        ));
                        continue;
                    }
                };

                if image_url.trim().is_empty() {
                    continue;
                }

                match decode_image(&self.http, &image_url).await {
                    Ok(decoded) => {
                        yield ToolInvokeMessage::blob(decoded.bytes, decoded.mime_type);
                        yield ToolInvokeMessage::text("Image generated successfully!");
                    }
                    Err(e) => {
                        warn!("[AIPing] Failed to decode generated image: {}", e);
                        yield ToolInvokeMessage::text(format!("Error generating image: {}", e));
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_body_defaults_to_empty_object() {
        assert_eq!(parse_extra_body(None).unwrap(), json!({}));
        assert_eq!(parse_extra_body(Some("  ")).unwrap(), json!({}));
        assert_eq!(
            parse_extra_body(Some(r#"{"seed": 42}"#)).unwrap(),
            json!({"seed": 42})
        );
    }

    #[test]
    fn malformed_extra_body_is_an_error() {
        assert!(parse_extra_body(Some("{seed: 42")).is_err());
    }

    #[test]
    fn message_helpers() {
        assert_eq!(ToolInvokeMessage::text("hi").as_text(), Some("hi"));
        let blob = ToolInvokeMessage::blob(vec![1, 2], "image/png");
        assert_eq!(blob.as_text(), None);
        assert_eq!(
            blob,
            ToolInvokeMessage::Blob {
                blob: vec![1, 2],
                mime_type: "image/png".to_string()
            }
        );
    }

    #[test]
    fn credentials_deserialize_with_optional_endpoint() {
        let credentials: ToolCredentials = serde_json::from_value(json!({"api_key": "sk"})).unwrap();
        assert_eq!(credentials, ToolCredentials::new("sk"));

        let credentials: ToolCredentials =
            serde_json::from_value(json!({"api_key": "sk", "endpoint_url": "http://x/v1"})).unwrap();
        assert_eq!(credentials.endpoint_url.as_deref(), Some("http://x/v1"));
    }
}
