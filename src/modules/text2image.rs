//! Text-to-Image Tool
//! Generates images from a prompt through the AIPing image API

use super::image_tools::{
    parse_extra_body, ImageGenerationClient, PluginTool, ToolCredentials, ToolInvokeMessage,
};
use crate::config::PluginConfig;
use crate::providers::constants::DEFAULT_NEGATIVE_PROMPT;
use crate::providers::get_default_tool_model;
use futures::stream::BoxStream;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const TOOL_NAME: &str = "text2image";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Text2ImageParams {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// JSON object encoded as a string
    #[serde(default)]
    pub extra_body: Option<String>,
}

impl Text2ImageParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }
}

pub struct Text2ImageTool {
    client: ImageGenerationClient,
}

impl Text2ImageTool {
    pub fn new(credentials: ToolCredentials) -> Self {
        Self {
            client: ImageGenerationClient::new(credentials),
        }
    }

    pub fn with_timeout(credentials: ToolCredentials, timeout: Duration) -> Self {
        Self {
            client: ImageGenerationClient::with_timeout(credentials, timeout),
        }
    }

    pub fn from_config(credentials: ToolCredentials, config: &PluginConfig) -> Self {
        Self {
            client: ImageGenerationClient::from_config(credentials, config),
        }
    }
}

impl PluginTool for Text2ImageTool {
    const NAME: &'static str = TOOL_NAME;
    type Params = Text2ImageParams;

    fn invoke(&self, params: Text2ImageParams) -> BoxStream<'static, ToolInvokeMessage> {
        let client = self.client.clone();

        Box::pin(async_stream::stream! {
            if params.prompt.is_empty() {
                yield ToolInvokeMessage::text("Please enter a prompt.");
                return;
            }

            let extra_body = match parse_extra_body(params.extra_body.as_deref()) {
                Ok(extra_body) => extra_body,
                Err(e) => {
                    yield ToolInvokeMessage::text(format!("Invalid extra_body JSON: {}", e));
                    return;
                }
            };

            let model = params
                .model
                .filter(|model| !model.is_empty())
                .or_else(|| get_default_tool_model(TOOL_NAME).map(String::from))
                .unwrap_or_default();
            let negative_prompt = params
                .negative_prompt
                .unwrap_or_else(|| DEFAULT_NEGATIVE_PROMPT.to_string());

            let input = json!({
                "prompt": params.prompt,
                "negative_prompt": negative_prompt,
            });

            for await message in client.generate(model, input, extra_body) {
                yield message;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn empty_prompt_stops_immediately() {
        let tool = Text2ImageTool::new(ToolCredentials::new("sk-test"));
        let messages: Vec<_> = tool.invoke(Text2ImageParams::default()).collect().await;
        assert_eq!(messages, vec![ToolInvokeMessage::text("Please enter a prompt.")]);
    }

    #[tokio::test]
    async fn malformed_extra_body_stops_before_request() {
        let tool = Text2ImageTool::new(ToolCredentials::new("sk-test"));
        let params = Text2ImageParams {
            extra_body: Some("{not json".to_string()),
            ..Text2ImageParams::new("a cat")
        };
        let messages: Vec<_> = tool.invoke(params).collect().await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0]
            .as_text()
            .unwrap()
            .starts_with("Invalid extra_body JSON: "));
    }

    #[test]
    fn params_deserialize_from_tool_parameters() {
        let params: Text2ImageParams = serde_json::from_value(json!({
            "prompt": "a cat",
            "model": "Kolors",
            "extra_body": "{}"
        }))
        .unwrap();
        assert_eq!(params.prompt, "a cat");
        assert_eq!(params.model.as_deref(), Some("Kolors"));
        assert_eq!(params.negative_prompt, None);
    }
}
