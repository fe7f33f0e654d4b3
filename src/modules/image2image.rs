//! Image-to-Image Tool
//! Edits an uploaded image according to a prompt through the AIPing image API

use super::image_codec::encode_data_url;
use super::image_source::ImageInput;
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
use tracing::debug;

pub const TOOL_NAME: &str = "image2image";

#[derive(Debug, Default, Deserialize)]
pub struct Image2ImageParams {
    #[serde(default)]
    pub prompt: String,
    /// Attached by the host from the uploaded file
    #[serde(skip)]
    pub image: Option<ImageInput>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub extra_body: Option<String>,
}

impl Image2ImageParams {
    pub fn new(prompt: impl Into<String>, image: impl Into<ImageInput>) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(image.into()),
            ..Default::default()
        }
    }
}

pub struct Image2ImageTool {
    client: ImageGenerationClient,
}

impl Image2ImageTool {
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

impl PluginTool for Image2ImageTool {
    const NAME: &'static str = TOOL_NAME;
    type Params = Image2ImageParams;

    fn invoke(&self, params: Image2ImageParams) -> BoxStream<'static, ToolInvokeMessage> {
        let client = self.client.clone();

        Box::pin(async_stream::stream! {
            if params.prompt.is_empty() {
                yield ToolInvokeMessage::text("Please enter a prompt.");
                return;
            }

            let image = match params.image {
                Some(image) if !image.is_empty() => image,
                _ => {
                    yield ToolInvokeMessage::text("Please upload an image.");
                    return;
                }
            };

            let mut file_content = None;
            for mut source in image.into_ordered() {
                if let Some(message) = source.start_message() {
                    yield ToolInvokeMessage::text(message);
                }
                match source.load(client.http()).await {
                    Ok(bytes) => {
                        yield ToolInvokeMessage::text(source.success_message(bytes.len()));
                        file_content = Some(bytes);
                        break;
                    }
                    Err(e) => {
                        debug!("[AIPing] Image source {:?} failed: {}", source, e);
                        yield ToolInvokeMessage::text(source.failure_message(&e));
                    }
                }
            }

            let file_content = match file_content {
                Some(file_content) => file_content,
                None => {
                    yield ToolInvokeMessage::text(
                        "Unable to read image data. Please re-upload the image or use a smaller file.",
                    );
                    return;
                }
            };

            let encoded = encode_data_url(&file_content);
            yield ToolInvokeMessage::text(encoded.report());

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
                "image": encoded.data_url,
            });

            for await message in client.generate(model, input, extra_body) {
                yield message;
            }
        })
    }
}
