//! Manifest Renderer
//! Text templates for the model and tool manifests read by the host at load time.
//! Field names and nesting are consumed strictly by the host, keep them exact.

use super::fetcher::NormalizedModel;
use crate::providers::constants::{get_default_tool_model, SORT_OPTIONS};

/// Image tool manifests generated from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Text2Image,
    Image2Image,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::Text2Image, ToolKind::Image2Image];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text2Image => "text2image",
            Self::Image2Image => "image2image",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.yaml", self.name())
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Text2Image => get_default_tool_model("text2image").unwrap_or("Qwen-Image"),
            Self::Image2Image => get_default_tool_model("image2image").unwrap_or("Qwen-Image-Edit"),
        }
    }
}

/// Filesystem-safe manifest file stem for a model name.
pub fn slugify(name: &str) -> String {
    name.replace(['/', '\\', ' '], "-").to_lowercase()
}

pub fn render_llm_manifest(model: &NormalizedModel) -> String {
    let mut features = vec!["multi-tool-call", "stream-tool-call", "tool-call"];
    if model.capabilities.is_vision() {
        features.push("vision");
    }
    let features = features
        .iter()
        .map(|f| format!("  - {}", f))
        .collect::<Vec<_>>()
        .join("\n");
    let sort_options = SORT_OPTIONS
        .iter()
        .map(|opt| format!("  - {}", opt))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"model: {name}
label:
  en_US: {name}
  zh_Hans: {name}
model_type: llm
features:
{features}
model_properties:
  mode: chat
  context_size: {context_size}
parameter_rules:
- name: max_tokens
  use_template: max_tokens
  type: int
  min: 1
  max: 8192
  default: 2048
- name: temperature
  use_template: temperature
  type: float
  min: 0.0
  max: 2.0
- name: top_p
  use_template: top_p
  type: float
  min: 0.0
  max: 1.0
- name: top_k
  use_template: top_k
  type: int
- name: presence_penalty
  use_template: presence_penalty
  type: float
  min: -2.0
  max: 2.0
- name: stream
  label:
    en_US: Stream
    zh_Hans: 流式输出
  type: boolean
  default: false
  required: false
  help:
    en_US: Whether to stream the response. If true, the response will be streamed back as it is generated.
    zh_Hans: 是否流式返回响应。如果为 true，响应将在生成时流式返回。
- name: modalities
  label:
    en_US: Modalities
    zh_Hans: 模态
  type: string
  required: false
  options:
  - text
  help:
    en_US: The type of output the model should generate. Most models can generate text, text is the default type
    zh_Hans: 希望模型生成的输出类型。大多数模型都可以生成文本，文本是默认类型
- name: response_format
  use_template: response_format
  type: string
  options:
  - text
  - json_object
- name: enable_thinking
  label:
    en_US: Enable Thinking
    zh_Hans: 启用思考模式
  type: boolean
  default: true
  required: false
  help:
    en_US: Whether to enable thinking mode for models that support it
    zh_Hans: 是否为支持思考模式的模型启用思考功能（部分模型可能不支持思考）
- name: sort
  label:
    en_US: Sort By
    zh_Hans: 智能路由策略
  type: string
  default: none
  required: false
  options:
{sort_options}
  help:
    en_US: 'Sort providers by: input_price, output_price, throughput, latency, or context_length'
    zh_Hans: 按以下方式排序供应商：input_price（输入价格）、output_price（输出价格）、throughput（吞吐量）、latency（延迟）或 context_length（上下文长度）
"#,
        name = model.name,
        features = features,
        context_size = model.context_size,
        sort_options = sort_options,
    )
}

pub fn render_embedding_manifest(model: &NormalizedModel) -> String {
    format!(
        r#"model: {name}
label:
  en_US: {name}
  zh_Hans: {name}
model_type: text-embedding
model_properties:
  context_size: {context_size}
  max_chunks: 1
"#,
        name = model.name,
        context_size = model.context_size,
    )
}

pub fn render_rerank_manifest(model: &NormalizedModel) -> String {
    format!(
        r#"model: {name}
label:
  en_US: {name}
  zh_Hans: {name}
model_type: rerank
model_properties:
  context_size: {context_size}
"#,
        name = model.name,
        context_size = model.context_size,
    )
}

/// Render a tool manifest whose `model` select offers exactly `models`, in order.
pub fn render_tool_manifest(kind: ToolKind, models: &[String]) -> String {
    let options = if models.is_empty() {
        "  options: []".to_string()
    } else {
        let entries = models
            .iter()
            .map(|model| {
                format!(
                    "  - label:\n      en_US: {model}\n      zh_CN: {model}\n    value: \"{model}\"",
                    model = model
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("  options:\n{}", entries)
    };

    let (description, identity, image_parameter) = match kind {
        ToolKind::Text2Image => (TEXT2IMAGE_DESCRIPTION, TEXT2IMAGE_IDENTITY, ""),
        ToolKind::Image2Image => (IMAGE2IMAGE_DESCRIPTION, IMAGE2IMAGE_IDENTITY, IMAGE_PARAMETER),
    };

    format!(
        r#"{description}{identity}parameters:
{prompt}{image}{negative_prompt}- form: form
  human_description:
    en_US: Model to use for image generation (for details, please go to： https://aiping.cn/docs/product).
    zh_CN: 用于图像生成的模型 (详情请前往：https://aiping.cn/docs/product)。
  label:
    en_US: Model
    zh_CN: 模型
  name: model
{options}
  required: true
  type: select
  default: "{default_model}"
- form: form
  human_description:
    en_US: Advanced parameters for image generation (for details, please go to： https://aiping.cn/docs/product).
    zh_CN: 高级参数，用于图像生成 (详情请前往：https://aiping.cn/docs/product)。
  label:
    en_US: Extra Body
    zh_CN: Extra Body
  name: extra_body
  required: false
  type: string
  default: "{{}}"
"#,
        description = description,
        identity = identity,
        prompt = PROMPT_PARAMETER,
        image = image_parameter,
        negative_prompt = NEGATIVE_PROMPT_PARAMETER,
        options = options,
        default_model = kind.default_model(),
    )
}

const TEXT2IMAGE_DESCRIPTION: &str = "description:
  human:
    en_US: Generate images with AIPing AI.
    zh_CN: 使用AIPing AI 生成图像。
  llm: This tool is used to generate images from text prompts using AIPing AI.
";

const TEXT2IMAGE_IDENTITY: &str = "extra:
  python:
    source: tools/text2image.py
identity:
  author: AIping Writer
  icon: icon.svg
  label:
    en_US: Text to Image
    zh_CN: 文生图
  name: text2image
";

const IMAGE2IMAGE_DESCRIPTION: &str = "description:
  human:
    en_US: Generate images from images with AIPing AI.
    zh_CN: 使用AIPing AI 进行图生图。
  llm: This tool is used to generate images from images and text prompts using AIPing AI.
";

const IMAGE2IMAGE_IDENTITY: &str = "extra:
  python:
    source: tools/image2image.py
identity:
  author: AIping Writer
  icon: icon.svg
  label:
    en_US: Image to Image
    zh_CN: 图生图
  name: image2image
";

const PROMPT_PARAMETER: &str = "- form: llm
  human_description:
    en_US: The text prompt used to generate the image.
    zh_CN: 用于生成图像的文本提示。
  label:
    en_US: Prompt
    zh_CN: 提示词
  llm_description: This prompt text will be used to generate image.
  name: prompt
  required: true
  type: string
";

const IMAGE_PARAMETER: &str = "- form: llm
  human_description:
    en_US: The image file to be used for image-to-image generation.
    zh_CN: 用于图生图生成的图片文件。
  label:
    en_US: Image
    zh_CN: 图片文件
  llm_description: This image will be used as the input for image-to-image generation.
  name: image
  required: true
  type: file
";

const NEGATIVE_PROMPT_PARAMETER: &str = "- form: llm
  human_description:
    en_US: The text negative prompt used to generate the image.
    zh_CN: 用于生成图像的负向文本提示。
  label:
    en_US: Negative Prompt
    zh_CN: 负向提示词
  llm_description: This prompt text will be used to generate image.
  name: negative_prompt
  required: false
  type: string
";
