//! Provider configuration constants
//! Centralized configuration for the AIPing provider

/// AIPing API base URL, used whenever credentials omit one
pub const DEFAULT_ENDPOINT_URL: &str = "https://aiping.cn/api/v1";

/// Path segments appended to the endpoint for each route
pub const MODELS_ROUTE: &[&str] = &["models"];
pub const IMAGE_GENERATIONS_ROUTE: &[&str] = &["images", "generations"];

/// Default models for each image tool
pub const DEFAULT_TOOL_MODELS: &[(&str, &str)] = &[
  ("text2image", "Qwen-Image"),
  ("image2image", "Qwen-Image-Edit"),
];

/// Context size used when the catalog does not report one
pub const DEFAULT_CONTEXT_SIZE: u64 = 131_072;

/// Interaction mode forced onto language-model credentials
pub const CHAT_MODE: &str = "chat";

/// Provider routing strategies accepted by the `sort` model parameter
pub const SORT_OPTIONS: &[&str] = &[
  "input_price",
  "output_price",
  "latency",
  "throughput",
  "input_length",
  "none",
];

/// Sort value that disables provider routing
pub const SORT_NONE: &str = "none";

/// Negative prompt sent when the caller does not supply one
pub const DEFAULT_NEGATIVE_PROMPT: &str = "模糊，低质量";

/// Timeout for downloading an input image from a URL (seconds)
pub const IMAGE_FETCH_TIMEOUT_SECS: u64 = 60;

/// Timeout for downloading a generated image from a URL (seconds)
pub const IMAGE_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Manifest locations relative to the plugin root
pub const LLM_MANIFEST_DIR: &str = "models/llm";
pub const EMBEDDING_MANIFEST_DIR: &str = "models/embedding";
pub const RERANK_MANIFEST_DIR: &str = "models/reranker";
pub const TOOL_MANIFEST_DIR: &str = "tools";

/// Get the default model for an image tool
pub fn get_default_tool_model(tool: &str) -> Option<&'static str> {
  DEFAULT_TOOL_MODELS.iter().find(|(t, _)| *t == tool).map(|(_, model)| *model)
}

/// Check if a sort value is one the provider understands
pub fn is_known_sort(value: &str) -> bool {
  SORT_OPTIONS.contains(&value)
}
