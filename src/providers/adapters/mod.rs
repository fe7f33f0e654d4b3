//! Provider Adapter System
//! AIPing shims wrapping the host's OpenAI-compatible model backends

pub mod traits;

mod base;
mod embedding;
mod llm;
mod rerank;

pub use base::ProviderDefaults;
pub use embedding::AipingTextEmbeddingModel;
pub use llm::{fold_custom_parameters, AipingLargeLanguageModel};
pub use rerank::AipingRerankModel;
pub use traits::{
    AdapterError, ChatRequest, Credentials, EmbeddingInputType, EmbeddingRequest,
    LargeLanguageModel, ModelParameters, PromptMessage, PromptMessageTool, PromptRole,
    RerankModel, RerankRequest, TextEmbeddingModel,
};
