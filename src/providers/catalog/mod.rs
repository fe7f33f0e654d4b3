//! Model Catalog
//! Turns the provider's live model listing into the manifests the host loads

pub mod classifier;
pub mod fetcher;
pub mod manifest;
pub mod sync;

pub use classifier::{classify, CapabilitySet, CapabilityTag, ModelType};
pub use fetcher::{parse_catalog, CatalogError, CatalogFetcher, NormalizedModel, RawModelRecord};
pub use manifest::{
    render_embedding_manifest, render_llm_manifest, render_rerank_manifest, render_tool_manifest,
    slugify, ToolKind,
};
pub use sync::{CatalogSynchronizer, ManifestPlan, SyncError, SyncOutcome, SyncSummary};
