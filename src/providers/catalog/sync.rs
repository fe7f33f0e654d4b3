//! Catalog Synchronizer
//! Fetches the catalog and replaces the generated manifests in one pass

use super::classifier::CapabilityTag;
use super::fetcher::{CatalogFetcher, NormalizedModel};
use super::manifest::{
    render_embedding_manifest, render_llm_manifest, render_rerank_manifest, render_tool_manifest,
    slugify, ToolKind,
};
use crate::providers::constants::{
    EMBEDDING_MANIFEST_DIR, LLM_MANIFEST_DIR, RERANK_MANIFEST_DIR, TOOL_MANIFEST_DIR,
};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to prepare manifest directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to remove stale manifest {path}: {source}")]
    RemoveStale { path: PathBuf, source: io::Error },
    #[error("Failed to write manifest {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Manifest writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result of one synchronization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The catalog came back empty; existing manifests were left untouched.
    Skipped,
    Completed(SyncSummary),
}

// ============================================================================
// Summary
// ============================================================================

/// Per-capability counts of one catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub llm: usize,
    pub vlm: usize,
    pub embedding: usize,
    pub rerank: usize,
    pub text2image: usize,
    pub image2image: usize,
    /// Extra tags carried by multi-capability models
    pub duplicates: usize,
}

impl SyncSummary {
    pub fn from_catalog(models: &[NormalizedModel]) -> Self {
        let count = |tag: CapabilityTag| {
            models
                .iter()
                .filter(|m| m.capabilities.contains(tag))
                .count()
        };

        Self {
            llm: count(CapabilityTag::Llm),
            vlm: count(CapabilityTag::Vlm),
            embedding: count(CapabilityTag::Embedding),
            rerank: count(CapabilityTag::Rerank),
            text2image: count(CapabilityTag::Text2Image),
            image2image: count(CapabilityTag::Image2Image),
            duplicates: models
                .iter()
                .map(|m| m.capabilities.len().saturating_sub(1))
                .sum(),
        }
    }

    pub fn total(&self) -> usize {
        self.llm + self.vlm + self.embedding + self.rerank + self.text2image + self.image2image
    }

    pub fn unique(&self) -> usize {
        self.total().saturating_sub(self.duplicates)
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "LLM: {}, VLM: {}, Embedding: {}, Reranker: {}, T2I: {}, I2I: {}",
            self.llm, self.vlm, self.embedding, self.rerank, self.text2image, self.image2image
        )?;
        write!(
            f,
            "Total: {} ({} duplicates, {} unique)",
            self.total(),
            self.duplicates,
            self.unique()
        )
    }
}

// ============================================================================
// Manifest Plan
// ============================================================================

/// The complete set of generated files for one catalog snapshot, computed
/// before anything on disk changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestPlan {
    /// Model manifest directories, each replaced wholesale
    pub directories: Vec<(PathBuf, BTreeMap<String, String>)>,
    /// Tool manifests, overwritten in place
    pub tools: Vec<(PathBuf, String)>,
}

impl ManifestPlan {
    pub fn build(models: &[NormalizedModel]) -> Self {
        let render_dir = |filter: fn(&NormalizedModel) -> bool,
                          render: fn(&NormalizedModel) -> String| {
            models
                .iter()
                .filter(|m| filter(m))
                .map(|m| (format!("{}.yaml", slugify(&m.name)), render(m)))
                .collect::<BTreeMap<_, _>>()
        };

        let directories = vec![
            (
                PathBuf::from(LLM_MANIFEST_DIR),
                render_dir(|m| m.capabilities.is_language_model(), render_llm_manifest),
            ),
            (
                PathBuf::from(EMBEDDING_MANIFEST_DIR),
                render_dir(
                    |m| m.capabilities.contains(CapabilityTag::Embedding),
                    render_embedding_manifest,
                ),
            ),
            (
                PathBuf::from(RERANK_MANIFEST_DIR),
                render_dir(
                    |m| m.capabilities.contains(CapabilityTag::Rerank),
                    render_rerank_manifest,
                ),
            ),
        ];

        let tools = ToolKind::ALL
            .iter()
            .map(|kind| {
                let tag = match kind {
                    ToolKind::Text2Image => CapabilityTag::Text2Image,
                    ToolKind::Image2Image => CapabilityTag::Image2Image,
                };
                let names: Vec<String> = models
                    .iter()
                    .filter(|m| m.capabilities.contains(tag))
                    .map(|m| m.name.clone())
                    .collect();
                (
                    Path::new(TOOL_MANIFEST_DIR).join(kind.file_name()),
                    render_tool_manifest(*kind, &names),
                )
            })
            .collect();

        Self { directories, tools }
    }

    /// Write the plan under `root`, removing every `.yaml` file previously
    /// present in the model manifest directories.
    pub fn apply(&self, root: &Path) -> Result<(), SyncError> {
        for (relative, files) in &self.directories {
            let dir = root.join(relative);
            ensure_dir(&dir)?;
            remove_yaml_files(&dir)?;
            for (file_name, content) in files {
                write_file(&dir.join(file_name), content)?;
            }
        }

        for (relative, content) in &self.tools {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                ensure_dir(parent)?;
            }
            write_file(&path, content)?;
        }

        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(dir).map_err(|source| SyncError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn remove_yaml_files(dir: &Path) -> Result<(), SyncError> {
    let entries = fs::read_dir(dir).map_err(|source| SyncError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let path = entry
            .map_err(|source| SyncError::RemoveStale {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let is_yaml = path.extension().map(|ext| ext == "yaml").unwrap_or(false);
        if is_yaml && path.is_file() {
            debug!("[Sync] Removing {}", path.display());
            fs::remove_file(&path).map_err(|source| SyncError::RemoveStale {
                path: path.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), SyncError> {
    fs::write(path, content).map_err(|source| SyncError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Synchronizer
// ============================================================================

pub struct CatalogSynchronizer {
    fetcher: CatalogFetcher,
    output_root: PathBuf,
}

impl CatalogSynchronizer {
    pub fn new(fetcher: CatalogFetcher, output_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Run one full pass: fetch, render, replace.
    pub async fn sync(&self, endpoint_url: &str) -> Result<SyncOutcome, SyncError> {
        let models = self.fetcher.fetch(endpoint_url).await;
        if models.is_empty() {
            info!("[Sync] No models fetched from API, keeping existing manifests");
            return Ok(SyncOutcome::Skipped);
        }

        let plan = ManifestPlan::build(&models);
        let output_root = self.output_root.clone();
        tokio::task::spawn_blocking(move || plan.apply(&output_root)).await??;

        let summary = SyncSummary::from_catalog(&models);
        info!("[Sync] Generated manifests in {}", self.output_root.display());
        for line in summary.to_string().lines() {
            info!("[Sync]   {}", line);
        }

        Ok(SyncOutcome::Completed(summary))
    }
}
