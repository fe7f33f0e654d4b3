//! Catalog Fetcher
//! Pulls the provider's model listing and normalizes the usable entries

use super::classifier::{classify, CapabilitySet, ModelType};
use crate::providers::constants::{DEFAULT_CONTEXT_SIZE, MODELS_ROUTE};
use crate::providers::{build_http_client, join_endpoint};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// Data Types
// ============================================================================

/// One entry of the `/models` response, as sent by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RawModelRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model_type: Option<Value>,
    #[serde(default)]
    pub is_foreign: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub context_length_range: Option<Value>,
}

/// A catalog model that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedModel {
    pub name: String,
    pub model_type: ModelType,
    pub capabilities: CapabilitySet,
    pub context_size: u64,
}

impl NormalizedModel {
    pub fn new(name: impl Into<String>, model_type: ModelType, context_size: u64) -> Self {
        let capabilities = classify(&model_type);
        Self {
            name: name.into(),
            model_type,
            capabilities,
            context_size,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("Unexpected catalog payload: {0}")]
    Payload(String),
}

// ============================================================================
// Normalization
// ============================================================================

impl RawModelRecord {
    /// Convert into a `NormalizedModel`, or `None` when the record is foreign,
    /// unavailable or unnamed.
    pub fn normalize(self) -> Option<NormalizedModel> {
        if is_truthy(self.is_foreign.as_ref()) || !is_truthy(self.status.as_ref()) {
            return None;
        }

        let name = self.id.filter(|id| !id.trim().is_empty())?;
        let model_type = ModelType::from_value(self.model_type.as_ref());
        let context_size = resolve_context_size(self.context_length_range.as_ref());

        Some(NormalizedModel::new(name, model_type, context_size))
    }
}

/// Use the upper bound of `context_length_range` when present.
fn resolve_context_size(range: Option<&Value>) -> u64 {
    range
        .and_then(Value::as_array)
        .filter(|bounds| bounds.len() >= 2)
        .and_then(|bounds| bounds[1].as_u64())
        .unwrap_or(DEFAULT_CONTEXT_SIZE)
}

/// JSON truthiness: null, false, 0, "" and empty containers are false.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Extract the usable models from a decoded `/models` body.
pub fn parse_catalog(body: &Value) -> Result<Vec<NormalizedModel>, CatalogError> {
    let object = body
        .as_object()
        .ok_or_else(|| CatalogError::Payload("top-level value is not an object".to_string()))?;

    let records = match object.get("data") {
        Some(Value::Array(records)) => records,
        _ => return Ok(Vec::new()),
    };

    let models = records
        .iter()
        .filter_map(|record| match RawModelRecord::deserialize(record) {
            Ok(raw) => raw.normalize(),
            Err(e) => {
                debug!("[Catalog] Skipping malformed model record: {}", e);
                None
            }
        })
        .collect();

    Ok(models)
}

// ============================================================================
// Fetcher
// ============================================================================

/// HTTP client for the provider's `/models` listing.
#[derive(Clone, Debug)]
pub struct CatalogFetcher {
    http: reqwest::Client,
}

impl CatalogFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
        }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch the catalog. Failures are logged and produce an empty list so
    /// that previously generated manifests stay in place.
    pub async fn fetch(&self, endpoint_url: &str) -> Vec<NormalizedModel> {
        match self.try_fetch(endpoint_url).await {
            Ok(models) => models,
            Err(e) => {
                warn!("[Catalog] Failed to fetch models from {}: {}", endpoint_url, e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, endpoint_url: &str) -> Result<Vec<NormalizedModel>, CatalogError> {
        let url = join_endpoint(endpoint_url, MODELS_ROUTE)?;
        debug!("[Catalog] GET {}", url);

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpError(response.status().to_string()));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::Payload(e.to_string()))?;

        parse_catalog(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::catalog::CapabilityTag;
    use serde_json::json;

    #[test]
    fn foreign_and_unavailable_records_are_dropped() {
        let body = json!({
            "data": [
                {"id": "keep", "model_type": "llm", "is_foreign": false, "status": true},
                {"id": "foreign", "model_type": "llm", "is_foreign": true, "status": true},
                {"id": "offline", "model_type": "llm", "is_foreign": false, "status": false},
                {"id": "no-status", "model_type": "llm"},
                {"id": "numeric-status", "model_type": "llm", "status": 1}
            ]
        });

        let names: Vec<_> = parse_catalog(&body)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["keep", "numeric-status"]);
    }

    #[test]
    fn context_size_uses_upper_bound_or_default() {
        let body = json!({
            "data": [
                {"id": "a", "status": true, "context_length_range": [1000, 200000]},
                {"id": "b", "status": true, "context_length_range": [4096]},
                {"id": "c", "status": true}
            ]
        });

        let sizes: Vec<_> = parse_catalog(&body)
            .unwrap()
            .into_iter()
            .map(|m| m.context_size)
            .collect();
        assert_eq!(sizes, vec![200_000, DEFAULT_CONTEXT_SIZE, DEFAULT_CONTEXT_SIZE]);
    }

    #[test]
    fn malformed_and_unnamed_records_are_skipped() {
        let body = json!({
            "data": [
                {"id": 12, "status": true},
                {"id": "", "status": true},
                "garbage",
                {"id": "ok", "status": true, "model_type": ["llm", "vlm"]}
            ]
        });

        let models = parse_catalog(&body).unwrap();
        assert_eq!(models.len(), 1);
        assert!(models[0].capabilities.contains(CapabilityTag::Vlm));
    }

    #[test]
    fn non_object_body_is_an_error() {
        assert!(parse_catalog(&json!([1, 2, 3])).is_err());
        assert!(parse_catalog(&json!({"object": "list"})).unwrap().is_empty());
    }
}
