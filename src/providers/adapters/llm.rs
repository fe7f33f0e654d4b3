//! AIPing Language Model Adapter
//! Injects AIPing defaults and folds the custom `enable_thinking` / `sort`
//! parameters into the `extra_body` object the upstream API expects

use super::base::ProviderDefaults;
use super::traits::{
    AdapterError, ChatRequest, Credentials, LargeLanguageModel, ModelParameters, PromptMessage,
    PromptMessageTool,
};
use crate::providers::constants::{is_known_sort, SORT_NONE};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

pub struct AipingLargeLanguageModel<B> {
    base: B,
    defaults: ProviderDefaults,
}

impl<B> AipingLargeLanguageModel<B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            defaults: ProviderDefaults::chat(),
        }
    }

    pub fn base(&self) -> &B {
        &self.base
    }
}

/// Move `enable_thinking` and `sort` out of the parameter map and into
/// `extra_body`. A `sort` of `none` (or empty) disables provider routing.
pub fn fold_custom_parameters(parameters: &mut ModelParameters) {
    let mut extra_body = Map::new();

    if let Some(enable_thinking) = parameters.remove("enable_thinking") {
        extra_body.insert("enable_thinking".to_string(), enable_thinking);
    }

    if let Some(sort) = parameters.remove("sort") {
        match sort.as_str() {
            Some(sort) if !sort.is_empty() && sort != SORT_NONE => {
                if !is_known_sort(sort) {
                    debug!("[AIPing] Forwarding unrecognized sort value: {}", sort);
                }
                extra_body.insert("provider".to_string(), provider_routing(sort));
            }
            _ => debug!("[AIPing] Provider routing disabled (sort={})", sort),
        }
    }

    if extra_body.is_empty() {
        return;
    }

    match parameters.get_mut("extra_body") {
        Some(Value::Object(existing)) => existing.extend(extra_body),
        _ => {
            parameters.insert("extra_body".to_string(), Value::Object(extra_body));
        }
    }
}

/// Provider routing preference with empty filters
fn provider_routing(sort: &str) -> Value {
    json!({
        "only": [],
        "order": [],
        "sort": sort,
        "input_price_range": [],
        "output_price_range": [],
        "throughput_range": [],
        "latency_range": [],
        "input_length_range": [],
        "allow_filter_prompt_length": true,
        "ignore": [],
        "allow_fallbacks": true
    })
}

#[async_trait]
impl<B: LargeLanguageModel> LargeLanguageModel for AipingLargeLanguageModel<B> {
    type Output = B::Output;

    async fn invoke(
        &self,
        mut request: ChatRequest,
        credentials: &mut Credentials,
    ) -> Result<Self::Output, AdapterError> {
        fold_custom_parameters(&mut request.model_parameters);
        self.defaults.apply(credentials);
        self.base.invoke(request, credentials).await
    }

    async fn validate_credentials(
        &self,
        model: &str,
        credentials: &mut Credentials,
    ) -> Result<(), AdapterError> {
        self.defaults.apply(credentials);
        self.base.validate_credentials(model, credentials).await
    }

    async fn get_num_tokens(
        &self,
        model: &str,
        credentials: &mut Credentials,
        prompt_messages: &[PromptMessage],
        tools: Option<&[PromptMessageTool]>,
    ) -> Result<usize, AdapterError> {
        self.defaults.apply(credentials);
        self.base
            .get_num_tokens(model, credentials, prompt_messages, tools)
            .await
    }
}
