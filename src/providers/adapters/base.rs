//! Base Provider Adapter
//! Credential defaults shared by every AIPing model shim

use super::traits::Credentials;
use crate::providers::constants::CHAT_MODE;
use crate::providers::resolve_endpoint_url;

/// Values injected into host credentials before a backend call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderDefaults {
    mode: Option<&'static str>,
}

impl ProviderDefaults {
    /// Endpoint injection only (embedding, rerank)
    pub fn new() -> Self {
        Self { mode: None }
    }

    /// Endpoint injection plus the chat interaction mode (language models)
    pub fn chat() -> Self {
        Self {
            mode: Some(CHAT_MODE),
        }
    }

    /// Fill in the endpoint and, for chat, force the interaction mode.
    pub fn apply(&self, credentials: &mut Credentials) {
        credentials.endpoint_url = Some(resolve_endpoint_url(credentials.endpoint_url.as_deref()));
        if let Some(mode) = self.mode {
            credentials.mode = Some(mode.to_string());
        }
    }
}
