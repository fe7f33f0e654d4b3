//! AIPing Text Embedding Adapter

use super::base::ProviderDefaults;
use super::traits::{AdapterError, Credentials, EmbeddingRequest, TextEmbeddingModel};
use async_trait::async_trait;

pub struct AipingTextEmbeddingModel<B> {
    base: B,
    defaults: ProviderDefaults,
}

impl<B> AipingTextEmbeddingModel<B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            defaults: ProviderDefaults::new(),
        }
    }

    pub fn base(&self) -> &B {
        &self.base
    }
}

#[async_trait]
impl<B: TextEmbeddingModel> TextEmbeddingModel for AipingTextEmbeddingModel<B> {
    type Output = B::Output;

    async fn invoke(
        &self,
        request: EmbeddingRequest,
        credentials: &mut Credentials,
    ) -> Result<Self::Output, AdapterError> {
        self.defaults.apply(credentials);
        self.base.invoke(request, credentials).await
    }

    async fn get_num_tokens(
        &self,
        model: &str,
        credentials: &mut Credentials,
        texts: &[String],
    ) -> Result<Vec<usize>, AdapterError> {
        self.defaults.apply(credentials);
        self.base.get_num_tokens(model, credentials, texts).await
    }

    async fn validate_credentials(
        &self,
        model: &str,
        credentials: &mut Credentials,
    ) -> Result<(), AdapterError> {
        self.defaults.apply(credentials);
        self.base.validate_credentials(model, credentials).await
    }
}
