//! AIPing Rerank Adapter

use super::base::ProviderDefaults;
use super::traits::{AdapterError, Credentials, RerankModel, RerankRequest};
use async_trait::async_trait;

pub struct AipingRerankModel<B> {
    base: B,
    defaults: ProviderDefaults,
}

impl<B> AipingRerankModel<B> {
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
impl<B: RerankModel> RerankModel for AipingRerankModel<B> {
    type Output = B::Output;

    async fn invoke(
        &self,
        request: RerankRequest,
        credentials: &mut Credentials,
    ) -> Result<Self::Output, AdapterError> {
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
}
