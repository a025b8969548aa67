use crate::domain::model::Service;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Per-call context handed to the core: credentials, timeout and upstream URLs.
pub trait ConfigProvider: Send + Sync {
    fn translation_key(&self) -> &str;
    fn dictionary_key(&self) -> &str;
    fn timeout(&self) -> Duration;
    /// URL listing the supported directions of `service`.
    fn directions_url(&self, service: Service) -> &str;
    /// URL performing a translation or a dictionary lookup.
    fn content_url(&self, service: Service) -> &str;

    fn api_key(&self, service: Service) -> &str {
        match service {
            Service::Translation => self.translation_key(),
            Service::Dictionary => self.dictionary_key(),
        }
    }
}

/// Membership queries against the supported directions of each service.
#[async_trait]
pub trait DirectionCatalog: Send + Sync {
    async fn is_known(
        &self,
        ctx: &dyn ConfigProvider,
        service: Service,
        direction: &str,
    ) -> Result<bool>;
}
