use crate::core::executor::UpstreamClient;
use crate::core::normalizer;
use crate::domain::model::Service;
use crate::domain::ports::{ConfigProvider, DirectionCatalog};
use crate::utils::error::{BotError, Result};
use crate::utils::validation;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, OnceCell};

/// Cached directions of one service plus the gate serialising population.
#[derive(Debug, Default)]
struct Slot {
    directions: OnceCell<Vec<String>>,
    failures: AtomicU64,
    last_failure: Mutex<Option<BotError>>,
}

/// Supported language directions of both services, fetched on first use.
///
/// Concurrent first callers share a single upstream request and its outcome.
/// A failed population leaves the cache empty, so the next caller arriving
/// after the failure tries again.
#[derive(Debug, Default)]
pub struct LanguageCatalog {
    upstream: UpstreamClient,
    translation: Slot,
    dictionary: Slot,
}

impl LanguageCatalog {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream,
            translation: Slot::default(),
            dictionary: Slot::default(),
        }
    }

    fn slot(&self, service: Service) -> &Slot {
        match service {
            Service::Translation => &self.translation,
            Service::Dictionary => &self.dictionary,
        }
    }

    /// Fetches the direction list of `service` from upstream, bypassing the cache.
    pub async fn load(&self, ctx: &dyn ConfigProvider, service: Service) -> Result<Vec<String>> {
        let key_field = match service {
            Service::Translation => "api.translation_key",
            Service::Dictionary => "api.dictionary_key",
        };
        let key = validation::require_non_empty(key_field, ctx.api_key(service))?;
        let timeout = validation::require_timeout("api.timeout_seconds", ctx.timeout())?;

        let params: Vec<(&str, &str)> = match service {
            Service::Translation => vec![("key", key)],
            Service::Dictionary => vec![("key", key), ("ui", "en")],
        };

        let body = self
            .upstream
            .execute(ctx.directions_url(service), &params, timeout)
            .await?;
        let directions = normalizer::decode_directions(service, &body)?.into_sorted();

        tracing::info!("📚 Loaded {} {} directions", directions.len(), service);
        Ok(directions)
    }

    /// Sorted directions of `service`, populating the cache on first use.
    pub async fn directions(
        &self,
        ctx: &dyn ConfigProvider,
        service: Service,
    ) -> Result<&[String]> {
        let slot = self.slot(service);
        if let Some(directions) = slot.directions.get() {
            return Ok(directions.as_slice());
        }

        let seen = slot.failures.load(Ordering::Acquire);
        let mut last_failure = slot.last_failure.lock().await;

        if let Some(directions) = slot.directions.get() {
            return Ok(directions.as_slice());
        }
        // 等待期間已有一次失敗的載入，直接回傳同一個錯誤
        if slot.failures.load(Ordering::Acquire) != seen {
            if let Some(e) = last_failure.as_ref() {
                return Err(e.clone());
            }
        }

        match self.load(ctx, service).await {
            Ok(loaded) => {
                last_failure.take();
                let directions = slot.directions.get_or_init(|| async { loaded }).await;
                Ok(directions.as_slice())
            }
            Err(e) => {
                tracing::warn!("⚠️ Populating {} directions failed: {}", service, e);
                *last_failure = Some(e.clone());
                slot.failures.fetch_add(1, Ordering::Release);
                Err(e)
            }
        }
    }

    pub fn is_populated(&self, service: Service) -> bool {
        self.slot(service).directions.initialized()
    }

    /// Tries to populate both catalogs. Failures are logged and left for the
    /// lazy path to retry.
    pub async fn preload(&self, ctx: &dyn ConfigProvider) {
        for service in [Service::Translation, Service::Dictionary] {
            if let Err(e) = self.directions(ctx, service).await {
                tracing::warn!("⚠️ Could not preload {} directions: {}", service, e);
            }
        }
    }
}

#[async_trait]
impl DirectionCatalog for LanguageCatalog {
    async fn is_known(
        &self,
        ctx: &dyn ConfigProvider,
        service: Service,
        direction: &str,
    ) -> Result<bool> {
        let directions = self.directions(ctx, service).await?;
        Ok(contains_direction(directions, direction))
    }
}

/// Exact-match binary search over an ascending list.
pub fn contains_direction(sorted: &[String], direction: &str) -> bool {
    sorted
        .binary_search_by(|probe| probe.as_str().cmp(direction))
        .is_ok()
}
