//! Shared application state and its assembly from configuration.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::UrlService;
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache};
use crate::infrastructure::rate_limit::RateLimiter;
use crate::utils::code_generator::ShortCodeGenerator;

/// State injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Trust proxy headers when resolving the client key.
    pub behind_proxy: bool,
}

/// Components built once at startup.
///
/// The cache and limiter are shared between the request path (through
/// [`UrlService`]) and the background maintenance task.
pub struct Assembly {
    pub state: AppState,
    pub cache: Arc<dyn CacheService>,
    pub limiter: Arc<RateLimiter>,
    pub click_receiver: mpsc::Receiver<ClickEvent>,
}

impl AppState {
    /// Builds the cache, rate limiter, click channel and coordinator on top of
    /// `repository`.
    pub fn assemble(config: &Config, repository: Arc<dyn UrlRepository>) -> Assembly {
        let cache: Arc<dyn CacheService> = if config.cache_enabled {
            Arc::new(MemoryCache::new(config.cache_max_size, config.cache_ttl()))
        } else {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        };

        let limiter = Arc::new(RateLimiter::new(config.rate_limit_config()));
        let (click_sender, click_receiver) = mpsc::channel(config.click_queue_capacity);

        let url_service = Arc::new(UrlService::new(
            repository,
            cache.clone(),
            limiter.clone(),
            ShortCodeGenerator::new(config.short_code_min_length),
            click_sender.clone(),
            config.service_settings(),
        ));

        Assembly {
            state: AppState {
                url_service,
                click_sender,
                behind_proxy: config.behind_proxy,
            },
            cache,
            limiter,
            click_receiver,
        }
    }
}
