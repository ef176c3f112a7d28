#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

use snaplink::config::Config;
use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::entities::NewShortUrl;
use snaplink::domain::repositories::UrlRepository;
use snaplink::infrastructure::cache::CacheService;
use snaplink::infrastructure::persistence::MemoryUrlRepository;
use snaplink::infrastructure::rate_limit::RateLimiter;
use snaplink::routes;
use snaplink::state::AppState;

pub const PEER: &str = "127.0.0.1:12345";

/// Running router plus handles on everything behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub repository: Arc<MemoryUrlRepository>,
    pub cache: Arc<dyn CacheService>,
    pub limiter: Arc<RateLimiter>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn test_config() -> Config {
    Config {
        click_queue_capacity: 100,
        cache_sweep_interval_seconds: 0,
        ..Config::default()
    }
}

pub fn spawn_app(config: Config) -> TestApp {
    spawn_app_with(config, MemoryUrlRepository::new())
}

pub fn spawn_app_with(config: Config, repository: MemoryUrlRepository) -> TestApp {
    let repository = Arc::new(repository);
    let assembly = AppState::assemble(&config, repository.clone());

    let app = routes::router(assembly.state.clone()).layer(MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        state: assembly.state,
        repository,
        cache: assembly.cache,
        limiter: assembly.limiter,
        clicks: assembly.click_receiver,
    }
}

/// Stores a record directly, bypassing creation-time validation.
pub async fn insert_record(
    repository: &MemoryUrlRepository,
    code: &str,
    url: &str,
    expires_at: Option<DateTime<Utc>>,
) {
    let draft = repository
        .create(NewShortUrl {
            original_url: url.to_string(),
            custom_alias: None,
            expires_at,
        })
        .await
        .unwrap();

    repository.assign_short_code(draft.id, code).await.unwrap();
}

/// Inserts `ConnectInfo` as if the request came from [`PEER`].
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
