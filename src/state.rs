use crate::application::ports::notifier::Notifier;
use crate::application::ports::record_store::RecordStore;
use crate::application::ports::request_queue::RequestQueue;
use crate::application::ports::story_api::StoryApi;
use crate::application::ports::token_store::TokenStore;
use crate::application::services::{
    ArchiveService, ConnectivityMonitor, ConnectivityState, StoryService, SyncService,
};
use crate::infrastructure::api::HttpStoryApi;
use crate::infrastructure::cache::{CacheInterceptor, HttpCache, ReqwestFetch};
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::notify::ChannelNotifier;
use crate::infrastructure::offline::SqliteRecordStore;
use crate::infrastructure::queue::{KvRequestQueue, KvStore, KvTokenStore};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Everything the embedding shell needs, wired once. Owning the pieces in
/// one explicit context (instead of module-level globals) is what lets
/// two contexts coexist in tests and keeps disposal trivial.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub records: Arc<dyn RecordStore>,
    pub queue: Arc<dyn RequestQueue>,
    pub tokens: Arc<dyn TokenStore>,
    pub api: Arc<dyn StoryApi>,
    pub notifier: Arc<ChannelNotifier>,
    pub stories: Arc<StoryService>,
    pub archive: Arc<ArchiveService>,
    pub sync: Arc<SyncService>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub interceptor: Arc<CacheInterceptor>,
}

impl AppContext {
    /// Builds the full context. `initially_online` is the host's current
    /// connectivity signal at startup.
    pub async fn new(config: AppConfig, initially_online: bool) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        // The default database URL lives under ./data.
        std::fs::create_dir_all("data")
            .map_err(|err| AppError::StorageUnavailable(err.to_string()))?;

        let pool = ConnectionPool::new(&config.database).await?;
        pool.migrate().await?;

        let kv = KvStore::new(pool.get_pool().clone());
        let records: Arc<dyn RecordStore> =
            Arc::new(SqliteRecordStore::new(pool.get_pool().clone()));
        let queue: Arc<dyn RequestQueue> = Arc::new(KvRequestQueue::new(kv.clone()));
        let tokens: Arc<dyn TokenStore> = Arc::new(KvTokenStore::new(kv));
        let api: Arc<dyn StoryApi> = Arc::new(HttpStoryApi::new(&config.api)?);
        let notifier = Arc::new(ChannelNotifier::default());
        let notifier_port: Arc<dyn Notifier> = notifier.clone();

        let connectivity_state = ConnectivityState::new(initially_online);

        let stories = Arc::new(StoryService::new(
            api.clone(),
            tokens.clone(),
            records.clone(),
            queue.clone(),
            connectivity_state.clone(),
            notifier_port.clone(),
        ));
        let archive = Arc::new(ArchiveService::new(records.clone()));
        let sync = Arc::new(SyncService::new(
            connectivity_state.clone(),
            queue.clone(),
            records.clone(),
            api.clone(),
            tokens.clone(),
            notifier_port.clone(),
            config.sync.clone(),
        ));
        let connectivity = Arc::new(ConnectivityMonitor::new(
            connectivity_state,
            sync.clone(),
            notifier_port,
            config.sync.auto_sync,
        ));

        let cache = Arc::new(HttpCache::new(&config.cache.partitions));
        let fetch = Arc::new(ReqwestFetch::new(
            &config.cache.app_origin,
            config.api.timeout_secs,
        )?);
        let interceptor = Arc::new(CacheInterceptor::new(
            cache,
            fetch,
            &config.api.base_url,
        ));
        // Startup doubles as activation: old partitions do not survive it.
        interceptor.activate().await;

        info!("Application context initialized");

        Ok(Self {
            config,
            pool,
            records,
            queue,
            tokens,
            api,
            notifier,
            stories,
            archive,
            sync,
            connectivity,
            interceptor,
        })
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("Application context shut down");
    }
}
