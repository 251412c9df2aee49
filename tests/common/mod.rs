use async_trait::async_trait;
use bytes::Bytes;
use cerita_client::application::ports::notifier::{Notifier, ShowNotification};
use cerita_client::application::ports::record_store::RecordStore;
use cerita_client::application::ports::request_queue::RequestQueue;
use cerita_client::application::ports::story_api::{LoginSession, StoryApi, StoryListing};
use cerita_client::application::ports::token_store::TokenStore;
use cerita_client::application::services::{
    ArchiveService, ConnectivityMonitor, ConnectivityState, StoryService, SyncService,
};
use cerita_client::domain::entities::Story;
use cerita_client::domain::value_objects::{GeoPoint, Photo, RemoteStoryId, StoryDraft};
use cerita_client::infrastructure::database::ConnectionPool;
use cerita_client::infrastructure::offline::SqliteRecordStore;
use cerita_client::infrastructure::queue::{KvRequestQueue, KvStore, KvTokenStore};
use cerita_client::shared::config::SyncConfig;
use cerita_client::shared::error::AppError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct RecordingNotifier {
    pub notices: Mutex<Vec<ShowNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            notices: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: ShowNotification) {
        self.notices.lock().await.push(notification);
    }
}

/// Story-service double. Deliveries land in `sent`; `offline` makes every
/// call fail like a dead transport; `reject` fails specific descriptions
/// with a server rejection.
pub struct TestApi {
    pub sent: Mutex<Vec<String>>,
    pub offline: AtomicBool,
    pub reject: Mutex<HashSet<String>>,
}

impl TestApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            reject: Mutex::new(HashSet::new()),
        })
    }

    async fn deliver(&self, draft: &StoryDraft) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Network("connection refused".to_string()));
        }
        if self.reject.lock().await.contains(draft.description()) {
            return Err(AppError::RemoteRejected("story was rejected".to_string()));
        }
        self.sent.lock().await.push(draft.description().to_string());
        Ok(())
    }
}

#[async_trait]
impl StoryApi for TestApi {
    async fn register(&self, _: &str, _: &str, _: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn login(&self, _: &str, _: &str) -> Result<LoginSession, AppError> {
        Ok(LoginSession {
            user_id: "user-1".to_string(),
            name: "Dina".to_string(),
            token: "integration-token".to_string(),
        })
    }

    async fn create_story(&self, _token: &str, draft: &StoryDraft) -> Result<(), AppError> {
        self.deliver(draft).await
    }

    async fn create_guest_story(&self, draft: &StoryDraft) -> Result<(), AppError> {
        self.deliver(draft).await
    }

    async fn list_stories(&self, _: &str, _: u32, _: u32) -> Result<StoryListing, AppError> {
        Ok(StoryListing {
            stories: vec![],
            total_story: Some(0),
        })
    }

    async fn story_detail(&self, _: &str, id: &RemoteStoryId) -> Result<Story, AppError> {
        Ok(sample_story(id.as_str()))
    }
}

pub struct TestContext {
    pub stories: Arc<StoryService>,
    pub archive: ArchiveService,
    pub sync: Arc<SyncService>,
    pub monitor: ConnectivityMonitor,
    pub records: Arc<dyn RecordStore>,
    pub queue: Arc<dyn RequestQueue>,
    pub tokens: Arc<dyn TokenStore>,
    pub api: Arc<TestApi>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Wires the full core over the given database URL with a scripted API.
pub async fn setup_context(database_url: Option<&str>, initially_online: bool) -> TestContext {
    let pool = match database_url {
        Some(url) => {
            let config = cerita_client::shared::config::DatabaseConfig {
                url: url.to_string(),
                max_connections: 1,
                connection_timeout: 5,
            };
            ConnectionPool::new(&config).await.unwrap()
        }
        None => ConnectionPool::from_memory().await.unwrap(),
    };
    pool.migrate().await.unwrap();

    let kv = KvStore::new(pool.get_pool().clone());
    let records: Arc<dyn RecordStore> = Arc::new(SqliteRecordStore::new(pool.get_pool().clone()));
    let queue: Arc<dyn RequestQueue> = Arc::new(KvRequestQueue::new(kv.clone()));
    let tokens: Arc<dyn TokenStore> = Arc::new(KvTokenStore::new(kv));
    tokens.set_token("integration-token").await.unwrap();

    let api = TestApi::new();
    api.offline.store(!initially_online, Ordering::SeqCst);
    let notifier = RecordingNotifier::new();
    let state = ConnectivityState::new(initially_online);

    let sync_config = SyncConfig {
        auto_sync: true,
        max_retries: 3,
        retry_backoff_secs: 0,
    };

    let stories = Arc::new(StoryService::new(
        api.clone(),
        tokens.clone(),
        records.clone(),
        queue.clone(),
        state.clone(),
        notifier.clone(),
    ));
    let archive = ArchiveService::new(records.clone());
    let sync = Arc::new(SyncService::new(
        state.clone(),
        queue.clone(),
        records.clone(),
        api.clone(),
        tokens.clone(),
        notifier.clone(),
        sync_config,
    ));
    let monitor = ConnectivityMonitor::new(state, sync.clone(), notifier.clone(), true);

    TestContext {
        stories,
        archive,
        sync,
        monitor,
        records,
        queue,
        tokens,
        api,
        notifier,
    }
}

impl TestContext {
    /// Flip the scripted transport and the monitor together, the way the
    /// host's connectivity event would.
    pub async fn go_online(&self) -> Option<tokio::task::JoinHandle<cerita_client::SyncReport>> {
        self.api.offline.store(false, Ordering::SeqCst);
        self.monitor.set_online().await
    }

    pub async fn go_offline(&self) {
        self.api.offline.store(true, Ordering::SeqCst);
        self.monitor.set_offline().await;
    }
}

pub fn photo(size: usize, mime: &str) -> Result<Photo, String> {
    Photo::from_mime_str(mime, Bytes::from(vec![42u8; size]), Some("photo.bin".to_string()))
}

pub fn lake_trip_draft() -> StoryDraft {
    StoryDraft::new(
        "lake trip",
        photo(500 * 1024, "image/jpeg").unwrap(),
        Some(GeoPoint::new(-2.5, 118.0).unwrap()),
    )
    .unwrap()
}

pub fn sample_story(id: &str) -> Story {
    Story {
        id: RemoteStoryId::new(id).unwrap(),
        author_name: "Dina".to_string(),
        description: "sunset at the pier".to_string(),
        photo_url: "https://photos.example/pier.jpg".to_string(),
        created_at: chrono::Utc::now(),
        location: Some(GeoPoint::new(-6.2, 106.8).unwrap()),
    }
}
