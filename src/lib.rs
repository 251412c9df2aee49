pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::notifier::{NoticeKind, ShowNotification};
pub use application::services::{
    ConnectionState, ConnectivityMonitor, StoryService, SubmitOutcome, SyncService,
};
pub use domain::entities::{PendingRequest, Story, StoryPage, StoryRecord, SyncReport};
pub use domain::value_objects::{
    GeoPoint, Photo, PhotoMime, RecordId, RecordType, RemoteStoryId, RequestKind, StoryDraft,
    SubmissionStatus,
};
pub use shared::{AppConfig, AppError};
pub use state::AppContext;

/// Installs the tracing subscriber for the embedding shell. Call once.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cerita_client=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
