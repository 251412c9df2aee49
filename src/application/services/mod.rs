pub mod archive_service;
pub mod connectivity;
pub mod story_service;
pub mod sync_service;

pub use archive_service::ArchiveService;
pub use connectivity::{ConnectionState, ConnectivityMonitor, ConnectivityState};
pub use story_service::{StoryService, SubmitOutcome};
pub use sync_service::SyncService;
