pub mod pending_request;
pub mod story;
pub mod story_record;
pub mod sync_report;

pub use pending_request::PendingRequest;
pub use story::{Story, StoryPage};
pub use story_record::{StoryRecord, StoryRecordDraft};
pub use sync_report::SyncReport;
