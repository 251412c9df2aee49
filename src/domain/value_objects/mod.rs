pub mod geo;
pub mod photo;
pub mod record_id;
pub mod record_type;
pub mod remote_story_id;
pub mod request_id;
pub mod request_kind;
pub mod story_draft;
pub mod submission_status;

pub use geo::GeoPoint;
pub use photo::{Photo, PhotoMime, MAX_PHOTO_BYTES};
pub use record_id::RecordId;
pub use record_type::RecordType;
pub use remote_story_id::RemoteStoryId;
pub use request_id::RequestId;
pub use request_kind::RequestKind;
pub use story_draft::StoryDraft;
pub use submission_status::SubmissionStatus;
