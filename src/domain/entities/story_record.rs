use crate::domain::entities::story::Story;
use crate::domain::value_objects::{
    GeoPoint, Photo, RecordId, RecordType, RemoteStoryId, RequestKind, StoryDraft,
    SubmissionStatus,
};
use chrono::{DateTime, Utc};

/// A row of the durable record store. Two roles share the table,
/// distinguished by `record_type`: pending submissions keep the raw photo
/// so a queued story survives a restart; archived records keep the
/// published photo URL for offline reading.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRecord {
    pub id: RecordId,
    pub record_type: RecordType,
    pub request_kind: Option<RequestKind>,
    pub remote_story_id: Option<RemoteStoryId>,
    pub author_name: Option<String>,
    pub description: String,
    pub photo_url: Option<String>,
    pub photo: Option<Photo>,
    pub location: Option<GeoPoint>,
    pub status: SubmissionStatus,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl StoryRecord {
    pub fn is_pending_submission(&self) -> bool {
        self.record_type == RecordType::PendingSubmission
            && self.status == SubmissionStatus::Pending
    }

    /// Rebuilds the submission draft held by a pending record. `None` when
    /// the record does not carry a photo payload (an archived record, or a
    /// corrupted row) — such a record can never be replayed.
    pub fn to_draft(&self) -> Option<StoryDraft> {
        let photo = self.photo.clone()?;
        StoryDraft::new(self.description.clone(), photo, self.location).ok()
    }
}

/// Insert payload for the record store; `id` and `created_at` are assigned
/// by the store unless supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRecordDraft {
    pub record_type: RecordType,
    pub request_kind: Option<RequestKind>,
    pub remote_story_id: Option<RemoteStoryId>,
    pub author_name: Option<String>,
    pub description: String,
    pub photo_url: Option<String>,
    pub photo: Option<Photo>,
    pub location: Option<GeoPoint>,
    pub status: SubmissionStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl StoryRecordDraft {
    /// A pending-submission record captured while offline.
    pub fn pending(kind: RequestKind, draft: &StoryDraft) -> Self {
        Self {
            record_type: RecordType::PendingSubmission,
            request_kind: Some(kind),
            remote_story_id: None,
            author_name: None,
            description: draft.description().to_string(),
            photo_url: None,
            photo: Some(draft.photo().clone()),
            location: draft.location(),
            status: SubmissionStatus::Pending,
            created_at: None,
            archived_at: None,
        }
    }

    /// An archived copy of a published story.
    pub fn archived(story: &Story) -> Self {
        Self {
            record_type: RecordType::Archived,
            request_kind: None,
            remote_story_id: Some(story.id.clone()),
            author_name: Some(story.author_name.clone()),
            description: story.description.clone(),
            photo_url: Some(story.photo_url.clone()),
            photo: None,
            location: story.location,
            status: SubmissionStatus::Sent,
            created_at: Some(story.created_at),
            archived_at: Some(Utc::now()),
        }
    }
}
