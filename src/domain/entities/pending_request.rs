use crate::domain::value_objects::{RecordId, RequestId, RequestKind, StoryDraft};
use chrono::{DateTime, Utc};

/// A write captured while offline, waiting in the pending-request queue.
/// `record_id` links the request to the durable record holding the same
/// logical story; the link is what keeps a story from being submitted
/// twice when both stores are drained.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub kind: RequestKind,
    pub draft: StoryDraft,
    pub record_id: Option<RecordId>,
    pub attempts: u32,
    pub enqueued_at: DateTime<Utc>,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    pub fn new(kind: RequestKind, draft: StoryDraft, record_id: Option<RecordId>) -> Self {
        Self {
            request_id: RequestId::generate(),
            kind,
            draft,
            record_id,
            attempts: 0,
            enqueued_at: Utc::now(),
            last_attempt_at: None,
        }
    }

    pub fn mark_attempt(&mut self, at: DateTime<Utc>) {
        self.attempts += 1;
        self.last_attempt_at = Some(at);
    }
}
