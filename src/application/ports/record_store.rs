use crate::domain::entities::{Story, StoryRecord, StoryRecordDraft};
use crate::domain::value_objects::RecordId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable, indexed store for story records. Implementations catch every
/// raw storage error at this boundary and re-surface it through the
/// AppError taxonomy.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends a record, assigning `id` and, when absent, `created_at`.
    async fn insert(&self, draft: StoryRecordDraft) -> Result<RecordId, AppError>;

    async fn get_all(&self) -> Result<Vec<StoryRecord>, AppError>;

    /// A missing id is an absent result, not an error.
    async fn get_by_id(&self, id: RecordId) -> Result<Option<StoryRecord>, AppError>;

    /// Pending submissions in creation order — the replay order.
    async fn list_pending(&self) -> Result<Vec<StoryRecord>, AppError>;

    /// Returns false when the id was already gone.
    async fn remove(&self, id: RecordId) -> Result<bool, AppError>;

    /// Wipes all records. Hard resets only.
    async fn clear(&self) -> Result<(), AppError>;

    /// Idempotent archive-for-offline: an existing record for the same
    /// remote story id wins, and its id is returned unchanged.
    async fn archive(&self, story: &Story) -> Result<RecordId, AppError>;

    async fn list_archived(&self) -> Result<Vec<StoryRecord>, AppError>;

    /// Bumps the retry counter and stamps the attempt time.
    async fn mark_attempt(&self, id: RecordId) -> Result<(), AppError>;
}
