use crate::application::ports::record_store::RecordStore;
use crate::domain::entities::{Story, StoryRecord};
use crate::domain::value_objects::RecordId;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Save-for-offline reading. Archived records are created and deleted by
/// explicit user action only; the sync engine never touches them.
pub struct ArchiveService {
    records: Arc<dyn RecordStore>,
}

impl ArchiveService {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Archives a published story. Archiving the same story again returns
    /// the existing local id instead of duplicating the record.
    pub async fn archive(&self, story: &Story) -> Result<RecordId, AppError> {
        let id = self.records.archive(story).await?;
        info!("Story {} archived as record {id}", story.id);
        Ok(id)
    }

    pub async fn list(&self) -> Result<Vec<StoryRecord>, AppError> {
        self.records.list_archived().await
    }

    /// Removes one archived story. False when it was already gone.
    pub async fn remove(&self, id: RecordId) -> Result<bool, AppError> {
        self.records.remove(id).await
    }

    /// Hard reset of the whole record store.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.records.clear().await
    }
}
