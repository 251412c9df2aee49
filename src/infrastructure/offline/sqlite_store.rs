use crate::application::ports::record_store::RecordStore;
use crate::domain::entities::{Story, StoryRecord, StoryRecordDraft};
use crate::domain::value_objects::{RecordId, RecordType, SubmissionStatus};
use crate::infrastructure::offline::mappers::record_from_row;
use crate::infrastructure::offline::rows::StoryRecordRow;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

pub struct SqliteRecordStore {
    pool: Pool<Sqlite>,
}

impl SqliteRecordStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn insert_row(&self, draft: &StoryRecordDraft) -> Result<i64, AppError> {
        let created_at = draft.created_at.unwrap_or_else(Utc::now).timestamp();
        let archived_at = draft.archived_at.map(|at| at.timestamp());
        let photo_mime = draft.photo.as_ref().map(|photo| photo.mime().to_string());
        let photo_blob = draft.photo.as_ref().map(|photo| photo.bytes().to_vec());
        let photo_file_name = draft
            .photo
            .as_ref()
            .map(|photo| photo.file_name().to_string());

        let result = sqlx::query(
            r#"
            INSERT INTO story_records (
                record_type, request_kind, remote_story_id, author_name,
                description, photo_url, photo_mime, photo_blob, photo_file_name,
                lat, lon, status, retry_count, created_at, archived_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0, ?13, ?14)
            "#,
        )
        .bind(draft.record_type.as_str())
        .bind(draft.request_kind.map(|kind| kind.as_str()))
        .bind(draft.remote_story_id.as_ref().map(|id| id.as_str()))
        .bind(&draft.author_name)
        .bind(&draft.description)
        .bind(&draft.photo_url)
        .bind(photo_mime)
        .bind(photo_blob)
        .bind(photo_file_name)
        .bind(draft.location.map(|loc| loc.lat()))
        .bind(draft.location.map(|loc| loc.lon()))
        .bind(draft.status.as_str())
        .bind(created_at)
        .bind(archived_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(&self, draft: StoryRecordDraft) -> Result<RecordId, AppError> {
        let id = self.insert_row(&draft).await?;
        RecordId::new(id).map_err(AppError::Validation)
    }

    async fn get_all(&self) -> Result<Vec<StoryRecord>, AppError> {
        let rows = sqlx::query_as::<_, StoryRecordRow>(
            "SELECT * FROM story_records ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn get_by_id(&self, id: RecordId) -> Result<Option<StoryRecord>, AppError> {
        let row = sqlx::query_as::<_, StoryRecordRow>("SELECT * FROM story_records WHERE id = ?1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.map(record_from_row).transpose()
    }

    async fn list_pending(&self) -> Result<Vec<StoryRecord>, AppError> {
        let rows = sqlx::query_as::<_, StoryRecordRow>(
            r#"
            SELECT * FROM story_records
            WHERE record_type = ?1 AND status = ?2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(RecordType::PendingSubmission.as_str())
        .bind(SubmissionStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn remove(&self, id: RecordId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM story_records WHERE id = ?1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM story_records")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn archive(&self, story: &Story) -> Result<RecordId, AppError> {
        // Re-archiving the same remote story returns the existing local id.
        let existing = sqlx::query_as::<_, StoryRecordRow>(
            r#"
            SELECT * FROM story_records
            WHERE record_type = ?1 AND remote_story_id = ?2
            LIMIT 1
            "#,
        )
        .bind(RecordType::Archived.as_str())
        .bind(story.id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = existing {
            return RecordId::new(row.id).map_err(AppError::Validation);
        }

        let id = self.insert_row(&StoryRecordDraft::archived(story)).await?;
        RecordId::new(id).map_err(AppError::Validation)
    }

    async fn list_archived(&self) -> Result<Vec<StoryRecord>, AppError> {
        let rows = sqlx::query_as::<_, StoryRecordRow>(
            r#"
            SELECT * FROM story_records
            WHERE record_type = ?1
            ORDER BY archived_at DESC, id DESC
            "#,
        )
        .bind(RecordType::Archived.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn mark_attempt(&self, id: RecordId) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE story_records
            SET retry_count = retry_count + 1, last_attempt_at = ?1
            WHERE id = ?2
            "#,
        )
        .bind(Utc::now().timestamp())
        .bind(id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
