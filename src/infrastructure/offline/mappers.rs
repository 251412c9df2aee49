use crate::domain::entities::StoryRecord;
use crate::domain::value_objects::{
    GeoPoint, Photo, RecordId, RecordType, RemoteStoryId, RequestKind, SubmissionStatus,
};
use crate::infrastructure::offline::rows::StoryRecordRow;
use crate::shared::error::AppError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::str::FromStr;

pub fn record_from_row(row: StoryRecordRow) -> Result<StoryRecord, AppError> {
    let id = RecordId::new(row.id).map_err(AppError::Validation)?;
    let record_type = RecordType::from_str(&row.record_type).map_err(AppError::Validation)?;
    let request_kind = row
        .request_kind
        .as_deref()
        .map(RequestKind::from_str)
        .transpose()
        .map_err(AppError::Validation)?;
    let remote_story_id = row
        .remote_story_id
        .map(RemoteStoryId::new)
        .transpose()
        .map_err(AppError::Validation)?;
    let status = SubmissionStatus::from_str(&row.status).map_err(AppError::Validation)?;

    let photo = match (row.photo_mime.as_deref(), row.photo_blob) {
        (Some(mime), Some(blob)) => Some(
            Photo::from_mime_str(mime, Bytes::from(blob), row.photo_file_name.clone())
                .map_err(AppError::Validation)?,
        ),
        _ => None,
    };

    let location = match (row.lat, row.lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon).map_err(AppError::Validation)?),
        _ => None,
    };

    let retry_count = u32::try_from(row.retry_count)
        .map_err(|_| AppError::Validation("retry_count cannot be negative".to_string()))?;

    Ok(StoryRecord {
        id,
        record_type,
        request_kind,
        remote_story_id,
        author_name: row.author_name,
        description: row.description,
        photo_url: row.photo_url,
        photo,
        location,
        status,
        retry_count,
        created_at: timestamp_to_datetime(row.created_at),
        archived_at: row.archived_at.map(timestamp_to_datetime),
        last_attempt_at: row.last_attempt_at.map(timestamp_to_datetime),
    })
}

pub fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .or_else(|| DateTime::<Utc>::from_timestamp_millis(ts))
        .unwrap_or_else(Utc::now)
}
