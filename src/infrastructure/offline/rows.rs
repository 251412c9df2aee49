use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct StoryRecordRow {
    pub id: i64,
    pub record_type: String,
    pub request_kind: Option<String>,
    pub remote_story_id: Option<String>,
    pub author_name: Option<String>,
    pub description: String,
    pub photo_url: Option<String>,
    pub photo_mime: Option<String>,
    pub photo_blob: Option<Vec<u8>>,
    pub photo_file_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub status: String,
    pub retry_count: i64,
    pub created_at: i64,
    pub archived_at: Option<i64>,
    pub last_attempt_at: Option<i64>,
}
