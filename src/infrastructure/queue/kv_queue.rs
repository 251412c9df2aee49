use crate::application::ports::request_queue::RequestQueue;
use crate::domain::entities::PendingRequest;
use crate::domain::value_objects::{GeoPoint, Photo, RecordId, RequestId, RequestKind, StoryDraft};
use crate::infrastructure::offline::mappers::timestamp_to_datetime;
use crate::infrastructure::queue::kv_store::{KvStore, QUEUE_KEY};
use crate::shared::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Wire form of a queued request inside the serialized queue blob. The
/// photo travels base64-encoded; the blob's backing store is text-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueuedRequestBlob {
    request_id: String,
    kind: String,
    description: String,
    photo_b64: String,
    photo_mime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    record_id: Option<i64>,
    #[serde(default)]
    attempts: u32,
    enqueued_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_attempt_at: Option<i64>,
}

fn blob_from_request(request: &PendingRequest) -> QueuedRequestBlob {
    let draft = &request.draft;
    QueuedRequestBlob {
        request_id: request.request_id.to_string(),
        kind: request.kind.as_str().to_string(),
        description: draft.description().to_string(),
        photo_b64: STANDARD.encode(draft.photo().bytes()),
        photo_mime: draft.photo().mime().to_string(),
        file_name: Some(draft.photo().file_name().to_string()),
        lat: draft.location().map(|loc| loc.lat()),
        lon: draft.location().map(|loc| loc.lon()),
        record_id: request.record_id.map(|id| id.value()),
        attempts: request.attempts,
        enqueued_at: request.enqueued_at.timestamp(),
        last_attempt_at: request.last_attempt_at.map(|at| at.timestamp()),
    }
}

fn request_from_blob(blob: QueuedRequestBlob) -> Result<PendingRequest, AppError> {
    let request_id =
        RequestId::from_str_value(&blob.request_id).map_err(AppError::Validation)?;
    let kind = RequestKind::from_str(&blob.kind).map_err(AppError::Validation)?;
    let bytes = STANDARD
        .decode(blob.photo_b64.as_bytes())
        .map_err(|err| AppError::DeserializationError(format!("Invalid photo payload: {err}")))?;
    let photo = Photo::from_mime_str(&blob.photo_mime, Bytes::from(bytes), blob.file_name)
        .map_err(AppError::Validation)?;
    let location = match (blob.lat, blob.lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon).map_err(AppError::Validation)?),
        _ => None,
    };
    let draft =
        StoryDraft::new(blob.description, photo, location).map_err(AppError::Validation)?;
    let record_id = blob
        .record_id
        .map(RecordId::new)
        .transpose()
        .map_err(AppError::Validation)?;

    Ok(PendingRequest {
        request_id,
        kind,
        draft,
        record_id,
        attempts: blob.attempts,
        enqueued_at: timestamp_to_datetime(blob.enqueued_at),
        last_attempt_at: blob.last_attempt_at.map(timestamp_to_datetime),
    })
}

/// The pending-request queue: one JSON array under a fixed key, read and
/// rewritten whole, exactly like the web client kept it in localStorage.
pub struct KvRequestQueue {
    kv: KvStore,
}

impl KvRequestQueue {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    async fn read_blobs(&self) -> Result<Vec<QueuedRequestBlob>, AppError> {
        match self.kv.get(QUEUE_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|err| AppError::DeserializationError(err.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn write_blobs(&self, blobs: &[QueuedRequestBlob]) -> Result<(), AppError> {
        let raw = serde_json::to_string(blobs)?;
        self.kv.set(QUEUE_KEY, &raw).await
    }
}

#[async_trait]
impl RequestQueue for KvRequestQueue {
    async fn enqueue(&self, request: PendingRequest) -> Result<(), AppError> {
        let mut blobs = self.read_blobs().await?;
        blobs.push(blob_from_request(&request));
        self.write_blobs(&blobs).await
    }

    async fn drain(&self) -> Result<Vec<PendingRequest>, AppError> {
        let blobs = self.read_blobs().await?;
        let mut requests = Vec::with_capacity(blobs.len());
        for blob in blobs {
            match request_from_blob(blob) {
                Ok(request) => requests.push(request),
                // An undecodable entry can never be replayed; dropping it
                // at the next replace is the only way the queue recovers.
                Err(err) => warn!("Discarding unreadable queued request: {err}"),
            }
        }
        Ok(requests)
    }

    async fn replace(&self, queue: Vec<PendingRequest>) -> Result<(), AppError> {
        let blobs: Vec<QueuedRequestBlob> = queue.iter().map(blob_from_request).collect();
        self.write_blobs(&blobs).await
    }
}
