use crate::domain::entities::PendingRequest;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// The pending-request queue: an ordered list of unsent writes persisted
/// as one serialized unit. Insertion order is the replay order.
#[async_trait]
pub trait RequestQueue: Send + Sync {
    /// Appends to the end of the queue.
    async fn enqueue(&self, request: PendingRequest) -> Result<(), AppError>;

    /// Read-only peek of the full queue; removal is the caller's job,
    /// via `replace`, once items have been processed.
    async fn drain(&self) -> Result<Vec<PendingRequest>, AppError>;

    /// Atomically overwrites the persisted queue.
    async fn replace(&self, queue: Vec<PendingRequest>) -> Result<(), AppError>;
}
