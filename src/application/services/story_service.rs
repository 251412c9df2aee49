use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::notifier::{Notifier, ShowNotification};
use crate::application::ports::record_store::RecordStore;
use crate::application::ports::request_queue::RequestQueue;
use crate::application::ports::story_api::{LoginSession, StoryApi};
use crate::application::ports::token_store::TokenStore;
use crate::domain::entities::{PendingRequest, Story, StoryPage, StoryRecordDraft};
use crate::domain::value_objects::{RemoteStoryId, RequestKind, StoryDraft};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{error, info};

/// What happened to a submission: it reached the server, or it was
/// captured for deferred delivery. Queuing while offline is an outcome,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Published,
    Queued,
}

pub struct StoryService {
    api: Arc<dyn StoryApi>,
    tokens: Arc<dyn TokenStore>,
    records: Arc<dyn RecordStore>,
    queue: Arc<dyn RequestQueue>,
    connectivity: Arc<dyn ConnectivityProbe>,
    notifier: Arc<dyn Notifier>,
}

impl StoryService {
    pub fn new(
        api: Arc<dyn StoryApi>,
        tokens: Arc<dyn TokenStore>,
        records: Arc<dyn RecordStore>,
        queue: Arc<dyn RequestQueue>,
        connectivity: Arc<dyn ConnectivityProbe>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            tokens,
            records,
            queue,
            connectivity,
            notifier,
        }
    }

    /// Submits a validated story draft. Online, the write goes straight to
    /// the remote service and rejections surface to the caller. Offline
    /// (or when the transport dies mid-flight), the write is captured into
    /// the durable record store and the pending-request queue for the sync
    /// engine to replay.
    pub async fn submit(
        &self,
        draft: StoryDraft,
        kind: RequestKind,
    ) -> Result<SubmitOutcome, AppError> {
        let token = match kind {
            RequestKind::CreateStory => Some(self.require_token().await?),
            RequestKind::CreateGuestStory => None,
        };

        if !self.connectivity.is_online() {
            return self.capture_offline(kind, draft).await;
        }

        let result = if let Some(token) = token.as_deref() {
            self.api.create_story(token, &draft).await
        } else {
            self.api.create_guest_story(&draft).await
        };

        match result {
            Ok(()) => {
                self.notifier
                    .notify(ShowNotification::success(
                        "Story published",
                        format!("Your story is live: {}", draft.description_preview()),
                    ))
                    .await;
                Ok(SubmitOutcome::Published)
            }
            Err(err) if err.is_connectivity() => self.capture_offline(kind, draft).await,
            Err(err) => {
                self.notifier
                    .notify(ShowNotification::error("Error", err.to_string()))
                    .await;
                Err(err)
            }
        }
    }

    async fn capture_offline(
        &self,
        kind: RequestKind,
        draft: StoryDraft,
    ) -> Result<SubmitOutcome, AppError> {
        let record_id = match self
            .records
            .insert(StoryRecordDraft::pending(kind, &draft))
            .await
        {
            Ok(id) => Some(id),
            Err(err) => {
                // The record is what keeps the photo across a restart; the
                // queue alone can still carry the write.
                error!("Cannot persist the offline record: {err}");
                None
            }
        };

        match self
            .queue
            .enqueue(PendingRequest::new(kind, draft, record_id))
            .await
        {
            Ok(()) => {}
            // The durable record alone is still replayable.
            Err(err) if record_id.is_some() => {
                error!("Cannot enqueue the offline request: {err}");
            }
            Err(err) => {
                self.notifier
                    .notify(ShowNotification::error(
                        "Storage problem",
                        "Your story could not be saved for later. Please try again once online.",
                    ))
                    .await;
                return Err(err);
            }
        }

        info!("Story captured for deferred submission");
        self.notifier
            .notify(ShowNotification::info(
                "Saved offline",
                "Your story will be sent automatically once you are back online.",
            ))
            .await;
        Ok(SubmitOutcome::Queued)
    }

    pub async fn list(&self, page: u32, size: u32) -> Result<StoryPage, AppError> {
        let token = self.require_token().await?;
        let listing = self.api.list_stories(&token, page, size).await?;
        Ok(StoryPage::from_listing(
            listing.stories,
            page,
            size,
            listing.total_story,
        ))
    }

    pub async fn detail(&self, id: &RemoteStoryId) -> Result<Story, AppError> {
        let token = self.require_token().await?;
        self.api.story_detail(&token, id).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        self.api.register(name, email, password).await?;
        self.notifier
            .notify(ShowNotification::success(
                "Registration successful",
                "Your account has been created. Please log in.",
            ))
            .await;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AppError> {
        let session = self.api.login(email, password).await?;
        self.tokens.set_token(&session.token).await?;
        self.notifier
            .notify(ShowNotification::success("Login successful", "Welcome back!"))
            .await;
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.tokens.clear_token().await?;
        self.notifier
            .notify(ShowNotification::info(
                "Logged out",
                "You have signed out of the app.",
            ))
            .await;
        Ok(())
    }

    async fn require_token(&self) -> Result<String, AppError> {
        self.tokens
            .get_token()
            .await?
            .ok_or_else(|| AppError::Unauthorized("Missing authentication".to_string()))
    }
}
