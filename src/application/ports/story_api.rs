use crate::domain::entities::Story;
use crate::domain::value_objects::{RemoteStoryId, StoryDraft};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    pub user_id: String,
    pub name: String,
    pub token: String,
}

/// Raw listing as the server reports it; page math happens in the service.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryListing {
    pub stories: Vec<Story>,
    pub total_story: Option<u64>,
}

/// The remote story service.
#[async_trait]
pub trait StoryApi: Send + Sync {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AppError>;

    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AppError>;

    async fn create_story(&self, token: &str, draft: &StoryDraft) -> Result<(), AppError>;

    async fn create_guest_story(&self, draft: &StoryDraft) -> Result<(), AppError>;

    async fn list_stories(
        &self,
        token: &str,
        page: u32,
        size: u32,
    ) -> Result<StoryListing, AppError>;

    async fn story_detail(&self, token: &str, id: &RemoteStoryId) -> Result<Story, AppError>;
}
