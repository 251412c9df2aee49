use crate::shared::error::AppError;
use async_trait::async_trait;

/// Bearer-credential storage. Deliberately trivial: the token's lifecycle
/// (login, refresh, expiry) belongs to the auth collaborator, not here.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get_token(&self) -> Result<Option<String>, AppError>;
    async fn set_token(&self, token: &str) -> Result<(), AppError>;
    async fn clear_token(&self) -> Result<(), AppError>;
}
