use crate::application::ports::story_api::{LoginSession, StoryApi, StoryListing};
use crate::domain::entities::Story;
use crate::domain::value_objects::{RemoteStoryId, StoryDraft};
use crate::infrastructure::api::dto::{
    story_from_dto, Envelope, LoginBody, LoginResponse, RegisterBody, StoriesResponse,
    StoryDetailResponse,
};
use crate::shared::config::ApiConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl From<ApiClientError> for AppError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::Transport(inner) => AppError::Network(inner.to_string()),
            ApiClientError::Rejected(message) => AppError::RemoteRejected(message),
            ApiClientError::Decode(message) => AppError::DeserializationError(message),
        }
    }
}

/// Reqwest-backed client for the story service. Every call carries the
/// configured timeout so a hung request cannot stall a sync drain.
pub struct HttpStoryApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStoryApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AppError::ConfigurationError(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn multipart_form(draft: &StoryDraft) -> Result<Form, ApiClientError> {
        let photo = draft.photo();
        let part = Part::bytes(photo.bytes().to_vec())
            .file_name(photo.file_name().to_string())
            .mime_str(photo.mime().as_str())?;

        let mut form = Form::new()
            .text("description", draft.description().to_string())
            .part("photo", part);

        if let Some(location) = draft.location() {
            form = form
                .text("lat", location.lat().to_string())
                .text("lon", location.lon().to_string());
        }

        Ok(form)
    }

    fn check_envelope(status: StatusCode, envelope: &Envelope) -> Result<(), ApiClientError> {
        if !status.is_success() || envelope.error {
            let message = if envelope.message.is_empty() {
                format!("Request failed with status {status}")
            } else {
                envelope.message.clone()
            };
            return Err(ApiClientError::Rejected(message));
        }
        Ok(())
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.endpoint("/register"))
            .json(&RegisterBody {
                name,
                email,
                password,
            })
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        let envelope: Envelope = response.json().await.map_err(ApiClientError::Transport)?;
        Self::check_envelope(status, &envelope)?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginSession, AppError> {
        let response = self
            .http
            .post(self.endpoint("/login"))
            .json(&LoginBody { email, password })
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        let body: LoginResponse = response.json().await.map_err(ApiClientError::Transport)?;
        Self::check_envelope(
            status,
            &Envelope {
                error: body.error,
                message: body.message.clone(),
            },
        )?;

        let result = body.login_result.ok_or_else(|| {
            ApiClientError::Decode("Login succeeded without a loginResult".to_string())
        })?;

        Ok(LoginSession {
            user_id: result.user_id,
            name: result.name,
            token: result.token,
        })
    }

    async fn create_story(&self, token: &str, draft: &StoryDraft) -> Result<(), AppError> {
        let form = Self::multipart_form(draft)?;
        let response = self
            .http
            .post(self.endpoint("/stories"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        let envelope: Envelope = response.json().await.map_err(ApiClientError::Transport)?;
        Self::check_envelope(status, &envelope)?;
        Ok(())
    }

    async fn create_guest_story(&self, draft: &StoryDraft) -> Result<(), AppError> {
        let form = Self::multipart_form(draft)?;
        let response = self
            .http
            .post(self.endpoint("/stories/guest"))
            .multipart(form)
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        let envelope: Envelope = response.json().await.map_err(ApiClientError::Transport)?;
        Self::check_envelope(status, &envelope)?;
        Ok(())
    }

    async fn list_stories(
        &self,
        token: &str,
        page: u32,
        size: u32,
    ) -> Result<StoryListing, AppError> {
        let response = self
            .http
            .get(self.endpoint("/stories"))
            .bearer_auth(token)
            .query(&[("page", page), ("size", size), ("location", 1)])
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        let body: StoriesResponse = response.json().await.map_err(ApiClientError::Transport)?;
        Self::check_envelope(
            status,
            &Envelope {
                error: body.error,
                message: body.message.clone(),
            },
        )?;

        let stories = body
            .list_story
            .unwrap_or_default()
            .into_iter()
            .map(story_from_dto)
            .collect::<Result<Vec<Story>, AppError>>()?;

        Ok(StoryListing {
            stories,
            total_story: body.total_story,
        })
    }

    async fn story_detail(&self, token: &str, id: &RemoteStoryId) -> Result<Story, AppError> {
        let response = self
            .http
            .get(self.endpoint(&format!("/stories/{}", id.as_str())))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiClientError::Transport)?;

        let status = response.status();
        let body: StoryDetailResponse =
            response.json().await.map_err(ApiClientError::Transport)?;
        Self::check_envelope(
            status,
            &Envelope {
                error: body.error,
                message: body.message.clone(),
            },
        )?;

        let dto = body.story.ok_or_else(|| {
            ApiClientError::Decode("Detail response carried no story".to_string())
        })?;
        story_from_dto(dto)
    }
}
