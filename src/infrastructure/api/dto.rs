use crate::domain::entities::Story;
use crate::domain::value_objects::{GeoPoint, RemoteStoryId};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every story-service response carries this envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "loginResult")]
    pub login_result: Option<LoginResultDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResultDto {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoriesResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "listStory")]
    pub list_story: Option<Vec<StoryDto>>,
    #[serde(rename = "totalStory")]
    pub total_story: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryDetailResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    pub story: Option<StoryDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryDto {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub fn story_from_dto(dto: StoryDto) -> Result<Story, AppError> {
    let id = RemoteStoryId::new(dto.id).map_err(AppError::Validation)?;
    let created_at = DateTime::parse_from_rfc3339(&dto.created_at)
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());
    // Listings occasionally carry one bad coordinate pair; a story without
    // a pin is still a story.
    let location = match (dto.lat, dto.lon) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
        _ => None,
    };

    Ok(Story {
        id,
        author_name: dto.name,
        description: dto.description,
        photo_url: dto.photo_url,
        created_at,
        location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_a_listing_entry() {
        let dto = StoryDto {
            id: "story-xyz".to_string(),
            name: "Dina".to_string(),
            description: "lake trip".to_string(),
            photo_url: "https://photos.example/lake.jpg".to_string(),
            created_at: "2024-03-05T06:34:18.598Z".to_string(),
            lat: Some(-2.5),
            lon: Some(118.0),
        };

        let story = story_from_dto(dto).unwrap();
        assert_eq!(story.id.as_str(), "story-xyz");
        assert_eq!(story.location.unwrap().lat(), -2.5);
    }

    #[test]
    fn tolerates_bad_coordinates() {
        let dto = StoryDto {
            id: "story-bad".to_string(),
            name: "Bud".to_string(),
            description: "no pin".to_string(),
            photo_url: "https://photos.example/x.jpg".to_string(),
            created_at: "2024-03-05T06:34:18.598Z".to_string(),
            lat: Some(999.0),
            lon: Some(0.0),
        };

        assert!(story_from_dto(dto).unwrap().location.is_none());
    }
}
