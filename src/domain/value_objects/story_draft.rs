use super::geo::GeoPoint;
use super::photo::Photo;

/// A validated story submission: description, photo, optional location.
/// An instance can only exist once every field has passed validation,
/// so nothing downstream (queue, record store, API client) revalidates.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryDraft {
    description: String,
    photo: Photo,
    location: Option<GeoPoint>,
}

impl StoryDraft {
    pub fn new(
        description: impl Into<String>,
        photo: Photo,
        location: Option<GeoPoint>,
    ) -> Result<Self, String> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err("Description is required".to_string());
        }
        Ok(Self {
            description,
            photo,
            location,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Short form of the description for user-facing notices.
    pub fn description_preview(&self) -> String {
        const PREVIEW_CHARS: usize = 50;
        if self.description.chars().count() <= PREVIEW_CHARS {
            return self.description.clone();
        }
        let mut preview: String = self.description.chars().take(PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    }
}
