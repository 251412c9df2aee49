use crate::domain::value_objects::{GeoPoint, RemoteStoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published story as the remote service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: RemoteStoryId,
    pub author_name: String,
    pub description: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub location: Option<GeoPoint>,
}

/// One page of the paginated story listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPage {
    pub stories: Vec<Story>,
    pub page: u32,
    pub total_pages: u32,
    pub total_story: u64,
}

impl StoryPage {
    /// Derives the page count the way the listing endpoint allows: from the
    /// reported total when present, otherwise by assuming one more page
    /// whenever a full page came back.
    pub fn from_listing(stories: Vec<Story>, page: u32, size: u32, total_story: Option<u64>) -> Self {
        let total_story = total_story.unwrap_or(0);
        let total_pages = match total_story {
            0 if stories.len() as u32 == size => page + 1,
            0 => page.max(1),
            total => ((total + u64::from(size) - 1) / u64::from(size)) as u32,
        };
        Self {
            stories,
            page,
            total_pages: total_pages.max(1),
            total_story,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
