use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The kind of write a queued request replays: an authenticated story or
/// a guest story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    CreateStory,
    CreateGuestStory,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::CreateStory => "create_story",
            RequestKind::CreateGuestStory => "create_guest_story",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, RequestKind::CreateStory)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_story" => Ok(RequestKind::CreateStory),
            "create_guest_story" => Ok(RequestKind::CreateGuestStory),
            other => Err(format!("Unknown request kind: {other}")),
        }
    }
}
