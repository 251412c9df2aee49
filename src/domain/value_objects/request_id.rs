use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client-assigned identity of a queued request, stable across replays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_str_value(value: &str) -> Result<Self, String> {
        Uuid::parse_str(value.trim())
            .map(|id| Self(id.to_string()))
            .map_err(|err| format!("Invalid request id: {err}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
