use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The role a durable record plays: a story awaiting upload, or a
/// published story archived for offline viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    PendingSubmission,
    Archived,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::PendingSubmission => "pending_submission",
            RecordType::Archived => "archived",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_submission" => Ok(RecordType::PendingSubmission),
            "archived" => Ok(RecordType::Archived),
            other => Err(format!("Unknown record type: {other}")),
        }
    }
}
