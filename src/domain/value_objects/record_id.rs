use serde::{Deserialize, Serialize};
use std::fmt;

/// Locally assigned identifier of a durable story record. Row ids are
/// monotonically increasing and never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Result<Self, String> {
        if value <= 0 {
            return Err(format!("Record id must be positive, got {value}"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
