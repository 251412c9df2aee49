use serde::{Deserialize, Serialize};

/// Outcome of one drain-and-replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Stories that reached the server this pass.
    pub sent: u32,
    /// Stories that failed and were retained for a later pass.
    pub failed: u32,
    /// Stories dropped permanently after exhausting their retry budget.
    pub dropped: u32,
    /// Stories still outstanding after the pass (retained + not yet due).
    pub pending: u32,
    /// True when the pass was skipped (offline, or another pass running).
    pub skipped: bool,
}

impl SyncReport {
    pub fn new(sent: u32, failed: u32, dropped: u32, pending: u32) -> Self {
        Self {
            sent,
            failed,
            dropped,
            pending,
            skipped: false,
        }
    }

    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.sent += other.sent;
        self.failed += other.failed;
        self.dropped += other.dropped;
        self.pending = other.pending;
    }
}
