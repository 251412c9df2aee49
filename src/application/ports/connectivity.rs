/// Read-side view of the connectivity state machine. The sync engine and
/// the submit path re-check this at call time instead of trusting their
/// caller's view.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}
