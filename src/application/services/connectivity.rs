use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::notifier::{Notifier, ShowNotification};
use crate::application::services::sync_service::SyncService;
use crate::domain::entities::SyncReport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Online,
    Offline,
}

/// Shared connectivity flag plus its change channel. Services hold this
/// through the `ConnectivityProbe` port so they can re-check the state at
/// call time.
pub struct ConnectivityState {
    online: AtomicBool,
    tx: watch::Sender<ConnectionState>,
}

impl ConnectivityState {
    pub fn new(initially_online: bool) -> Arc<Self> {
        let initial = if initially_online {
            ConnectionState::Online
        } else {
            ConnectionState::Offline
        };
        let (tx, _rx) = watch::channel(initial);
        Arc::new(Self {
            online: AtomicBool::new(initially_online),
            tx,
        })
    }
}

impl ConnectivityProbe for ConnectivityState {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Two-state machine over the host's connectivity signal. The host (or a
/// test) drives it through `set_online`/`set_offline`; each
/// Offline→Online edge fires exactly one sync pass, and the reverse edge
/// emits a user advisory only.
pub struct ConnectivityMonitor {
    state: Arc<ConnectivityState>,
    sync: Arc<SyncService>,
    notifier: Arc<dyn Notifier>,
    auto_sync: bool,
}

impl ConnectivityMonitor {
    pub fn new(
        state: Arc<ConnectivityState>,
        sync: Arc<SyncService>,
        notifier: Arc<dyn Notifier>,
        auto_sync: bool,
    ) -> Self {
        Self {
            state,
            sync,
            notifier,
            auto_sync,
        }
    }

    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.tx.subscribe()
    }

    /// Host signal: connectivity returned. Returns the sync task handle on
    /// a real Offline→Online transition; repeated online signals are
    /// edge-filtered and do nothing.
    pub async fn set_online(&self) -> Option<JoinHandle<SyncReport>> {
        if self.state.online.swap(true, Ordering::SeqCst) {
            return None;
        }
        let _ = self.state.tx.send(ConnectionState::Online);
        info!("Connectivity restored");
        self.notifier
            .notify(ShowNotification::success(
                "Online",
                "You are back online. All features are available.",
            ))
            .await;

        if !self.auto_sync {
            return None;
        }
        let sync = self.sync.clone();
        Some(tokio::spawn(async move { sync.synchronize().await }))
    }

    /// Host signal: connectivity lost. Advisory only; stored data is
    /// untouched.
    pub async fn set_offline(&self) {
        if !self.state.online.swap(false, Ordering::SeqCst) {
            return;
        }
        let _ = self.state.tx.send(ConnectionState::Offline);
        warn!("Connectivity lost");
        self.notifier
            .notify(ShowNotification::warning(
                "Offline",
                "You are offline. Some features may be unavailable.",
            ))
            .await;
    }
}
