use crate::application::ports::notifier::{Notifier, ShowNotification};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

/// Message-passing notification boundary: the core publishes
/// `ShowNotification` messages; whichever shell context is attached
/// subscribes and renders them. No subscriber is a valid state — the
/// message is simply dropped.
pub struct ChannelNotifier {
    tx: broadcast::Sender<ShowNotification>,
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShowNotification> {
        self.tx.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new(32)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, notification: ShowNotification) {
        if self.tx.send(notification.clone()).is_err() {
            debug!(
                "No notification subscriber; dropped '{}'",
                notification.title
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::notifier::NoticeKind;

    #[tokio::test]
    async fn subscribers_receive_published_notices() {
        let notifier = ChannelNotifier::new(8);
        let mut rx = notifier.subscribe();

        notifier
            .notify(ShowNotification::success("Online", "All features available"))
            .await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NoticeKind::Success);
        assert_eq!(received.title, "Online");
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_harmless() {
        let notifier = ChannelNotifier::new(8);
        notifier
            .notify(ShowNotification::info("Offline", "Saved for later"))
            .await;
    }
}
