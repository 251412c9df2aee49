use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::notifier::{Notifier, ShowNotification};
use crate::application::ports::record_store::RecordStore;
use crate::application::ports::request_queue::RequestQueue;
use crate::application::ports::story_api::StoryApi;
use crate::application::ports::token_store::TokenStore;
use crate::domain::entities::{PendingRequest, StoryRecord, SyncReport};
use crate::domain::value_objects::{RequestKind, StoryDraft};
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Longest backoff window between replays of a failing item.
const MAX_BACKOFF_SECS: u64 = 3600;

/// Drains the pending-request queue and the record store once
/// connectivity returns, replaying each captured write against the remote
/// service. Failures never escape this engine: a failed item is retained
/// (with its retry counter bumped) or, once its budget is spent, dropped
/// with an advisory.
pub struct SyncService {
    connectivity: Arc<dyn ConnectivityProbe>,
    queue: Arc<dyn RequestQueue>,
    records: Arc<dyn RecordStore>,
    api: Arc<dyn StoryApi>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    config: SyncConfig,
    is_syncing: AtomicBool,
    rerun_requested: AtomicBool,
}

impl SyncService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connectivity: Arc<dyn ConnectivityProbe>,
        queue: Arc<dyn RequestQueue>,
        records: Arc<dyn RecordStore>,
        api: Arc<dyn StoryApi>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        config: SyncConfig,
    ) -> Self {
        Self {
            connectivity,
            queue,
            records,
            api,
            tokens,
            notifier,
            config,
            is_syncing: AtomicBool::new(false),
            rerun_requested: AtomicBool::new(false),
        }
    }

    /// One drain-and-replay pass. Re-checks connectivity at call time and
    /// refuses to overlap itself: a call arriving while a pass is in
    /// flight is coalesced into a single follow-up pass.
    pub async fn synchronize(&self) -> SyncReport {
        if !self.connectivity.is_online() {
            return SyncReport::skipped();
        }
        if self.is_syncing.swap(true, Ordering::SeqCst) {
            self.rerun_requested.store(true, Ordering::SeqCst);
            return SyncReport::skipped();
        }

        let mut report = self.run_pass().await;
        while self.rerun_requested.swap(false, Ordering::SeqCst) {
            if !self.connectivity.is_online() {
                break;
            }
            let follow_up = self.run_pass().await;
            report.merge(follow_up);
        }
        self.is_syncing.store(false, Ordering::SeqCst);
        report
    }

    async fn run_pass(&self) -> SyncReport {
        let queue = match self.queue.drain().await {
            Ok(queue) => queue,
            Err(err) => {
                error!("Cannot read the pending-request queue: {err}");
                return SyncReport::default();
            }
        };
        let pending = match self.records.list_pending().await {
            Ok(pending) => pending,
            Err(err) => {
                error!("Cannot read pending records: {err}");
                Vec::new()
            }
        };
        if queue.is_empty() && pending.is_empty() {
            return SyncReport::default();
        }

        info!(
            queued = queue.len(),
            records = pending.len(),
            "Starting offline sync pass"
        );

        let now = Utc::now();
        // Records referenced by a queue item are replayed through the
        // queue only; this is what keeps a story captured in both stores
        // from being submitted twice.
        let referenced: HashSet<i64> = queue
            .iter()
            .filter_map(|item| item.record_id.map(|id| id.value()))
            .collect();

        let mut carry = Vec::new();
        let mut completed = Vec::new();
        let mut retained_records = 0u32;
        let mut sent = 0u32;
        let mut failed = 0u32;
        let mut dropped = 0u32;

        for mut item in queue {
            if !retry_due(
                item.attempts,
                item.last_attempt_at,
                now,
                self.config.retry_backoff_secs,
            ) {
                carry.push(item);
                continue;
            }
            match self.replay(item.kind, &item.draft).await {
                Ok(()) => {
                    sent += 1;
                    if let Some(id) = item.record_id {
                        completed.push(id);
                    }
                }
                Err(err) => {
                    warn!("Replay failed for request {}: {err}", item.request_id);
                    item.mark_attempt(now);
                    if item.attempts >= self.config.max_retries {
                        dropped += 1;
                        if let Some(id) = item.record_id {
                            completed.push(id);
                        }
                        self.notify_dropped(&item.draft, item.attempts).await;
                    } else {
                        failed += 1;
                        carry.push(item);
                    }
                }
            }
        }

        for record in pending {
            if referenced.contains(&record.id.value()) {
                continue;
            }
            if !retry_due(
                record.retry_count,
                record.last_attempt_at,
                now,
                self.config.retry_backoff_secs,
            ) {
                retained_records += 1;
                continue;
            }
            let Some((kind, draft)) = replayable(&record) else {
                warn!(
                    "Record {} has no replayable payload; dropping it",
                    record.id
                );
                dropped += 1;
                completed.push(record.id);
                continue;
            };
            match self.replay(kind, &draft).await {
                Ok(()) => {
                    sent += 1;
                    completed.push(record.id);
                }
                Err(err) => {
                    warn!("Replay failed for record {}: {err}", record.id);
                    if record.retry_count + 1 >= self.config.max_retries {
                        dropped += 1;
                        completed.push(record.id);
                        self.notify_dropped(&draft, record.retry_count + 1).await;
                    } else {
                        failed += 1;
                        retained_records += 1;
                        if let Err(err) = self.records.mark_attempt(record.id).await {
                            error!("Cannot record the failed attempt: {err}");
                        }
                    }
                }
            }
        }

        let pending_after = carry.len() as u32 + retained_records;
        if let Err(err) = self.queue.replace(carry).await {
            error!("Cannot persist the reduced queue: {err}");
        }
        for id in completed {
            if let Err(err) = self.records.remove(id).await {
                error!("Cannot delete completed record {id}: {err}");
            }
        }

        if sent > 0 {
            // One aggregate notice per pass, never one per story.
            let body = if sent == 1 {
                "1 story saved offline has reached the server".to_string()
            } else {
                format!("{sent} stories saved offline have reached the server")
            };
            self.notifier
                .notify(ShowNotification::success("Stories sent", body))
                .await;
        }

        info!(sent, failed, dropped, pending = pending_after, "Sync pass finished");
        SyncReport::new(sent, failed, dropped, pending_after)
    }

    async fn replay(&self, kind: RequestKind, draft: &StoryDraft) -> Result<(), AppError> {
        match kind {
            RequestKind::CreateStory => {
                let token = self.tokens.get_token().await?.ok_or_else(|| {
                    AppError::Unauthorized("Missing authentication".to_string())
                })?;
                self.api.create_story(&token, draft).await
            }
            RequestKind::CreateGuestStory => self.api.create_guest_story(draft).await,
        }
    }

    async fn notify_dropped(&self, draft: &StoryDraft, attempts: u32) {
        self.notifier
            .notify(ShowNotification::error(
                "Story could not be sent",
                format!(
                    "\"{}\" was dropped after {attempts} failed attempts",
                    draft.description_preview()
                ),
            ))
            .await;
    }
}

fn replayable(record: &StoryRecord) -> Option<(RequestKind, StoryDraft)> {
    Some((record.request_kind?, record.to_draft()?))
}

fn retry_due(
    attempts: u32,
    last_attempt: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    base_secs: u64,
) -> bool {
    if attempts == 0 {
        return true;
    }
    let Some(last) = last_attempt else {
        return true;
    };
    let exponent = attempts.saturating_sub(1).min(6);
    let wait = base_secs.saturating_mul(1 << exponent).min(MAX_BACKOFF_SECS);
    now.signed_duration_since(last).num_seconds() >= wait as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::notifier::NoticeKind;
    use crate::application::ports::story_api::{LoginSession, StoryListing};
    use crate::domain::entities::{Story, StoryRecordDraft};
    use crate::domain::value_objects::{GeoPoint, Photo, RemoteStoryId};
    use crate::infrastructure::database::ConnectionPool;
    use crate::infrastructure::offline::SqliteRecordStore;
    use crate::infrastructure::queue::{KvRequestQueue, KvStore, KvTokenStore};
    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::Mutex;

    struct StaticProbe(AtomicBool);

    impl ConnectivityProbe for StaticProbe {
        fn is_online(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<ShowNotification>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notification: ShowNotification) {
            self.notices.lock().await.push(notification);
        }
    }

    /// Story API double: deliveries are recorded; descriptions listed in
    /// `reject` fail with a server rejection; `delay_ms` slows each call.
    #[derive(Default)]
    struct ScriptedApi {
        reject: Mutex<HashSet<String>>,
        sent: Mutex<Vec<String>>,
        delay_ms: u64,
    }

    impl ScriptedApi {
        async fn deliver(&self, draft: &StoryDraft) -> Result<(), AppError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            if self.reject.lock().await.contains(draft.description()) {
                return Err(AppError::RemoteRejected("story was rejected".to_string()));
            }
            self.sent.lock().await.push(draft.description().to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl StoryApi for ScriptedApi {
        async fn register(&self, _: &str, _: &str, _: &str) -> Result<(), AppError> {
            unimplemented!("not used by sync tests")
        }

        async fn login(&self, _: &str, _: &str) -> Result<LoginSession, AppError> {
            unimplemented!("not used by sync tests")
        }

        async fn create_story(&self, _token: &str, draft: &StoryDraft) -> Result<(), AppError> {
            self.deliver(draft).await
        }

        async fn create_guest_story(&self, draft: &StoryDraft) -> Result<(), AppError> {
            self.deliver(draft).await
        }

        async fn list_stories(&self, _: &str, _: u32, _: u32) -> Result<StoryListing, AppError> {
            unimplemented!("not used by sync tests")
        }

        async fn story_detail(&self, _: &str, _: &RemoteStoryId) -> Result<Story, AppError> {
            unimplemented!("not used by sync tests")
        }
    }

    struct Harness {
        sync: Arc<SyncService>,
        queue: Arc<KvRequestQueue>,
        records: Arc<SqliteRecordStore>,
        api: Arc<ScriptedApi>,
        notifier: Arc<RecordingNotifier>,
        probe: Arc<StaticProbe>,
    }

    async fn setup(api: ScriptedApi, config: SyncConfig) -> Harness {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        let kv = KvStore::new(pool.get_pool().clone());
        let queue = Arc::new(KvRequestQueue::new(kv.clone()));
        let records = Arc::new(SqliteRecordStore::new(pool.get_pool().clone()));
        let tokens = Arc::new(KvTokenStore::new(kv));
        tokens.set_token("bearer-test").await.unwrap();
        let api = Arc::new(api);
        let notifier = Arc::new(RecordingNotifier::default());
        let probe = Arc::new(StaticProbe(AtomicBool::new(true)));

        let sync = Arc::new(SyncService::new(
            probe.clone(),
            queue.clone(),
            records.clone(),
            api.clone(),
            tokens,
            notifier.clone(),
            config,
        ));

        Harness {
            sync,
            queue,
            records,
            api,
            notifier,
            probe,
        }
    }

    fn fast_config() -> SyncConfig {
        SyncConfig {
            auto_sync: true,
            max_retries: 3,
            retry_backoff_secs: 0,
        }
    }

    fn draft(description: &str) -> StoryDraft {
        let photo =
            Photo::from_mime_str("image/jpeg", Bytes::from(vec![9u8; 4096]), None).unwrap();
        StoryDraft::new(description, photo, Some(GeoPoint::new(-2.5, 118.0).unwrap())).unwrap()
    }

    async fn enqueue(harness: &Harness, description: &str) {
        harness
            .queue
            .enqueue(PendingRequest::new(
                RequestKind::CreateStory,
                draft(description),
                None,
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fifo_replay_keeps_only_the_failures() {
        let api = ScriptedApi::default();
        api.reject.lock().await.insert("B".to_string());
        let harness = setup(api, fast_config()).await;

        enqueue(&harness, "A").await;
        enqueue(&harness, "B").await;
        enqueue(&harness, "C").await;

        let report = harness.sync.synchronize().await;
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);

        let remaining = harness.queue.drain().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].draft.description(), "B");
        assert_eq!(remaining[0].attempts, 1);

        // FIFO: A went out before C.
        assert_eq!(*harness.api.sent.lock().await, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn a_story_in_both_stores_is_sent_exactly_once() {
        let harness = setup(ScriptedApi::default(), fast_config()).await;

        let story = draft("captured offline");
        let record_id = harness
            .records
            .insert(StoryRecordDraft::pending(RequestKind::CreateStory, &story))
            .await
            .unwrap();
        harness
            .queue
            .enqueue(PendingRequest::new(
                RequestKind::CreateStory,
                story,
                Some(record_id),
            ))
            .await
            .unwrap();

        let report = harness.sync.synchronize().await;
        assert_eq!(report.sent, 1);
        assert_eq!(harness.api.sent.lock().await.len(), 1);

        // Both stores end the pass empty.
        assert!(harness.queue.drain().await.unwrap().is_empty());
        assert!(harness.records.get_by_id(record_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreferenced_records_are_replayed_from_the_store() {
        let harness = setup(ScriptedApi::default(), fast_config()).await;

        // The queue blob was lost; only the durable record survives.
        let record_id = harness
            .records
            .insert(StoryRecordDraft::pending(
                RequestKind::CreateGuestStory,
                &draft("survived a reload"),
            ))
            .await
            .unwrap();

        let report = harness.sync.synchronize().await;
        assert_eq!(report.sent, 1);
        assert!(harness.records.get_by_id(record_id).await.unwrap().is_none());
        assert_eq!(*harness.api.sent.lock().await, vec!["survived a reload"]);
    }

    #[tokio::test]
    async fn offline_pass_is_a_no_op() {
        let harness = setup(ScriptedApi::default(), fast_config()).await;
        harness.probe.0.store(false, Ordering::SeqCst);
        enqueue(&harness, "stuck").await;

        let report = harness.sync.synchronize().await;
        assert!(report.skipped);
        assert_eq!(harness.queue.drain().await.unwrap().len(), 1);
        assert!(harness.api.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn overlapping_passes_are_coalesced() {
        let api = ScriptedApi {
            delay_ms: 200,
            ..ScriptedApi::default()
        };
        let harness = setup(api, fast_config()).await;
        enqueue(&harness, "slow story").await;

        let first = {
            let sync = harness.sync.clone();
            tokio::spawn(async move { sync.synchronize().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = {
            let sync = harness.sync.clone();
            tokio::spawn(async move { sync.synchronize().await })
        };

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        // Exactly one pass ran; the other reported itself skipped.
        assert!(first.skipped ^ second.skipped);
        assert_eq!(harness.api.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn items_are_dropped_after_the_retry_budget() {
        let api = ScriptedApi::default();
        api.reject.lock().await.insert("doomed".to_string());
        let config = SyncConfig {
            auto_sync: true,
            max_retries: 2,
            retry_backoff_secs: 0,
        };
        let harness = setup(api, config).await;
        enqueue(&harness, "doomed").await;

        let first = harness.sync.synchronize().await;
        assert_eq!(first.failed, 1);

        let second = harness.sync.synchronize().await;
        assert_eq!(second.dropped, 1);
        assert!(harness.queue.drain().await.unwrap().is_empty());

        let notices = harness.notifier.notices.lock().await;
        assert!(notices
            .iter()
            .any(|notice| notice.kind == NoticeKind::Error && notice.body.contains("doomed")));
    }

    #[tokio::test]
    async fn backoff_window_defers_a_recent_failure() {
        let api = ScriptedApi::default();
        api.reject.lock().await.insert("flaky".to_string());
        let config = SyncConfig {
            auto_sync: true,
            max_retries: 5,
            retry_backoff_secs: 3600,
        };
        let harness = setup(api, config).await;
        enqueue(&harness, "flaky").await;

        // First pass fails the item and stamps the attempt.
        harness.sync.synchronize().await;
        // Second pass: the item is inside its backoff window, so the API
        // is not called again.
        let report = harness.sync.synchronize().await;
        assert_eq!(report.sent, 0);
        assert_eq!(report.pending, 1);
        assert!(harness.api.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn one_aggregate_notice_per_pass() {
        let harness = setup(ScriptedApi::default(), fast_config()).await;
        enqueue(&harness, "one").await;
        enqueue(&harness, "two").await;
        enqueue(&harness, "three").await;

        harness.sync.synchronize().await;

        let notices = harness.notifier.notices.lock().await;
        let successes: Vec<_> = notices
            .iter()
            .filter(|notice| notice.kind == NoticeKind::Success)
            .collect();
        assert_eq!(successes.len(), 1);
        assert!(successes[0].body.contains("3 stories"));
    }
}
