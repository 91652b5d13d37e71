//! Post and comment sync cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info, instrument, warn};

use super::merge;
use crate::application::services::{NotificationDispatcher, ReadTracker, SubscriberRegistry};
use crate::domain::entities::{
    Comment, Credential, CycleKind, Post, PostId, PostMap, Settings, ThreadLocator,
    TrackedEntity,
};
use crate::domain::errors::FetchError;
use crate::domain::ports::{ClockPort, ContentFetcherPort, LocalStorePort, ReplyPage};
use crate::domain::Delta;

/// Why a cycle did no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The same cycle is already in flight.
    Busy,
    /// No credential is configured.
    MissingCredential,
    /// Settings or cached data could not be loaded.
    StoreUnavailable,
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycle that ran.
    pub cycle: CycleKind,
    /// New content detected, in detection order.
    pub deltas: Vec<Delta>,
    /// Whether the merged data differed from the cache.
    pub changed: bool,
    /// Whether the change was written to the store.
    pub persisted: bool,
    /// Fetches that failed and were skipped.
    pub failures: usize,
    /// Whether a failure needs user action, such as a rejected credential.
    pub needs_attention: bool,
}

impl CycleReport {
    fn new(cycle: CycleKind) -> Self {
        Self {
            cycle,
            deltas: Vec::new(),
            changed: false,
            persisted: false,
            failures: 0,
            needs_attention: false,
        }
    }

    fn record_failure(&mut self, error: &FetchError) {
        self.failures += 1;
        if !error.is_recoverable() {
            self.needs_attention = true;
        }
    }

    /// Whether a change was detected but could not be written.
    const fn unsaved(&self) -> bool {
        self.changed && !self.persisted
    }
}

/// Result of invoking a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The invocation was dropped.
    Skipped(SkipReason),
    /// The cycle ran to completion.
    Completed(CycleReport),
}

impl CycleOutcome {
    /// Report of a completed cycle.
    #[must_use]
    pub const fn report(&self) -> Option<&CycleReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }

    /// Skip reason of a dropped invocation.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped(reason) => Some(*reason),
            Self::Completed(_) => None,
        }
    }
}

/// Holds a cycle's busy flag for the lifetime of the guard.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct FetchedThread<'a> {
    entity: &'a TrackedEntity,
    post_id: PostId,
    comments: Vec<Comment>,
}

/// Fetches, merges and persists upstream content, then notifies.
///
/// Each cycle kind runs at most once at a time; a second invocation while one
/// is in flight is dropped. The two kinds may overlap. Fetches are awaited one
/// after another; the cache is then read, merged and written under the cache
/// lock shared with [`ReadTracker`], never across an await, so overlapping
/// cycles never overwrite each other's results.
pub struct SyncEngine {
    fetcher: Arc<dyn ContentFetcherPort>,
    store: Arc<dyn LocalStorePort>,
    read_tracker: ReadTracker,
    dispatcher: NotificationDispatcher,
    subscribers: SubscriberRegistry,
    clock: Arc<dyn ClockPort>,
    post_sync_busy: AtomicBool,
    comment_sync_busy: AtomicBool,
}

impl SyncEngine {
    /// Creates an engine over injected collaborators.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn ContentFetcherPort>,
        store: Arc<dyn LocalStorePort>,
        dispatcher: NotificationDispatcher,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            fetcher,
            read_tracker: ReadTracker::new(store.clone()),
            store,
            dispatcher,
            subscribers: SubscriberRegistry::default(),
            clock,
            post_sync_busy: AtomicBool::new(false),
            comment_sync_busy: AtomicBool::new(false),
        }
    }

    /// Registry notified after every persisted change.
    #[must_use]
    pub const fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    /// Read marker access.
    #[must_use]
    pub const fn read_tracker(&self) -> &ReadTracker {
        &self.read_tracker
    }

    /// Current settings, or defaults when they cannot be loaded.
    #[must_use]
    pub fn current_settings(&self) -> Settings {
        self.store.settings().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load settings, using defaults");
            Settings::default()
        })
    }

    /// Whether a cycle of `cycle` kind is in flight.
    #[must_use]
    pub fn is_running(&self, cycle: CycleKind) -> bool {
        self.busy_flag(cycle).load(Ordering::Acquire)
    }

    /// Runs one cycle of the given kind.
    pub async fn run_cycle(&self, cycle: CycleKind) -> CycleOutcome {
        match cycle {
            CycleKind::Posts => self.run_post_sync().await,
            CycleKind::Comments => self.run_comment_sync().await,
        }
    }

    /// Pulls the latest posts of every tracked entity and merges them.
    #[instrument(skip_all, name = "post_sync")]
    pub async fn run_post_sync(&self) -> CycleOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.post_sync_busy) else {
            debug!("Post sync already running, dropping invocation");
            return CycleOutcome::Skipped(SkipReason::Busy);
        };

        let (settings, credential, entities) = match self.prepare() {
            Ok(prepared) => prepared,
            Err(reason) => return CycleOutcome::Skipped(reason),
        };

        let mut report = CycleReport::new(CycleKind::Posts);
        let mut fetched = Vec::with_capacity(entities.len());

        for entity in &entities {
            match self.fetcher.fetch_posts(&entity.id, &credential).await {
                Ok(posts) if posts.is_empty() => {
                    debug!(entity_id = %entity.id, "Empty post list, keeping cache");
                }
                Ok(posts) => fetched.push((entity, posts)),
                Err(e) => {
                    report.record_failure(&e);
                    if e.is_recoverable() {
                        warn!(entity_id = %entity.id, name = %entity.display_name, error = %e, "Failed to fetch posts");
                    } else {
                        error!(entity_id = %entity.id, name = %entity.display_name, error = %e, "Failed to fetch posts, user action required");
                    }
                }
            }
        }

        if let Err(reason) = self.apply_fetched_posts(fetched, &mut report) {
            return CycleOutcome::Skipped(reason);
        }
        if report.unsaved() {
            return CycleOutcome::Completed(report);
        }

        self.finish(&settings, &report);
        CycleOutcome::Completed(report)
    }

    /// Same as [`Self::run_post_sync`], outside the timer.
    pub async fn force_refresh(&self) -> CycleOutcome {
        info!("Forced post refresh");
        self.run_post_sync().await
    }

    /// Pulls comment threads of recent cached posts and merges them.
    #[instrument(skip_all, name = "comment_sync")]
    pub async fn run_comment_sync(&self) -> CycleOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.comment_sync_busy) else {
            debug!("Comment sync already running, dropping invocation");
            return CycleOutcome::Skipped(SkipReason::Busy);
        };

        let (settings, credential, entities) = match self.prepare() {
            Ok(prepared) => prepared,
            Err(reason) => return CycleOutcome::Skipped(reason),
        };

        let snapshot = match self.store.cached_posts() {
            Ok(posts) => posts,
            Err(e) => {
                error!(error = %e, "Failed to load cached posts");
                return CycleOutcome::Skipped(SkipReason::StoreUnavailable);
            }
        };

        let mut report = CycleReport::new(CycleKind::Comments);
        let now = self.clock.now_secs();
        let window = settings.comment_window_secs();
        let mut fetched = Vec::new();

        for entity in &entities {
            let Some(posts) = snapshot.get(&entity.id) else {
                continue;
            };

            for post in posts {
                if now.saturating_sub(post.timestamp) > window {
                    continue;
                }

                match self.fetcher.fetch_comments(&post.thread, &credential).await {
                    Ok(mut comments) => {
                        self.backfill_replies(&post.thread, &mut comments, &credential)
                            .await;
                        fetched.push(FetchedThread {
                            entity,
                            post_id: post.id.clone(),
                            comments,
                        });
                    }
                    Err(e) => {
                        report.record_failure(&e);
                        if e.is_recoverable() {
                            warn!(post_id = %post.id, error = %e, "Failed to fetch comments");
                        } else {
                            error!(post_id = %post.id, error = %e, "Failed to fetch comments, user action required");
                        }
                    }
                }
            }
        }

        if let Err(reason) = self.apply_fetched_threads(fetched, &mut report) {
            return CycleOutcome::Skipped(reason);
        }
        if report.unsaved() {
            return CycleOutcome::Completed(report);
        }

        self.finish(&settings, &report);
        CycleOutcome::Completed(report)
    }

    /// Merges fetched post lists into the cache and saves it.
    fn apply_fetched_posts(
        &self,
        fetched: Vec<(&TrackedEntity, Vec<Post>)>,
        report: &mut CycleReport,
    ) -> Result<(), SkipReason> {
        let _cache = self.read_tracker.cache_lock().lock();
        let (mut cache, markers) = match (self.store.cached_posts(), self.read_tracker.snapshot()) {
            (Ok(cache), Ok(markers)) => (cache, markers),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Failed to load cached state, discarding fetched posts");
                return Err(SkipReason::StoreUnavailable);
            }
        };

        for (entity, posts) in fetched {
            let cached = cache.get(&entity.id).map(Vec::as_slice).unwrap_or_default();

            if let Some(head) = merge::new_head(cached, &posts) {
                report.deltas.push(Delta::new_post(entity, head));
            }

            let merged = merge::merge_posts(cached, posts, &markers);
            if merged.as_slice() != cached {
                debug!(entity_id = %entity.id, count = merged.len(), "Post list changed");
                cache.insert(entity.id.clone(), merged);
                report.changed = true;
            }
        }

        self.save_if_changed(&cache, report);
        Ok(())
    }

    /// Writes fetched comment trees onto their cached posts and saves them.
    fn apply_fetched_threads(
        &self,
        fetched: Vec<FetchedThread<'_>>,
        report: &mut CycleReport,
    ) -> Result<(), SkipReason> {
        let _cache = self.read_tracker.cache_lock().lock();
        let (mut cache, markers) = match (self.store.cached_posts(), self.read_tracker.snapshot()) {
            (Ok(cache), Ok(markers)) => (cache, markers),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "Failed to load cached state, discarding fetched comments");
                return Err(SkipReason::StoreUnavailable);
            }
        };

        for FetchedThread {
            entity,
            post_id,
            mut comments,
        } in fetched
        {
            let Some(post) = cache
                .get_mut(&entity.id)
                .and_then(|posts| posts.iter_mut().find(|p| p.id == post_id))
            else {
                debug!(post_id = %post_id, "Post left the cache during the cycle");
                continue;
            };

            let previous = post.comments.as_deref().unwrap_or_default();
            merge::propagate_read_state(&mut comments, previous, &markers);

            for (comment, depth) in merge::new_self_comments(entity, previous, &comments) {
                report
                    .deltas
                    .push(Delta::new_comment(entity, post, comment, depth));
            }

            if post.comments.as_ref() != Some(&comments) {
                post.comments = Some(comments);
                report.changed = true;
            }
        }

        self.save_if_changed(&cache, report);
        Ok(())
    }

    fn save_if_changed(&self, cache: &PostMap, report: &mut CycleReport) {
        if !report.changed {
            return;
        }
        match self.store.save_cached_posts(cache) {
            Ok(()) => report.persisted = true,
            Err(e) => error!(error = %e, cycle = %report.cycle, "Failed to persist cache"),
        }
    }

    fn busy_flag(&self, cycle: CycleKind) -> &AtomicBool {
        match cycle {
            CycleKind::Posts => &self.post_sync_busy,
            CycleKind::Comments => &self.comment_sync_busy,
        }
    }

    fn prepare(&self) -> Result<(Settings, Credential, Vec<TrackedEntity>), SkipReason> {
        let settings = self.store.settings().map_err(|e| {
            error!(error = %e, "Failed to load settings");
            SkipReason::StoreUnavailable
        })?;

        let Some(credential) = settings.credential.clone() else {
            debug!("No credential configured, skipping cycle");
            return Err(SkipReason::MissingCredential);
        };

        let entities = self.store.tracked_entities().map_err(|e| {
            error!(error = %e, "Failed to load tracked entities");
            SkipReason::StoreUnavailable
        })?;

        Ok((settings, credential, entities))
    }

    async fn backfill_replies(
        &self,
        thread: &ThreadLocator,
        comments: &mut [Comment],
        credential: &Credential,
    ) {
        for comment in comments.iter_mut().filter(|c| c.needs_backfill()) {
            let root = comment.reply_root().to_string();
            match self
                .fetcher
                .fetch_replies(thread, &root, credential, ReplyPage::first())
                .await
            {
                Ok(replies) if replies.is_empty() => {}
                Ok(replies) => comment.replies = Some(merge::dedup_by_id(replies)),
                Err(e) => warn!(root_id = %root, error = %e, "Failed to backfill replies"),
            }
        }
    }

    fn finish(&self, settings: &Settings, report: &CycleReport) {
        for delta in &report.deltas {
            info!(kind = %delta.kind, entity = %delta.entity_name, item_id = %delta.item_id, "New content");
            self.dispatcher.notify(&settings.notifications, delta);
        }

        if report.persisted {
            self.subscribers.publish(report.cycle);
        }

        info!(
            cycle = %report.cycle,
            changed = report.changed,
            deltas = report.deltas.len(),
            failures = report.failures,
            needs_attention = report.needs_attention,
            "Cycle finished"
        );
    }
}
