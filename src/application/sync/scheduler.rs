//! Timers driving the sync cycles.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::engine::{CycleOutcome, SyncEngine};
use crate::domain::entities::CycleKind;

const CYCLES: [CycleKind; 2] = [CycleKind::Posts, CycleKind::Comments];

#[derive(Default)]
struct Timers {
    posts: Option<JoinHandle<()>>,
    comments: Option<JoinHandle<()>>,
}

impl Timers {
    fn slot(&mut self, cycle: CycleKind) -> &mut Option<JoinHandle<()>> {
        match cycle {
            CycleKind::Posts => &mut self.posts,
            CycleKind::Comments => &mut self.comments,
        }
    }
}

/// Owns the post-sync and comment-sync timers.
///
/// Each timer re-reads settings on every tick, so disabling a cycle or
/// changing its interval takes effect from the next tick. Cycles run as their
/// own tasks: stopping a timer never cancels a cycle already in flight.
pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    timers: Mutex<Timers>,
}

impl SyncScheduler {
    /// Creates a scheduler driving `engine`, with no timers running.
    #[must_use]
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            timers: Mutex::new(Timers::default()),
        }
    }

    /// The engine driven by this scheduler.
    #[must_use]
    pub const fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Arms every enabled timer that is not armed yet.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self) {
        let settings = self.engine.current_settings();
        let mut timers = self.timers.lock();

        for cycle in CYCLES {
            let slot = timers.slot(cycle);
            if slot.as_ref().is_some_and(|h| !h.is_finished()) {
                continue;
            }

            match settings.cycle_period(cycle) {
                Some(period) => {
                    info!(%cycle, period_secs = period.as_secs(), "Arming timer");
                    *slot = Some(tokio::spawn(run_timer(self.engine.clone(), cycle, period)));
                }
                None => {
                    debug!(%cycle, "Cycle disabled, timer not armed");
                    *slot = None;
                }
            }
        }
    }

    /// Disarms both timers. In-flight cycles still run to completion.
    pub fn stop(&self) {
        let mut timers = self.timers.lock();
        for cycle in CYCLES {
            if let Some(handle) = timers.slot(cycle).take() {
                handle.abort();
                debug!(%cycle, "Timer stopped");
            }
        }
    }

    /// Tears down both timers and re-arms them from current settings.
    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Runs a post-sync cycle now, independent of the timer.
    pub async fn force_refresh(&self) -> CycleOutcome {
        self.engine.force_refresh().await
    }

    /// Whether the timer of `cycle` is armed.
    #[must_use]
    pub fn is_armed(&self, cycle: CycleKind) -> bool {
        self.timers
            .lock()
            .slot(cycle)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer(engine: Arc<SyncEngine>, cycle: CycleKind, mut period: Duration) {
    loop {
        tokio::time::sleep(period).await;

        let Some(current) = engine.current_settings().cycle_period(cycle) else {
            debug!(%cycle, "Cycle disabled, skipping tick");
            continue;
        };
        period = current;

        let engine = engine.clone();
        tokio::spawn(async move {
            engine.run_cycle(cycle).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::NotificationDispatcher;
    use crate::domain::entities::{Credential, Post, Settings, TrackedEntity};
    use crate::domain::ports::LocalStorePort;
    use crate::domain::ports::mocks::{
        FixedClock, MockContentFetcher, MockNotificationPort, MockWebhookPort,
    };
    use crate::infrastructure::store::InMemoryStore;

    const MINUTE: Duration = Duration::from_secs(60);

    fn setup(settings: Settings) -> (SyncScheduler, Arc<MockContentFetcher>, Arc<InMemoryStore>) {
        let fetcher = Arc::new(MockContentFetcher::new());
        let store = Arc::new(InMemoryStore::new());
        store
            .save_settings(&settings.with_credential(Credential::new("cookie=1")))
            .unwrap();
        store
            .save_tracked_entities(&[TrackedEntity::new("e1", "Creator", "")])
            .unwrap();
        fetcher.set_posts("e1", vec![Post::new("p1", "e1", 0, "hello")]);

        let dispatcher = NotificationDispatcher::new(
            Arc::new(MockNotificationPort::new()),
            Arc::new(MockWebhookPort::new()),
        );
        let engine = Arc::new(SyncEngine::new(
            fetcher.clone(),
            store.clone(),
            dispatcher,
            Arc::new(FixedClock::at(0)),
        ));

        (SyncScheduler::new(engine), fetcher, store)
    }

    fn posts_only(minutes: u64) -> Settings {
        Settings {
            post_polling_interval_minutes: minutes,
            enable_comment_polling: false,
            ..Settings::default()
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_runs_cycle_each_period() {
        let (scheduler, fetcher, _store) = setup(posts_only(1));
        scheduler.start();

        assert!(scheduler.is_armed(CycleKind::Posts));
        assert!(!scheduler.is_armed(CycleKind::Comments));

        settle().await;
        assert_eq!(fetcher.call_count("posts:"), 0);

        tokio::time::sleep(MINUTE + Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(fetcher.call_count("posts:"), 1);

        tokio::time::sleep(MINUTE).await;
        settle().await;
        assert_eq!(fetcher.call_count("posts:"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let (scheduler, fetcher, _store) = setup(posts_only(1));
        scheduler.start();
        scheduler.start();

        tokio::time::sleep(MINUTE + Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(fetcher.call_count("posts:"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_disarms_timers() {
        let (scheduler, fetcher, _store) = setup(posts_only(1));
        scheduler.start();
        scheduler.stop();
        settle().await;

        assert!(!scheduler.is_armed(CycleKind::Posts));
        tokio::time::sleep(MINUTE * 3).await;
        settle().await;
        assert_eq!(fetcher.call_count("posts:"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_reread_on_tick() {
        let (scheduler, fetcher, store) = setup(posts_only(1));
        scheduler.start();

        let mut settings = store.settings().unwrap();
        settings.enable_post_polling = false;
        store.save_settings(&settings).unwrap();

        tokio::time::sleep(MINUTE * 3).await;
        settle().await;
        assert_eq!(fetcher.call_count("posts:"), 0);
        assert!(scheduler.is_armed(CycleKind::Posts));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_applies_new_settings() {
        let (scheduler, _fetcher, store) = setup(posts_only(1));
        scheduler.start();
        assert!(!scheduler.is_armed(CycleKind::Comments));

        let mut settings = store.settings().unwrap();
        settings.enable_comment_polling = true;
        settings.enable_post_polling = false;
        store.save_settings(&settings).unwrap();

        scheduler.restart();
        settle().await;

        assert!(scheduler.is_armed(CycleKind::Comments));
        assert!(!scheduler.is_armed(CycleKind::Posts));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_does_not_cancel_in_flight_cycle() {
        let (scheduler, fetcher, store) = setup(posts_only(1));
        fetcher.hold();
        scheduler.start();

        tokio::time::sleep(MINUTE + Duration::from_secs(1)).await;
        fetcher.entered().await;
        scheduler.stop();

        fetcher.release();
        settle().await;

        assert_eq!(store.cached_posts().unwrap()["e1"].len(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_runs_without_timer() {
        let (scheduler, fetcher, store) = setup(posts_only(0));
        scheduler.start();
        assert!(!scheduler.is_armed(CycleKind::Posts));

        let outcome = scheduler.force_refresh().await;

        assert!(outcome.report().is_some_and(|r| r.persisted));
        assert_eq!(fetcher.call_count("posts:"), 1);
        assert_eq!(store.cached_posts().unwrap()["e1"].len(), 1);
    }
}
