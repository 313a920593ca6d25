//! Holder count poller
//!
//! `start` runs an immediate fetch and then one fetch cycle per interval until
//! the returned [`PollHandle`] is stopped or dropped. Each cycle is a bounded
//! retry sequence:
//!
//! ```text
//! Idle -> Fetching -> Success -> Idle
//!                  -> Failure -> retry_count < max ? Fetching (after delay) : Idle
//! ```
//!
//! `retry_count` is reset to 0 when a cycle begins and on every success.
//! Fetch failures are logged and never surfaced to the caller.
//!
//! All state writes go through the handle's watch channel and are skipped once
//! `is_active` is false, so nothing mutates the state after `stop()` returns.

use super::{HolderFetchError, HolderSource};
use crate::config::PollerConfig;
use crate::metrics::metrics;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Default refresh interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default delay between retries within a cycle
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Default number of retries after a failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Last known holder count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HolderCount {
    /// No successful fetch yet
    #[default]
    Unknown,
    Known(u64),
}

impl HolderCount {
    pub fn value(&self) -> Option<u64> {
        match self {
            HolderCount::Unknown => None,
            HolderCount::Known(count) => Some(*count),
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the configured delay
    Retry { attempt: u32 },
    /// Retries exhausted; wait for the next cycle
    GiveUp,
}

/// Poller state exposed read-only to views
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollState {
    pub holder_count: HolderCount,
    pub retry_count: u32,
    /// True while a fetch attempt, including scheduled retries, is outstanding
    pub is_loading: bool,
    /// True until the owning handle is stopped
    pub is_active: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl PollState {
    /// State of a freshly started poller, which fetches immediately
    pub fn started() -> Self {
        Self {
            holder_count: HolderCount::Unknown,
            retry_count: 0,
            is_loading: true,
            is_active: true,
            last_updated: None,
        }
    }

    /// Begin a fresh bounded-retry sequence
    pub fn begin_cycle(&mut self) {
        self.retry_count = 0;
        self.is_loading = true;
    }

    pub fn record_success(&mut self, count: u64) {
        self.holder_count = HolderCount::Known(count);
        self.retry_count = 0;
        self.is_loading = false;
        self.last_updated = Some(Utc::now());
    }

    /// Leaves `holder_count` untouched
    pub fn record_failure(&mut self, max_retries: u32) -> RetryDecision {
        if self.retry_count < max_retries {
            self.retry_count += 1;
            RetryDecision::Retry {
                attempt: self.retry_count,
            }
        } else {
            self.is_loading = false;
            RetryDecision::GiveUp
        }
    }

    fn deactivate(&mut self) {
        self.is_active = false;
        self.is_loading = false;
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::started()
    }
}

/// Poll cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    pub interval: Duration,
    pub retry_delay: Duration,
    pub max_retries: u32,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl From<&PollerConfig> for PollerSettings {
    fn from(config: &PollerConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            max_retries: config.max_retries,
        }
    }
}

/// Issues periodic holder count queries through a [`HolderSource`]
#[derive(Clone)]
pub struct HolderCountPoller {
    source: Arc<dyn HolderSource>,
    settings: PollerSettings,
}

impl HolderCountPoller {
    pub fn new(source: Arc<dyn HolderSource>, settings: PollerSettings) -> Self {
        Self { source, settings }
    }

    /// Start polling `mint`. Must be called from within a tokio runtime.
    pub fn start(&self, mint: Pubkey) -> PollHandle {
        let (state_tx, state_rx) = watch::channel(PollState::started());
        let state_tx = Arc::new(state_tx);

        info!(
            mint = %mint,
            interval_secs = self.settings.interval.as_secs(),
            max_retries = self.settings.max_retries,
            "Starting holder count poller"
        );

        let task = tokio::spawn(run_poll_loop(
            Arc::clone(&self.source),
            mint,
            self.settings,
            Arc::clone(&state_tx),
        ));

        PollHandle {
            mint,
            state_tx,
            state_rx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Stop a running poller. Idempotent.
    pub fn stop(&self, handle: &PollHandle) {
        handle.stop();
    }
}

/// Owned handle to a running poller
///
/// Stopping is idempotent and also happens on drop. After `stop()` returns no
/// scheduled refresh or in-flight retry can modify the state.
pub struct PollHandle {
    mint: Pubkey,
    state_tx: Arc<watch::Sender<PollState>>,
    state_rx: watch::Receiver<PollState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PollHandle {
    pub fn stop(&self) {
        let was_active = self.state_tx.send_if_modified(|state| {
            if !state.is_active {
                return false;
            }
            state.deactivate();
            true
        });

        if let Some(task) = self.task.lock().take() {
            task.abort();
        }

        if was_active {
            info!(mint = %self.mint, "Holder count poller stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.state_rx.borrow().is_active
    }

    /// Current state
    pub fn snapshot(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("mint", &self.mint)
            .field("state", &*self.state_rx.borrow())
            .finish()
    }
}

/// Apply `f` unless the poller has been stopped. Returns whether it was applied.
fn update_state<R>(
    state: &watch::Sender<PollState>,
    f: impl FnOnce(&mut PollState) -> R,
) -> Option<R> {
    let mut result = None;
    state.send_if_modified(|s| {
        if !s.is_active {
            return false;
        }
        result = Some(f(s));
        true
    });
    result
}

async fn run_poll_loop(
    source: Arc<dyn HolderSource>,
    mint: Pubkey,
    settings: PollerSettings,
    state: Arc<watch::Sender<PollState>>,
) {
    let mut ticker = interval(settings.interval);
    // A cycle stuck in retries delays the next one instead of stacking ticks
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !run_cycle(source.as_ref(), &mint, &settings, &state).await {
            debug!(mint = %mint, "Poll loop exiting");
            return;
        }
    }
}

/// One bounded-retry sequence. Returns false once the poller is stopped.
async fn run_cycle(
    source: &dyn HolderSource,
    mint: &Pubkey,
    settings: &PollerSettings,
    state: &watch::Sender<PollState>,
) -> bool {
    if update_state(state, PollState::begin_cycle).is_none() {
        return false;
    }

    loop {
        let m = metrics();
        m.holder_fetch_attempts.inc();
        let started = Instant::now();

        match source.fetch_holder_accounts(mint).await {
            Ok(accounts) => {
                let count = accounts.len() as u64;
                m.holder_fetch_latency.observe(started.elapsed().as_secs_f64());

                if update_state(state, |s| s.record_success(count)).is_none() {
                    return false;
                }
                m.holder_count.set(count as i64);
                debug!(mint = %mint, holders = count, "Holder count updated");
                return true;
            }
            Err(err) => {
                m.holder_fetch_failures.inc();

                match update_state(state, |s| s.record_failure(settings.max_retries)) {
                    None => return false,
                    Some(RetryDecision::GiveUp) => {
                        log_give_up(mint, settings, &err);
                        return true;
                    }
                    Some(RetryDecision::Retry { attempt }) => {
                        m.holder_fetch_retries.inc();
                        warn!(
                            mint = %mint,
                            attempt = attempt,
                            max_retries = settings.max_retries,
                            retry_in_ms = settings.retry_delay.as_millis() as u64,
                            error = %err,
                            "Holder count fetch failed, retrying"
                        );
                        sleep(settings.retry_delay).await;
                    }
                }
            }
        }
    }
}

fn log_give_up(mint: &Pubkey, settings: &PollerSettings, err: &HolderFetchError) {
    warn!(
        mint = %mint,
        retries = settings.max_retries,
        next_cycle_secs = settings.interval.as_secs(),
        error_kind = err.kind(),
        error = %err,
        "Holder count retries exhausted, waiting for next cycle"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ScriptedFetch, ScriptedHolderSource};
    use proptest::prelude::*;

    fn poller_with(source: Arc<ScriptedHolderSource>) -> HolderCountPoller {
        HolderCountPoller::new(source, PollerSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_two_failures() {
        let source = Arc::new(ScriptedHolderSource::new(vec![
            ScriptedFetch::Fail,
            ScriptedFetch::Fail,
            ScriptedFetch::Accounts(42),
        ]));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        // Attempts at t=0, 2s, 4s
        sleep(Duration::from_secs(5)).await;

        let state = handle.snapshot();
        assert_eq!(state.holder_count, HolderCount::Known(42));
        assert_eq!(state.retry_count, 0);
        assert!(!state.is_loading);
        assert!(state.is_active);
        assert!(state.last_updated.is_some());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_without_prior_count() {
        let source = Arc::new(ScriptedHolderSource::new(vec![ScriptedFetch::Fail; 4]));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        // Initial attempt plus three retries: t=0, 2s, 4s, 6s
        sleep(Duration::from_secs(7)).await;

        let state = handle.snapshot();
        assert_eq!(state.holder_count, HolderCount::Unknown);
        assert_eq!(state.retry_count, 3);
        assert!(!state.is_loading);
        assert_eq!(source.calls(), 4);

        // Nothing more until the next cycle
        sleep(Duration::from_secs(20)).await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_keeps_previous_count() {
        let mut script = vec![ScriptedFetch::Accounts(10)];
        script.extend(vec![ScriptedFetch::Fail; 4]);
        let source = Arc::new(ScriptedHolderSource::new(script));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.snapshot().holder_count, HolderCount::Known(10));

        // Second cycle at t=30 fails four times
        sleep(Duration::from_secs(37)).await;

        let state = handle.snapshot();
        assert_eq!(state.holder_count, HolderCount::Known(10));
        assert!(!state.is_loading);
        assert_eq!(source.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_refresh() {
        let source = Arc::new(ScriptedHolderSource::new(vec![
            ScriptedFetch::Accounts(1),
            ScriptedFetch::Accounts(2),
        ]));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.snapshot().holder_count, HolderCount::Known(1));

        sleep(Duration::from_secs(30)).await;
        assert_eq!(handle.snapshot().holder_count, HolderCount::Known(2));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_cycle_gets_fresh_retry_budget() {
        let mut script = vec![ScriptedFetch::Fail; 5];
        script.push(ScriptedFetch::Accounts(5));
        let source = Arc::new(ScriptedHolderSource::new(script));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        // First cycle gives up at t=6
        sleep(Duration::from_secs(7)).await;
        assert_eq!(handle.snapshot().retry_count, 3);

        // Second cycle: fail at t=30, succeed on retry at t=32
        sleep(Duration::from_secs(24)).await;
        let state = handle.snapshot();
        assert_eq!(state.retry_count, 1);
        assert!(state.is_loading);

        sleep(Duration::from_secs(2)).await;
        let state = handle.snapshot();
        assert_eq!(state.holder_count, HolderCount::Known(5));
        assert_eq!(state.retry_count, 0);
        assert!(!state.is_loading);
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_fetch() {
        let source = Arc::new(ScriptedHolderSource::new(vec![ScriptedFetch::Accounts(7)]));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        poller.stop(&handle);
        let stopped = handle.snapshot();
        assert!(!stopped.is_active);
        assert!(!stopped.is_loading);

        sleep(Duration::from_secs(120)).await;
        assert_eq!(handle.snapshot(), stopped);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_while_fetch_in_flight() {
        let source = Arc::new(
            ScriptedHolderSource::new(vec![ScriptedFetch::Accounts(7)])
                .with_latency(Duration::from_secs(1)),
        );
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        // Let the first fetch begin
        sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls(), 1);

        handle.stop();
        let stopped = handle.snapshot();

        sleep(Duration::from_secs(90)).await;
        assert_eq!(handle.snapshot(), stopped);
        assert_eq!(stopped.holder_count, HolderCount::Unknown);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_retry_delay() {
        let source = Arc::new(ScriptedHolderSource::new(vec![
            ScriptedFetch::Fail,
            ScriptedFetch::Accounts(3),
        ]));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.snapshot().retry_count, 1);

        handle.stop();
        sleep(Duration::from_secs(10)).await;

        let state = handle.snapshot();
        assert_eq!(state.holder_count, HolderCount::Unknown);
        assert_eq!(state.retry_count, 1);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let source = Arc::new(ScriptedHolderSource::new(vec![ScriptedFetch::Accounts(1)]));
        let poller = poller_with(source);
        let handle = poller.start(Pubkey::new_unique());

        sleep(Duration::from_secs(1)).await;
        handle.stop();
        let first = handle.snapshot();
        handle.stop();
        poller.stop(&handle);

        assert_eq!(handle.snapshot(), first);
        assert!(!handle.is_active());
        assert_eq!(first.holder_count, HolderCount::Known(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let source = Arc::new(ScriptedHolderSource::new(vec![ScriptedFetch::Accounts(1); 10]));
        let poller = poller_with(Arc::clone(&source));
        let handle = poller.start(Pubkey::new_unique());
        let rx = handle.subscribe();

        sleep(Duration::from_secs(1)).await;
        drop(handle);

        sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls(), 1);
        assert!(!rx.borrow().is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_updates() {
        let source = Arc::new(ScriptedHolderSource::new(vec![ScriptedFetch::Accounts(9)]));
        let poller = poller_with(source);
        let handle = poller.start(Pubkey::new_unique());
        let mut rx = handle.subscribe();

        loop {
            rx.changed().await.unwrap();
            if rx.borrow().holder_count == HolderCount::Known(9) {
                break;
            }
        }
        assert!(!rx.borrow().is_loading);
    }

    #[test]
    fn test_settings_from_config() {
        let config = PollerConfig {
            interval_secs: 10,
            retry_delay_secs: 1,
            max_retries: 5,
        };
        let settings = PollerSettings::from(&config);
        assert_eq!(settings.interval, Duration::from_secs(10));
        assert_eq!(settings.retry_delay, Duration::from_secs(1));
        assert_eq!(settings.max_retries, 5);
    }

    #[test]
    fn test_initial_state() {
        let state = PollState::started();
        assert_eq!(state.holder_count, HolderCount::Unknown);
        assert_eq!(state.holder_count.value(), None);
        assert!(state.is_loading);
        assert!(state.is_active);
    }

    proptest! {
        #[test]
        fn prop_retry_count_bounded(
            outcomes in proptest::collection::vec(proptest::option::of(0u64..10_000), 1..200)
        ) {
            let mut state = PollState::started();
            state.begin_cycle();

            for outcome in outcomes {
                match outcome {
                    Some(count) => {
                        state.record_success(count);
                        prop_assert_eq!(state.retry_count, 0);
                        prop_assert_eq!(state.holder_count, HolderCount::Known(count));
                        prop_assert!(!state.is_loading);
                        state.begin_cycle();
                    }
                    None => {
                        let before = state.holder_count;
                        if state.record_failure(DEFAULT_MAX_RETRIES) == RetryDecision::GiveUp {
                            prop_assert!(!state.is_loading);
                            state.begin_cycle();
                        }
                        prop_assert_eq!(state.holder_count, before);
                    }
                }
                prop_assert!(state.retry_count <= DEFAULT_MAX_RETRIES);
            }
        }
    }
}
