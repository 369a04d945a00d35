//! Debounced search controller.
//!
//! Every input change restarts a quiet-period timer; only the timer that
//! survives the last change in a burst performs a fetch. Fetches are
//! numbered, and a response is applied only if no newer fetch was issued
//! after it, so a slow old response can never overwrite a fresher one.

use core::time::Duration;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{oneshot, watch};
use tokio::task::{AbortHandle, JoinSet};

use super::{PerkList, ViewSnapshot};
use crate::source::PerkSource;

/// Quiet period applied when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Error text shown when a failed fetch carries no server message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Failed to load perks";

/// Tuning for a [`SearchView`].
///
/// # Examples
///
/// ```
/// use core::time::Duration;
/// use perks_rs::view::ViewConfig;
///
/// let config = ViewConfig::new()
///     .quiet_period(Duration::from_millis(250))
///     .fallback_message("Could not load perks");
/// assert_eq!(config.quiet_period, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Time without input changes before a scheduled fetch runs.
    pub quiet_period: Duration,
    /// Error text used when the server sends no message.
    pub fallback_message: String,
}

impl Default for ViewConfig {
    #[inline]
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            fallback_message: DEFAULT_ERROR_MESSAGE.to_owned(),
        }
    }
}

impl ViewConfig {
    /// Creates the default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce quiet period.
    #[inline]
    #[must_use]
    pub const fn quiet_period(mut self, period: Duration) -> Self {
        self.quiet_period = period;
        self
    }

    /// Sets the fallback error text.
    #[inline]
    #[must_use]
    pub fn fallback_message<T: Into<String>>(mut self, message: T) -> Self {
        self.fallback_message = message.into();
        self
    }
}

/// Search-and-filter view over a [`PerkSource`].
///
/// State is published through a [`watch`] channel; call
/// [`SearchView::subscribe`] to react to every settled change or
/// [`SearchView::snapshot`] to read the current state.
///
/// Dropping the view cancels its pending timer and any fetch still in
/// flight, so no state changes happen after teardown.
///
/// # Example
///
/// ```rust
/// use perks_rs::source::InMemoryPerks;
/// use perks_rs::view::{SearchView, ViewConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let view = SearchView::new(InMemoryPerks::new(), ViewConfig::default());
/// view.mount().await;
/// assert!(view.snapshot().shows_empty_state());
/// # }
/// ```
#[derive(Debug)]
pub struct SearchView<S: PerkSource> {
    /// State shared with spawned timer tasks.
    shared: Arc<Shared<S>>,
    /// Timer and load tasks; aborted on drop.
    tasks: Mutex<JoinSet<()>>,
}

/// State reachable from both the view and its timer tasks.
#[derive(Debug)]
struct Shared<S> {
    /// Where perks are fetched from.
    source: S,
    /// Debounce and error-text tuning.
    config: ViewConfig,
    /// Published view state.
    state: watch::Sender<ViewSnapshot>,
    /// Number of the most recently issued fetch.
    latest_request: AtomicU64,
    /// Whether the initial load already ran.
    mounted: AtomicBool,
    /// Currently scheduled debounce timer.
    timer: Mutex<PendingTimer>,
}

/// Bookkeeping for the single pending debounce timer.
#[derive(Debug, Default)]
struct PendingTimer {
    /// Bumped on every schedule and cancel; a timer only fires if its
    /// generation is still current.
    generation: u64,
    /// Abort handle of the sleeping timer task.
    handle: Option<AbortHandle>,
}

impl<S: PerkSource + 'static> SearchView<S> {
    /// Creates an idle view. Nothing is fetched until [`Self::mount`].
    #[inline]
    #[must_use]
    pub fn new(source: S, config: ViewConfig) -> Self {
        let (state, _initial_rx) = watch::channel(ViewSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                source,
                config,
                state,
                latest_request: AtomicU64::new(0),
                mounted: AtomicBool::new(false),
                timer: Mutex::new(PendingTimer::default()),
            }),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Performs the initial unfiltered load without waiting for the quiet
    /// period. Only the first call fetches; later calls return at once.
    ///
    /// The load runs on the view's own task: dropping the returned future
    /// stops the wait, not the fetch.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    pub async fn mount(&self) {
        if self.shared.mounted.swap(true, Ordering::SeqCst) {
            tracing::trace!("view already mounted");
            return;
        }
        tracing::debug!("mounting search view");
        self.load_now().await;
    }

    /// Replaces the search text and schedules a debounced fetch if it
    /// changed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    pub fn set_query<T: Into<String>>(&self, text: T) {
        let text = text.into();
        let changed = self.shared.state.send_if_modified(|state| {
            if state.query == text {
                return false;
            }
            state.query = text;
            true
        });
        if changed {
            self.schedule();
        }
    }

    /// Replaces the merchant filter (empty for all) and schedules a
    /// debounced fetch if it changed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    pub fn set_merchant<T: Into<String>>(&self, merchant: T) {
        let merchant = merchant.into();
        let changed = self.shared.state.send_if_modified(|state| {
            if state.merchant == merchant {
                return false;
            }
            state.merchant = merchant;
            true
        });
        if changed {
            self.schedule();
        }
    }

    /// Clears the search text and merchant filter.
    ///
    /// Does not fetch by itself; the change schedules one debounced
    /// unfiltered fetch, and nothing happens if both were already empty.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    pub fn reset(&self) {
        let changed = self.shared.state.send_if_modified(|state| {
            if state.query.is_empty() && state.merchant.is_empty() {
                return false;
            }
            state.query.clear();
            state.merchant.clear();
            true
        });
        if changed {
            self.schedule();
        }
    }

    /// Fetches immediately with the current input, cancelling any pending
    /// debounced fetch.
    ///
    /// Like [`Self::mount`], the fetch completes even if the caller stops
    /// awaiting it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    pub async fn search_now(&self) {
        if self.shared.cancel_timer() {
            tracing::trace!("manual search replaced pending timer");
        }
        self.load_now().await;
    }

    /// Re-issues the fetch for the current input after a failure.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[inline]
    pub async fn retry(&self) {
        tracing::debug!("retrying perk load");
        self.search_now().await;
    }

    /// Returns a copy of the current state.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Returns a receiver that is notified on every state change.
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.shared.state.subscribe()
    }

    /// Returns `true` if a debounced fetch is waiting for its quiet period.
    #[inline]
    #[must_use]
    pub fn has_pending_search(&self) -> bool {
        self.shared.lock_timer().handle.is_some()
    }

    /// Locks the task set after dropping the tasks that already finished.
    fn lock_tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        tasks
    }

    /// Spawns a load on the view's task set and waits for it to settle.
    async fn load_now(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        let _load = {
            let mut tasks = self.lock_tasks();
            tasks.spawn(async move {
                shared.load().await;
                let _sent = done_tx.send(());
            })
        };
        if done_rx.await.is_err() {
            tracing::trace!("load aborted before settling");
        }
    }

    /// Cancels the pending timer and starts a new one.
    fn schedule(&self) {
        let mut tasks = self.lock_tasks();

        let mut timer = self.shared.lock_timer();
        if let Some(previous) = timer.handle.take() {
            previous.abort();
        }
        timer.generation = timer.generation.wrapping_add(1);
        let generation = timer.generation;
        let quiet_period = self.shared.config.quiet_period;
        let shared = Arc::clone(&self.shared);
        tracing::trace!(generation, ?quiet_period, "scheduling debounced search");
        timer.handle = Some(tasks.spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if shared.claim_timer(generation) {
                shared.load().await;
            }
        }));
    }
}

impl<S: PerkSource> Shared<S> {
    /// Locks the timer bookkeeping, recovering from poisoning.
    fn lock_timer(&self) -> MutexGuard<'_, PendingTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the timer of `generation` as fired. Returns `false` if it was
    /// superseded in the meantime.
    fn claim_timer(&self, generation: u64) -> bool {
        let mut timer = self.lock_timer();
        if timer.generation != generation {
            return false;
        }
        timer.handle = None;
        true
    }

    /// Aborts the pending timer, if any. Returns whether one was pending.
    fn cancel_timer(&self) -> bool {
        let mut timer = self.lock_timer();
        timer.generation = timer.generation.wrapping_add(1);
        timer.handle.take().is_some_and(|handle| {
            handle.abort();
            true
        })
    }

    /// Fetches with the current input and applies the outcome unless a
    /// newer fetch was issued meanwhile.
    async fn load(&self) {
        let mut issued = None;
        self.state.send_modify(|state| {
            let id = self.latest_request.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
            state.loading = true;
            issued = Some((id, state.to_query()));
        });
        let Some((id, query)) = issued else {
            return;
        };
        tracing::debug!(request = id, query = %query, "loading perks");

        let outcome = self.source.fetch(&query).await;

        let fallback = &self.config.fallback_message;
        let applied = self.state.send_if_modified(|state| {
            if self.latest_request.load(Ordering::SeqCst) != id {
                return false;
            }
            match outcome {
                Ok(perks) => {
                    tracing::debug!(request = id, count = perks.len(), "perks loaded");
                    state.results = PerkList::new(perks);
                    state.error = None;
                }
                Err(err) => {
                    tracing::warn!(request = id, error = %err, "failed to load perks");
                    state.error = Some(
                        err.server_message()
                            .map_or_else(|| fallback.clone(), ToOwned::to_owned),
                    );
                }
            }
            state.loading = false;
            true
        });
        if !applied {
            tracing::debug!(request = id, "discarding stale response");
        }
    }
}

impl<S: PerkSource> Drop for SearchView<S> {
    #[inline]
    fn drop(&mut self) {
        let _cancelled = self.shared.cancel_timer();
        self.tasks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}
