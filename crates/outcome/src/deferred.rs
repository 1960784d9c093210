//! Deferred outcomes - results produced by a background task
//!
//! A [`Deferred`] is scheduled eagerly: the producer starts on its own tokio
//! task the moment the handle is created, whether or not anyone ever looks
//! at it. The first observer waits for the producer and caches its outcome;
//! every later observer, concurrent or not, gets a copy of that same cached
//! outcome. The producer runs at most once.
//!
//! ```text
//!   spawn ──► Pending ──(producer completes, first observer publishes)──► Resolved
//! ```
//!
//! There is no cancellation. Dropping every handle detaches the task, which
//! still runs to completion.
//!
//! # Examples
//!
//! ```rust
//! use nebula_outcome::{defer, Outcome};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let answer = defer(|| Outcome::Ok(6 * 7));
//! let observer = answer.clone();
//!
//! assert_eq!(answer.await, Ok(42));
//! assert_eq!(observer.get_or_default(0).await, 42);
//! # }
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, warn};

use crate::error::{Outcome, OutcomeError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

// ============================================================================
// RESOLVE
// ============================================================================

/// Anything that eventually yields an [`Outcome`].
///
/// Implemented by `Outcome<T>` (yields immediately) and [`Deferred<T>`]
/// (waits for the producer). The async combinators accept any `Resolve`
/// input and any `Resolve`-returning callback, so they do not care whether
/// a value is already available or still being computed.
pub trait Resolve: Send + 'static {
    /// Success type.
    type Value: Send + 'static;

    /// Waits for and returns the outcome.
    fn resolve(self) -> impl Future<Output = Outcome<Self::Value>> + Send;
}

impl<T> Resolve for Outcome<T>
where
    T: Send + 'static,
{
    type Value = T;

    fn resolve(self) -> impl Future<Output = Outcome<T>> + Send {
        std::future::ready(self)
    }
}

impl<T> Resolve for Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Value = T;

    fn resolve(self) -> impl Future<Output = Outcome<T>> + Send {
        async move { self.outcome().await }
    }
}

// ============================================================================
// DEFERRED
// ============================================================================

/// Handle to an outcome computed by a background task.
///
/// Cloning the handle is cheap; all clones observe the same cached outcome.
pub struct Deferred<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    id: u64,
    /// Written once, by whichever observer wins `get_or_init`.
    cell: OnceCell<Outcome<T>>,
    /// Producer handle; `None` once its outcome has been published.
    task: Mutex<Option<JoinHandle<Outcome<T>>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Deferred<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Deferred");
        out.field("id", &self.shared.id);
        match self.shared.cell.get() {
            Some(outcome) => out.field("outcome", outcome),
            None => out.field("outcome", &format_args!("<pending>")),
        };
        out.finish()
    }
}

impl<T> Deferred<T>
where
    T: Send + 'static,
{
    /// Schedules `producer` on a new tokio task and returns its handle.
    ///
    /// The task inherits the caller's tracing span. Must be called from
    /// within a tokio runtime.
    pub fn spawn<F>(producer: F) -> Self
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        let id = next_id();
        let span = tracing::debug_span!("deferred", id);
        debug!(id, "scheduling deferred task");
        let handle = tokio::spawn(producer.instrument(span));
        Self::from_handle(id, handle)
    }

    /// Schedules a blocking `producer` on tokio's blocking pool.
    pub fn spawn_blocking<F>(producer: F) -> Self
    where
        F: FnOnce() -> Outcome<T> + Send + 'static,
    {
        let id = next_id();
        let span = tracing::debug_span!("deferred", id, blocking = true);
        debug!(id, "scheduling blocking deferred task");
        let handle = tokio::task::spawn_blocking(move || span.in_scope(producer));
        Self::from_handle(id, handle)
    }

    /// Creates an already-resolved handle. No task is spawned.
    pub fn ready(outcome: Outcome<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: next_id(),
                cell: OnceCell::new_with(Some(outcome)),
                task: Mutex::new(None),
            }),
        }
    }

    fn from_handle(id: u64, handle: JoinHandle<Outcome<T>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                id,
                cell: OnceCell::new(),
                task: Mutex::new(Some(handle)),
            }),
        }
    }
}

impl<T> Deferred<T> {
    /// Process-unique id, as recorded in log events.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Returns the cached outcome without waiting.
    ///
    /// `None` until some observer has published the producer's outcome.
    pub fn try_get(&self) -> Option<&Outcome<T>> {
        self.shared.cell.get()
    }

    /// True once the outcome has been published.
    pub fn is_resolved(&self) -> bool {
        self.shared.cell.initialized()
    }
}

impl<T> Deferred<T>
where
    T: Send + Sync + 'static,
{
    /// Waits for the producer (first observer only) and returns the cached outcome.
    async fn settled(&self) -> &Outcome<T> {
        let shared = &*self.shared;
        shared
            .cell
            .get_or_init(|| async {
                // An observer dropped mid-wait leaves the handle in place for
                // the next one; it is only cleared after a completed await.
                let mut slot = shared.task.lock().await;
                let outcome = match slot.as_mut() {
                    Some(handle) => match handle.await {
                        Ok(outcome) => outcome,
                        Err(join_error) => {
                            warn!(id = shared.id, error = %join_error, "deferred producer failed");
                            Err(OutcomeError::from(join_error))
                        }
                    },
                    None => Err(OutcomeError::TaskFailed {
                        reason: "producer handle missing".to_string(),
                    }),
                };
                *slot = None;
                debug!(id = shared.id, ok = outcome.is_ok(), "deferred resolved");
                outcome
            })
            .await
    }
}

impl<T> Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Returns a copy of the outcome, waiting for the producer if needed.
    pub async fn outcome(&self) -> Outcome<T> {
        self.settled().await.clone()
    }

    /// True if the outcome is a success.
    pub async fn is_ok(&self) -> bool {
        self.settled().await.is_ok()
    }

    /// True if the outcome is a failure.
    pub async fn is_error(&self) -> bool {
        self.settled().await.is_err()
    }

    /// Returns the failure, or `None` on success.
    pub async fn error_or_none(&self) -> Option<OutcomeError> {
        self.settled().await.as_ref().err().cloned()
    }

    /// Returns the value, or `default` on failure.
    pub async fn get_or_default(&self, default: T) -> T {
        match self.settled().await {
            Ok(value) => value.clone(),
            Err(_) => default,
        }
    }

    /// Returns the value, or `None` on failure.
    pub async fn get_or_none(&self) -> Option<T> {
        self.settled().await.as_ref().ok().cloned()
    }

    /// Splits into a conventional `(value, error)` pair.
    pub async fn into_parts(self) -> (T, Option<OutcomeError>)
    where
        T: Default,
    {
        match self.settled().await {
            Ok(value) => (value.clone(), None),
            Err(error) => (T::default(), Some(error.clone())),
        }
    }

    /// Runs `on_ok` with the value on success, then returns the handle.
    pub async fn if_ok<F>(self, on_ok: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Ok(value) = self.settled().await {
            on_ok(value);
        }
        self
    }

    /// Runs `on_error` with the error on failure, then returns the handle.
    pub async fn if_error<F>(self, on_error: F) -> Self
    where
        F: FnOnce(&OutcomeError),
    {
        if let Err(error) = self.settled().await {
            on_error(error);
        }
        self
    }

    /// Runs exactly one of the callbacks, then returns the handle.
    pub async fn flat<F, G>(self, on_ok: F, on_error: G) -> Self
    where
        F: FnOnce(&T),
        G: FnOnce(&OutcomeError),
    {
        match self.settled().await {
            Ok(value) => on_ok(value),
            Err(error) => on_error(error),
        }
        self
    }
}

impl<T> IntoFuture for Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Outcome<T>;
    type IntoFuture = BoxFuture<'static, Outcome<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.outcome().await })
    }
}

impl<T> From<Outcome<T>> for Deferred<T>
where
    T: Send + 'static,
{
    fn from(outcome: Outcome<T>) -> Self {
        Self::ready(outcome)
    }
}

// ============================================================================
// SCHEDULING HELPERS
// ============================================================================

/// Schedules a zero-argument producer on a new task.
///
/// The producer may return an `Outcome` or another [`Deferred`]; either way
/// the handle resolves to the final outcome.
pub fn defer<F, R>(producer: F) -> Deferred<R::Value>
where
    F: FnOnce() -> R + Send + 'static,
    R: Resolve,
{
    Deferred::spawn(async move { producer().resolve().await })
}

/// Schedules a blocking zero-argument producer on tokio's blocking pool.
pub fn defer_blocking<F, T>(producer: F) -> Deferred<T>
where
    F: FnOnce() -> Outcome<T> + Send + 'static,
    T: Send + 'static,
{
    Deferred::spawn_blocking(producer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ready_is_resolved_without_task() {
        let d = Deferred::ready(Outcome::Ok(3));
        assert!(d.is_resolved());
        assert_eq!(d.try_get(), Some(&Ok(3)));
        assert_eq!(d.await, Ok(3));
    }

    #[tokio::test]
    async fn test_producer_runs_even_if_never_observed() {
        let ran = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = tokio::sync::oneshot::channel();
        {
            let ran = Arc::clone(&ran);
            let _dropped = defer(move || {
                ran.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(());
                Outcome::Ok(())
            });
        }
        rx.await.unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_try_get_is_none_until_observed() {
        let d = Deferred::spawn(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Outcome::Ok("late")
        });
        assert!(d.try_get().is_none());
        assert_eq!(d.get_or_none().await, Some("late"));
        assert!(d.is_resolved());
    }

    #[tokio::test]
    async fn test_observer_dropped_mid_wait_leaves_producer_for_next() {
        let runs = Arc::new(AtomicUsize::new(0));
        let d = {
            let runs = Arc::clone(&runs);
            Deferred::spawn(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Outcome::Ok(7)
            })
        };

        let first = tokio::time::timeout(Duration::from_millis(5), d.outcome()).await;
        assert!(first.is_err());
        assert!(d.try_get().is_none());

        assert_eq!(d.outcome().await, Ok(7));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(d.is_resolved());
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_shared_by_clones() {
        let a = defer(|| Outcome::Ok(1));
        let b = Deferred::ready(Outcome::Ok(2));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
        assert!(format!("{b:?}").contains(&format!("id: {}", b.id())));
    }

    #[tokio::test]
    async fn test_panicking_producer_resolves_to_task_failure() {
        let d: Deferred<i32> = defer(|| -> Outcome<i32> { panic!("boom") });
        let err = d.error_or_none().await.unwrap();
        assert!(err.is_task_failure());
        assert_eq!(err.to_string(), "deferred task failed: boom");
        // the cached failure is stable
        assert!(d.is_error().await);
    }

    #[tokio::test]
    async fn test_blocking_producer() {
        let d = defer_blocking(|| {
            std::thread::sleep(Duration::from_millis(2));
            Outcome::Ok(vec![1, 2])
        });
        assert_eq!(d.into_parts().await, (vec![1, 2], None));
    }

    #[tokio::test]
    async fn test_defer_flattens_nested_deferred() {
        let d = defer(|| defer(|| Outcome::Ok(5u8)));
        assert_eq!(d.await, Ok(5));
    }

    #[tokio::test]
    async fn test_observers_chain() {
        let hits = AtomicUsize::new(0);
        let d = defer(|| Outcome::<u8>::Err(OutcomeError::msg("bad")));
        let d = d
            .if_ok(|_| {
                hits.fetch_add(100, Ordering::SeqCst);
            })
            .await
            .if_error(|_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .flat(
                |_| {
                    hits.fetch_add(100, Ordering::SeqCst);
                },
                |_| {
                    hits.fetch_add(10, Ordering::SeqCst);
                },
            )
            .await;
        assert_eq!(hits.load(Ordering::SeqCst), 11);
        assert_eq!(d.get_or_default(9).await, 9);
    }

    #[tokio::test]
    async fn test_debug_shows_state() {
        let d = Deferred::ready(Outcome::Ok(1));
        assert!(format!("{d:?}").contains("Ok(1)"));
    }
}
