//! Adapters from conventional shapes into [`Outcome`]
//!
//! - `(value, Option<error>)` pairs: [`wrap`], [`void`], [`void_all`]
//! - `Result<T, E>` with a convertible error: [`lift`]
//! - plain values: [`ok_all`]
//! - closable sources (any [`Stream`]): [`read_chan`],
//!   [`read_chan_or_exhausted`], [`read_chan_async`]

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::deferred::Deferred;
use crate::error::{Outcome, OutcomeError};

/// Success if `error` is absent, otherwise a failure carrying it.
pub fn wrap<T, E>(value: T, error: Option<E>) -> Outcome<T>
where
    E: Into<OutcomeError>,
{
    match error {
        None => Ok(value),
        Some(error) => Err(error.into()),
    }
}

/// Converts a conventional result whose error converts into [`OutcomeError`].
///
/// ```rust
/// use nebula_outcome::{lift, Outcome};
///
/// let read: Outcome<String> = lift(std::fs::read_to_string("/definitely/not/here"));
/// assert!(read.unwrap_err().is_domain());
/// ```
pub fn lift<T, E>(result: Result<T, E>) -> Outcome<T>
where
    E: Into<OutcomeError>,
{
    result.map_err(Into::into)
}

/// [`wrap`] for operations that produce no value.
pub fn void<E>(error: Option<E>) -> Outcome<()>
where
    E: Into<OutcomeError>,
{
    wrap((), error)
}

/// One [`void`] per optional error, in order.
pub fn void_all<E, I>(errors: I) -> Vec<Outcome<()>>
where
    I: IntoIterator<Item = Option<E>>,
    E: Into<OutcomeError>,
{
    errors.into_iter().map(void).collect()
}

/// One success per value, in order.
pub fn ok_all<T, I>(values: I) -> Vec<Outcome<T>>
where
    I: IntoIterator<Item = T>,
{
    values.into_iter().map(Ok).collect()
}

/// Takes the next item from `source`, or runs `on_closed` once it is exhausted.
pub async fn read_chan<S, F>(source: &mut S, on_closed: F) -> Outcome<S::Item>
where
    S: Stream + Unpin,
    F: FnOnce() -> Outcome<S::Item>,
{
    match source.next().await {
        Some(item) => Ok(item),
        None => on_closed(),
    }
}

/// [`read_chan`] that reports [`OutcomeError::SourceExhausted`] on close.
pub async fn read_chan_or_exhausted<S>(source: &mut S) -> Outcome<S::Item>
where
    S: Stream + Unpin,
{
    read_chan(source, || {
        debug!("source exhausted");
        Err(OutcomeError::SourceExhausted)
    })
    .await
}

/// A source several deferred readers can draw from.
pub type SharedSource<S> = Arc<Mutex<S>>;

/// Wraps `source` for use with [`read_chan_async`].
pub fn shared_source<S>(source: S) -> SharedSource<S> {
    Arc::new(Mutex::new(source))
}

/// [`read_chan`] on a new task.
///
/// Readers take turns on the shared source; each delivered item goes to
/// exactly one reader.
pub fn read_chan_async<S, F>(source: SharedSource<S>, on_closed: F) -> Deferred<S::Item>
where
    S: Stream + Unpin + Send + 'static,
    S::Item: Send + 'static,
    F: FnOnce() -> Outcome<S::Item> + Send + 'static,
{
    Deferred::spawn(async move {
        let mut source = source.lock().await;
        read_chan(&mut *source, on_closed).await
    })
}
