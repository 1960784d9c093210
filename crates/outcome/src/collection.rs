//! Collection combinators
//!
//! Elementwise mapping ([`each`], [`range`], [`sliced`]), aggregate
//! conversion ([`join`], [`disjoin`], [`flat`]) and filtering
//! ([`only_oks`], [`only_errors`]).
//!
//! Every combinator here keeps input-index-to-output-index correspondence,
//! including the `_async` variants: each element gets its own [`Deferred`],
//! and the returned vector holds them in input order no matter which task
//! finishes first.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::deferred::{Deferred, Resolve, defer};
use crate::error::{Outcome, OutcomeError};
use crate::sequential::{and, and_async, short_circuited};

/// Applies `f` to every success; failures pass through in place.
pub fn each<T, U, I, F>(outcomes: I, mut f: F) -> Vec<Outcome<U>>
where
    I: IntoIterator<Item = Outcome<T>>,
    F: FnMut(T) -> Outcome<U>,
{
    outcomes
        .into_iter()
        .map(|outcome| and(outcome, &mut f))
        .collect()
}

/// [`each`] with one task per element.
pub fn each_async<I, R, F, S>(inputs: I, f: F) -> Vec<Deferred<S::Value>>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
    F: Fn(R::Value) -> S + Send + Sync + 'static,
    S: Resolve,
{
    let f = Arc::new(f);
    inputs
        .into_iter()
        .map(|input| {
            let f = Arc::clone(&f);
            and_async(input, move |value| f(value))
        })
        .collect()
}

/// Calls `f` with every index in `0..n`.
pub fn range<U, F>(n: usize, f: F) -> Vec<Outcome<U>>
where
    F: FnMut(usize) -> Outcome<U>,
{
    (0..n).map(f).collect()
}

/// [`range`] with one task per index.
pub fn range_async<F, S>(n: usize, f: F) -> Vec<Deferred<S::Value>>
where
    F: Fn(usize) -> S + Send + Sync + 'static,
    S: Resolve,
{
    let f = Arc::new(f);
    (0..n)
        .map(|index| {
            let f = Arc::clone(&f);
            defer(move || f(index))
        })
        .collect()
}

/// Collects successes into one vector, or returns the first failure by index.
pub fn join<T, I>(outcomes: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    outcomes.into_iter().collect()
}

/// [`join`] inside a new [`Deferred`]; inputs are awaited in index order.
pub fn join_async<I, R>(inputs: I) -> Deferred<Vec<R::Value>>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
{
    let inputs: Vec<R> = inputs.into_iter().collect();
    Deferred::spawn(resolve_in_order(inputs))
}

async fn resolve_in_order<R>(inputs: Vec<R>) -> Outcome<Vec<R::Value>>
where
    R: Resolve,
{
    let mut values = Vec::with_capacity(inputs.len());
    for input in inputs {
        values.push(input.resolve().await?);
    }
    Ok(values)
}

/// Expands a success of a vector into one success per element.
///
/// A failure becomes a single-element vector holding that failure.
pub fn disjoin<T>(outcome: Outcome<Vec<T>>) -> Vec<Outcome<T>> {
    match outcome {
        Ok(values) => values.into_iter().map(Ok).collect(),
        Err(error) => vec![Err(error)],
    }
}

/// [`disjoin`]s every element and concatenates the results in order.
pub fn flat<T, I>(outcomes: I) -> Vec<Outcome<T>>
where
    I: IntoIterator<Item = Outcome<Vec<T>>>,
{
    outcomes.into_iter().flat_map(disjoin).collect()
}

fn chunks<T>(size: usize, items: impl IntoIterator<Item = T>) -> Vec<Vec<T>> {
    let mut items = items.into_iter().peekable();
    let mut chunks = Vec::new();
    while items.peek().is_some() {
        chunks.push(items.by_ref().take(size).collect());
    }
    trace!(size, chunks = chunks.len(), "partitioned input");
    chunks
}

fn zero_chunk_size() -> OutcomeError {
    debug!("rejected chunk size of zero");
    OutcomeError::invalid_config("chunk size must be at least 1")
}

/// Splits `outcomes` into consecutive chunks of at most `size`, [`join`]s
/// each chunk and applies `f` to its values. One output per chunk.
///
/// A `size` of zero yields a single [`OutcomeError::InvalidConfig`].
///
/// # Examples
///
/// ```rust
/// use nebula_outcome::{ok_all, sliced, Outcome};
///
/// let sums = sliced(2, ok_all(1..=5), |chunk| Outcome::Ok(chunk.iter().sum::<i32>()));
/// assert_eq!(sums, vec![Ok(3), Ok(7), Ok(5)]);
/// ```
pub fn sliced<T, U, I, F>(size: usize, outcomes: I, mut f: F) -> Vec<Outcome<U>>
where
    I: IntoIterator<Item = Outcome<T>>,
    F: FnMut(Vec<T>) -> Outcome<U>,
{
    if size == 0 {
        return vec![Err(zero_chunk_size())];
    }
    chunks(size, outcomes)
        .into_iter()
        .map(|chunk| and(join(chunk), &mut f))
        .collect()
}

/// [`sliced`] with one task per chunk.
///
/// Each task joins its chunk in index order and then resolves `f`'s result,
/// the same contract as [`and_async`] over [`join_async`].
pub fn sliced_async<I, R, F, S>(size: usize, inputs: I, f: F) -> Vec<Deferred<S::Value>>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
    F: Fn(Vec<R::Value>) -> S + Send + Sync + 'static,
    S: Resolve,
{
    if size == 0 {
        return vec![Deferred::ready(Err(zero_chunk_size()))];
    }
    let f = Arc::new(f);
    chunks(size, inputs)
        .into_iter()
        .map(|chunk| {
            let f = Arc::clone(&f);
            Deferred::spawn(async move {
                let values = resolve_in_order(chunk).await.map_err(short_circuited)?;
                f(values).resolve().await
            })
        })
        .collect()
}

/// Keeps the successes, in order.
pub fn only_oks<T, I>(outcomes: I) -> Vec<Outcome<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    outcomes.into_iter().filter(Result::is_ok).collect()
}

/// Keeps the failures, in order.
pub fn only_errors<T, I>(outcomes: I) -> Vec<Outcome<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    outcomes.into_iter().filter(Result::is_err).collect()
}
