//! Racing combinators
//!
//! [`first_ok`] and [`first_err`] observe every input on its own task and
//! return the first outcome, in completion order, whose variant matches.
//! Losing tasks are not cancelled; they finish and their outcomes are
//! dropped.

use tokio::sync::mpsc;
use tracing::{Instrument, debug};

use crate::deferred::{Deferred, Resolve};
use crate::error::{Outcome, OutcomeError, Variant};

async fn race<I, R>(inputs: I, expected: Variant) -> Outcome<R::Value>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut entrants = 0usize;
    for (index, input) in inputs.into_iter().enumerate() {
        let tx = tx.clone();
        tokio::spawn(
            async move {
                let outcome = input.resolve().await;
                // the receiver is gone once a winner has been picked
                let _ = tx.send((index, outcome));
            }
            .in_current_span(),
        );
        entrants += 1;
    }
    drop(tx);

    while let Some((index, outcome)) = rx.recv().await {
        let matches = match expected {
            Variant::Ok => outcome.is_ok(),
            Variant::Error => outcome.is_err(),
        };
        if matches {
            debug!(index, entrants, %expected, "race won");
            return outcome;
        }
    }

    debug!(entrants, %expected, "race found no match");
    Err(OutcomeError::NotFound { expected })
}

/// Returns the first success to complete, or [`OutcomeError::NotFound`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use nebula_outcome::{first_ok, Deferred, Outcome, OutcomeError};
///
/// # #[tokio::main]
/// # async fn main() {
/// let delayed = |ms: u64, outcome: Outcome<u32>| {
///     Deferred::spawn(async move {
///         tokio::time::sleep(Duration::from_millis(ms)).await;
///         outcome
///     })
/// };
///
/// let winner = first_ok(vec![
///     delayed(10, Err(OutcomeError::msg("slow failure"))),
///     delayed(1, Ok(5)),
///     delayed(5, Err(OutcomeError::msg("failure"))),
/// ])
/// .await;
/// assert_eq!(winner, Ok(5));
/// # }
/// ```
pub async fn first_ok<I, R>(inputs: I) -> Outcome<R::Value>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
{
    race(inputs, Variant::Ok).await
}

/// Returns the first failure to complete.
///
/// The result is that failure itself (`Err`). If every input succeeds the
/// result is [`OutcomeError::NotFound`].
pub async fn first_err<I, R>(inputs: I) -> Outcome<R::Value>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
{
    race(inputs, Variant::Error).await
}

/// [`first_ok`] inside a new [`Deferred`].
pub fn first_ok_async<I, R>(inputs: I) -> Deferred<R::Value>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
{
    let inputs: Vec<R> = inputs.into_iter().collect();
    Deferred::spawn(race(inputs, Variant::Ok))
}

/// [`first_err`] inside a new [`Deferred`].
pub fn first_err_async<I, R>(inputs: I) -> Deferred<R::Value>
where
    I: IntoIterator<Item = R>,
    R: Resolve,
{
    let inputs: Vec<R> = inputs.into_iter().collect();
    Deferred::spawn(race(inputs, Variant::Error))
}
