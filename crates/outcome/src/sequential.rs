//! Sequential combinators - bind and N-ary fan-in
//!
//! [`and`] is monadic bind over an [`Outcome`]: a failure short-circuits and
//! the callback never runs. [`and_async`] does the same inside a new
//! [`Deferred`], accepting pending inputs and callbacks that return pending
//! outcomes.
//!
//! `and2` .. `and9` are fan-in barriers. All N inputs are awaited
//! concurrently; only then is the decision made, in argument order: the
//! first failure among all N wins and the callback is skipped, otherwise the
//! callback receives every value. That is the same ordering
//! [`proof`](crate::proof) applies to a list of capabilities.
//!
//! ```rust
//! use nebula_outcome::{and, and3, defer, Outcome, OutcomeError};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let parsed = and(Outcome::Ok("42"), |s| s.parse::<u32>().map_err(OutcomeError::domain));
//! assert_eq!(parsed, Ok(42));
//!
//! let total = and3(
//!     defer(|| Outcome::Ok(1)),
//!     Outcome::Ok(2),
//!     defer(|| Outcome::Ok(3)),
//!     |a, b, c| Outcome::Ok(a + b + c),
//! )
//! .await;
//! assert_eq!(total, Ok(6));
//! # }
//! ```

use tracing::trace;

use crate::deferred::{Deferred, Resolve};
use crate::error::{Outcome, OutcomeError};

pub(crate) fn short_circuited(error: OutcomeError) -> OutcomeError {
    trace!(%error, "short-circuit on failure");
    error
}

/// Applies `f` to the value of a success; passes a failure through untouched.
pub fn and<T, U, F>(outcome: Outcome<T>, f: F) -> Outcome<U>
where
    F: FnOnce(T) -> Outcome<U>,
{
    match outcome {
        Ok(value) => f(value),
        Err(error) => Err(short_circuited(error)),
    }
}

/// [`and`] on a new task: waits for `input`, then resolves `f`'s result.
pub fn and_async<R, F, S>(input: R, f: F) -> Deferred<S::Value>
where
    R: Resolve,
    F: FnOnce(R::Value) -> S + Send + 'static,
    S: Resolve,
{
    Deferred::spawn(async move {
        match input.resolve().await {
            Ok(value) => f(value).resolve().await,
            Err(error) => Err(short_circuited(error)),
        }
    })
}

macro_rules! fan_in {
    ($arity:literal, $name:ident, $async_name:ident; $($input:ident: $R:ident),+) => {
        #[doc = concat!(
            "Fan-in over ", stringify!($arity), " inputs.\n\n",
            "Awaits every input concurrently, then returns the first failure in ",
            "argument order, or the resolved result of `f` applied to all values.\n\n",
            "Failures are reported in the order [`proof`](crate::proof) uses."
        )]
        pub async fn $name<$($R,)+ F, S>($($input: $R,)+ f: F) -> Outcome<S::Value>
        where
            $($R: Resolve,)+
            F: FnOnce($(<$R as Resolve>::Value),+) -> S,
            S: Resolve,
        {
            let ($($input,)+) = futures::join!($($input.resolve()),+);
            $(let $input = $input.map_err(short_circuited)?;)+
            f($($input),+).resolve().await
        }

        #[doc = concat!("[`", stringify!($name), "`] inside a new [`Deferred`].")]
        pub fn $async_name<$($R,)+ F, S>($($input: $R,)+ f: F) -> Deferred<S::Value>
        where
            $($R: Resolve,)+
            F: FnOnce($(<$R as Resolve>::Value),+) -> S + Send + 'static,
            S: Resolve,
        {
            Deferred::spawn($name($($input,)+ f))
        }
    };
}

fan_in!(2, and2, and2_async; r1: R1, r2: R2);
fan_in!(3, and3, and3_async; r1: R1, r2: R2, r3: R3);
fan_in!(4, and4, and4_async; r1: R1, r2: R2, r3: R3, r4: R4);
fan_in!(5, and5, and5_async; r1: R1, r2: R2, r3: R3, r4: R4, r5: R5);
fan_in!(6, and6, and6_async; r1: R1, r2: R2, r3: R3, r4: R4, r5: R5, r6: R6);
fan_in!(7, and7, and7_async; r1: R1, r2: R2, r3: R3, r4: R4, r5: R5, r6: R6, r7: R7);
fan_in!(8, and8, and8_async; r1: R1, r2: R2, r3: R3, r4: R4, r5: R5, r6: R6, r7: R7, r8: R8);
fan_in!(9, and9, and9_async; r1: R1, r2: R2, r3: R3, r4: R4, r5: R5, r6: R6, r7: R7, r8: R8, r9: R9);
