//! Error capability - the minimal surface needed for error checks
//!
//! [`proof`] does not care what a value is, only whether it carries an
//! error. Anything implementing [`ErrorCapability`] can take part, which
//! lets heterogeneous values (outcomes of different types, reports, custom
//! status objects) be checked together in argument order.
//!
//! [`Probe`] is the asynchronous counterpart, blanket-implemented for every
//! clonable [`Resolve`] type, and backs [`proof_async`].

use futures::future::BoxFuture;

use crate::deferred::{Deferred, Resolve};
use crate::error::{Outcome, OutcomeError};

/// Values that can report whether they hold an error.
pub trait ErrorCapability {
    /// Returns the held error, or `None`.
    fn error_or_none(&self) -> Option<OutcomeError>;

    /// True if no error is held.
    fn is_ok(&self) -> bool {
        self.error_or_none().is_none()
    }

    /// True if an error is held.
    fn is_error(&self) -> bool {
        !self.is_ok()
    }
}

impl<T> ErrorCapability for Outcome<T> {
    fn error_or_none(&self) -> Option<OutcomeError> {
        self.as_ref().err().cloned()
    }

    fn is_ok(&self) -> bool {
        Result::is_ok(self)
    }
}

impl ErrorCapability for OutcomeError {
    fn error_or_none(&self) -> Option<OutcomeError> {
        Some(self.clone())
    }
}

impl<C> ErrorCapability for Option<C>
where
    C: ErrorCapability,
{
    fn error_or_none(&self) -> Option<OutcomeError> {
        self.as_ref().and_then(ErrorCapability::error_or_none)
    }
}

/// Asynchronous error capability.
pub trait Probe: Send + Sync {
    /// Waits for the value and returns its error, or `None`.
    fn probe(&self) -> BoxFuture<'_, Option<OutcomeError>>;
}

impl<R> Probe for R
where
    R: Resolve + Clone + Sync,
{
    fn probe(&self) -> BoxFuture<'_, Option<OutcomeError>> {
        let value = self.clone();
        Box::pin(async move { value.resolve().await.err() })
    }
}

/// Returns the first error in argument order, or `Ok(())` if none is held.
///
/// # Examples
///
/// ```rust
/// use nebula_outcome::{proof, Outcome, OutcomeError};
///
/// let a: Outcome<u8> = Ok(1);
/// let b: Outcome<String> = Err(OutcomeError::msg("bad name"));
/// let c: Outcome<()> = Err(OutcomeError::msg("later"));
///
/// assert_eq!(proof(&[&a, &b, &c]), Err(OutcomeError::msg("bad name")));
/// assert_eq!(proof(&[&a]), Ok(()));
/// ```
pub fn proof(values: &[&dyn ErrorCapability]) -> Outcome<()> {
    match values.iter().find_map(|value| value.error_or_none()) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// [`proof`] over values that may still be pending, inside a [`Deferred`].
///
/// Values are awaited in argument order; the first error found wins.
pub fn proof_async(values: Vec<Box<dyn Probe>>) -> Deferred<()> {
    Deferred::spawn(async move {
        for value in &values {
            if let Some(error) = value.probe().await {
                return Err(error);
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::defer;
    use std::time::Duration;

    /// Non-outcome value exposing only the capability.
    struct BuildReport {
        failures: Vec<String>,
    }

    impl ErrorCapability for BuildReport {
        fn error_or_none(&self) -> Option<OutcomeError> {
            self.failures.first().map(|f| OutcomeError::msg(f.clone()))
        }
    }

    #[test]
    fn test_exactly_one_predicate_holds() {
        let values: Vec<Outcome<i32>> = vec![Ok(1), Err(OutcomeError::msg("e"))];
        for value in &values {
            assert_ne!(ErrorCapability::is_ok(value), value.is_error());
        }
    }

    #[test]
    fn test_proof_accepts_non_outcome_values() {
        let clean = BuildReport { failures: vec![] };
        let dirty = BuildReport {
            failures: vec!["missing import".into(), "typo".into()],
        };
        let fine: Outcome<u8> = Ok(0);

        assert_eq!(proof(&[&fine, &clean]), Ok(()));
        assert_eq!(
            proof(&[&fine, &clean, &dirty]),
            Err(OutcomeError::msg("missing import"))
        );
    }

    #[test]
    fn test_proof_of_nothing_is_ok() {
        assert_eq!(proof(&[]), Ok(()));
    }

    #[test]
    fn test_optional_capability() {
        let absent: Option<Outcome<u8>> = None;
        let present: Option<Outcome<u8>> = Some(Err(OutcomeError::SourceExhausted));
        assert!(ErrorCapability::is_ok(&absent));
        assert!(present.is_error());
    }

    #[tokio::test]
    async fn test_proof_async_uses_argument_order() {
        let slow_failure = Deferred::spawn(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Outcome::<u8>::Err(OutcomeError::msg("first"))
        });
        let fast_failure: Outcome<String> = Err(OutcomeError::msg("second"));

        let values: Vec<Box<dyn Probe>> = vec![Box::new(slow_failure), Box::new(fast_failure)];
        assert_eq!(proof_async(values).await, Err(OutcomeError::msg("first")));
    }

    #[tokio::test]
    async fn test_proof_async_all_ok() {
        let a = defer(|| Outcome::Ok(1u32));
        let b: Outcome<&'static str> = Ok("b");
        let values: Vec<Box<dyn Probe>> = vec![Box::new(a), Box::new(b)];
        assert_eq!(proof_async(values).await, Ok(()));
    }
}
