//! Observation and interop methods for [`Outcome`]
//!
//! `Outcome<T>` is a plain `std::result::Result`, so `Ok`, `Err`, `?`,
//! `map` and `and_then` work as usual. [`OutcomeExt`] adds the pieces std
//! does not have: side-effect observers that hand the outcome back
//! unchanged, total accessors and a conventional `(value, error)` split.
//! Error presence checks (`error_or_none`, `is_error`) live on
//! [`ErrorCapability`](crate::ErrorCapability).

use crate::error::{Outcome, OutcomeError};

/// Extension trait for [`Outcome`].
pub trait OutcomeExt<T>: Sized {
    /// Runs `on_ok` with the value if this is a success, then returns `self`.
    fn if_ok<F>(self, on_ok: F) -> Self
    where
        F: FnOnce(&T);

    /// Runs `on_error` with the error if this is a failure, then returns `self`.
    fn if_error<F>(self, on_error: F) -> Self
    where
        F: FnOnce(&OutcomeError);

    /// Runs exactly one of the callbacks depending on the variant, then returns `self`.
    fn flat<F, G>(self, on_ok: F, on_error: G) -> Self
    where
        F: FnOnce(&T),
        G: FnOnce(&OutcomeError);

    /// Returns the held value, or `default` on failure.
    fn get_or_default(self, default: T) -> T;

    /// Returns a reference to the held value, or `None` on failure.
    fn get_or_none(&self) -> Option<&T>;

    /// Splits into a conventional `(value, error)` pair.
    ///
    /// On failure the value slot holds `T::default()`.
    fn into_parts(self) -> (T, Option<OutcomeError>)
    where
        T: Default;
}

impl<T> OutcomeExt<T> for Outcome<T> {
    fn if_ok<F>(self, on_ok: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Ok(value) = &self {
            on_ok(value);
        }
        self
    }

    fn if_error<F>(self, on_error: F) -> Self
    where
        F: FnOnce(&OutcomeError),
    {
        if let Err(error) = &self {
            on_error(error);
        }
        self
    }

    fn flat<F, G>(self, on_ok: F, on_error: G) -> Self
    where
        F: FnOnce(&T),
        G: FnOnce(&OutcomeError),
    {
        match &self {
            Ok(value) => on_ok(value),
            Err(error) => on_error(error),
        }
        self
    }

    fn get_or_default(self, default: T) -> T {
        self.unwrap_or(default)
    }

    fn get_or_none(&self) -> Option<&T> {
        self.as_ref().ok()
    }

    fn into_parts(self) -> (T, Option<OutcomeError>)
    where
        T: Default,
    {
        match self {
            Ok(value) => (value, None),
            Err(error) => (T::default(), Some(error)),
        }
    }
}
