//! Error types for outcome operations
//!
//! Two failure categories flow through the combinators:
//!
//! - **Domain errors** are produced by collaborator code (I/O, parsing,
//!   formatting). The combinators never inspect them, they only test for
//!   presence.
//! - **Internal signals** are produced by the combinators themselves: a race
//!   with no matching candidate, an exhausted source, a producer task that
//!   panicked, or an invalid argument.
//!
//! `OutcomeError` is `Clone` because a resolved [`Deferred`](crate::Deferred)
//! hands the same cached failure to every observer. Domain sources are kept
//! behind an `Arc` for that reason.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Result type used by every combinator in this crate.
pub type Outcome<T> = Result<T, OutcomeError>;

/// Which outcome variant a racing combinator was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// A success.
    Ok,
    /// A failure.
    Error,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("success"),
            Self::Error => f.write_str("failure"),
        }
    }
}

/// Failure category of an [`OutcomeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Opaque error produced by collaborator code.
    Domain,
    /// Signal produced by the combinators themselves.
    Internal,
}

/// Errors carried by the failure side of an [`Outcome`].
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum OutcomeError {
    /// Opaque collaborator error.
    #[error(transparent)]
    Domain(Arc<dyn StdError + Send + Sync + 'static>),

    /// Plain-text collaborator error.
    #[error("{message}")]
    Message {
        /// Error message
        message: String,
    },

    /// No racing candidate completed with the expected variant.
    #[error("no {expected} among the raced outcomes")]
    NotFound {
        /// Variant the race was looking for
        expected: Variant,
    },

    /// A source was closed and no fallback was supplied.
    #[error("source exhausted")]
    SourceExhausted,

    /// A producer task panicked or was aborted before delivering a value.
    #[error("deferred task failed: {reason}")]
    TaskFailed {
        /// Panic message or abort reason
        reason: String,
    },

    /// Invalid argument or configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Configuration error details
        message: String,
    },
}

impl OutcomeError {
    /// Wraps a collaborator error.
    pub fn domain<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Domain(Arc::new(error))
    }

    /// Creates a plain-text collaborator error.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// Creates an invalid-configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::Message { .. } => ErrorKind::Domain,
            Self::NotFound { .. }
            | Self::SourceExhausted
            | Self::TaskFailed { .. }
            | Self::InvalidConfig { .. } => ErrorKind::Internal,
        }
    }

    /// True for collaborator errors.
    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }

    /// True when a race found no matching candidate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when a source closed without a fallback.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::SourceExhausted)
    }

    /// True when a producer task failed to deliver.
    pub fn is_task_failure(&self) -> bool {
        matches!(self, Self::TaskFailed { .. })
    }

    /// Tests whether two errors denote the same failure.
    ///
    /// Domain errors compare by identity of the shared source, everything
    /// else structurally. This is what "the identical cached outcome" means
    /// for observers of one [`Deferred`](crate::Deferred).
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Domain(a), Self::Domain(b)) => Arc::ptr_eq(a, b),
            (Self::Message { message: a }, Self::Message { message: b }) => a == b,
            (Self::NotFound { expected: a }, Self::NotFound { expected: b }) => a == b,
            (Self::SourceExhausted, Self::SourceExhausted) => true,
            (Self::TaskFailed { reason: a }, Self::TaskFailed { reason: b }) => a == b,
            (Self::InvalidConfig { message: a }, Self::InvalidConfig { message: b }) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for OutcomeError {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl From<std::io::Error> for OutcomeError {
    fn from(error: std::io::Error) -> Self {
        Self::domain(error)
    }
}

impl From<fmt::Error> for OutcomeError {
    fn from(error: fmt::Error) -> Self {
        Self::domain(error)
    }
}

impl From<String> for OutcomeError {
    fn from(message: String) -> Self {
        Self::Message { message }
    }
}

impl From<&str> for OutcomeError {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<tokio::task::JoinError> for OutcomeError {
    fn from(error: tokio::task::JoinError) -> Self {
        let reason = if error.is_panic() {
            let payload = error.into_panic();
            payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "producer panicked".to_string())
        } else {
            "producer task was cancelled".to_string()
        };
        Self::TaskFailed { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_partitions_variants() {
        assert_eq!(OutcomeError::msg("boom").kind(), ErrorKind::Domain);
        assert_eq!(
            OutcomeError::from(std::io::Error::other("disk")).kind(),
            ErrorKind::Domain
        );
        assert_eq!(
            OutcomeError::NotFound {
                expected: Variant::Ok
            }
            .kind(),
            ErrorKind::Internal
        );
        assert_eq!(OutcomeError::SourceExhausted.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_domain_equality_is_identity() {
        let a = OutcomeError::domain(std::io::Error::other("disk"));
        let b = OutcomeError::domain(std::io::Error::other("disk"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let err = OutcomeError::NotFound {
            expected: Variant::Error,
        };
        assert_eq!(err.to_string(), "no failure among the raced outcomes");
        assert_eq!(OutcomeError::msg("bad input").to_string(), "bad input");
        assert_eq!(
            OutcomeError::from(std::io::Error::other("disk full")).to_string(),
            "disk full"
        );
    }

    #[test]
    fn test_join_error_becomes_task_failure() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let err = rt.block_on(async {
            tokio::spawn(async { panic!("producer blew up") })
                .await
                .unwrap_err()
        });
        let err = OutcomeError::from(err);
        assert!(err.is_task_failure());
        assert_eq!(err.to_string(), "deferred task failed: producer blew up");
    }
}
