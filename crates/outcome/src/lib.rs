//! # Nebula Outcome
//!
//! Composable outcomes for concurrent pipelines: a success-or-failure value,
//! a deferred outcome computed by a background task, and combinators that
//! chain, fan in, fan out, race and filter them.
//!
//! ## Features
//!
//! - **Outcome**: `Result<T, OutcomeError>` with observers and total accessors
//! - **Deferred**: eagerly scheduled, observed lazily, resolved exactly once
//! - **Sequential**: bind (`and`) and strict N-ary fan-in (`and2`..`and9`)
//! - **Collections**: `each`, `range`, `join`, `disjoin`, `flat`, `sliced`
//! - **Racing**: `first_ok` and `first_err` in completion order
//! - **Proof**: error checks over anything implementing [`ErrorCapability`]
//! - **Adapters**: `(value, error)` pairs, foreign results and streams
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_outcome::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let files = vec!["a.rs", "b.rs", "c.rs"];
//!
//!     // one task per file, results kept in input order
//!     let sizes = each_async(ok_all(files), |name: &str| Outcome::Ok(name.len()));
//!     let total = and_async(join_async(sizes), |sizes: Vec<usize>| {
//!         Outcome::Ok(sizes.into_iter().sum::<usize>())
//!     });
//!
//!     assert_eq!(total.await, Ok(12));
//! }
//! ```

pub mod adapters;
pub mod capability;
pub mod collection;
pub mod deferred;
pub mod error;
pub mod observability;
pub mod outcome;
pub mod race;
pub mod sequential;

// Public API - core types
pub use capability::{ErrorCapability, Probe, proof, proof_async};
pub use deferred::{Deferred, Resolve, defer, defer_blocking};
pub use error::{ErrorKind, Outcome, OutcomeError, Variant};
pub use outcome::OutcomeExt;

// Public API - combinators
pub use adapters::{
    SharedSource, lift, ok_all, read_chan, read_chan_async, read_chan_or_exhausted,
    shared_source, void, void_all, wrap,
};
pub use collection::{
    disjoin, each, each_async, flat, join, join_async, only_errors, only_oks, range, range_async,
    sliced, sliced_async,
};
pub use race::{first_err, first_err_async, first_ok, first_ok_async};
pub use sequential::{
    and, and_async, and2, and2_async, and3, and3_async, and4, and4_async, and5, and5_async, and6,
    and6_async, and7, and7_async, and8, and8_async, and9, and9_async,
};

// Public API - logging
#[cfg(feature = "subscriber")]
pub use observability::init_logging;
pub use observability::{LogConfig, LogFormat};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::adapters::{lift, ok_all, void, wrap};
    pub use crate::capability::{ErrorCapability, proof, proof_async};
    pub use crate::collection::{
        disjoin, each, each_async, join, join_async, only_errors, only_oks, range, range_async,
        sliced, sliced_async,
    };
    pub use crate::deferred::{Deferred, Resolve, defer};
    pub use crate::error::{Outcome, OutcomeError};
    pub use crate::outcome::OutcomeExt;
    pub use crate::race::{first_err, first_ok};
    pub use crate::sequential::{and, and_async, and2, and2_async, and3, and3_async};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
