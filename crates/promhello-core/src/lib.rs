//! promhello core: the metrics registry, its text exposition, and the error
//! surface shared with the server crate.
//!
//! Carries no transport or runtime dependencies.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here. Registration
//! errors surface as `PromHelloError`; the increment and render paths are
//! infallible.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{Result, PromHelloError};
