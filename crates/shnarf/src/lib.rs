//! Shnarf computation for the blob compression proof coordinator.
//!
//! A shnarf is a rolling commitment chaining each blob to its predecessor. The
//! [`BlobShnarfCalculator`] computes the shnarf of a single blob given its parent shnarf, while the
//! [`RollingBlobShnarfCalculator`] threads the chain state from one blob to the next.

mod calculator;
pub use calculator::BlobShnarfCalculator;

mod error;
pub use error::ShnarfCalculatorError;

mod hash;
pub use hash::{compute_evaluation_point, compute_shnarf};

mod rolling;
pub use rolling::{RollingBlobShnarfCalculator, ShnarfInput};

/// Mock implementations for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
