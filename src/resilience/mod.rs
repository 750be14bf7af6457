//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Reading the configuration document:
//!     → attempt
//!     → On failure: backoff.rs (exponential delay with jitter)
//!     → retry until the attempt budget is spent
//! ```
//!
//! # Design Decisions
//! - Bounded attempts; the last error is returned to the caller
//! - Jitter keeps a fleet of edge agents from retrying in lockstep

pub mod backoff;

pub use backoff::{calculate_backoff, RetryPolicy};
