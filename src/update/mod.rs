//! Update coordination subsystem.
//!
//! # Data Flow
//! ```text
//! apply(model)
//!     → acquire exclusive lock (FIFO, no timeout)
//!     → tls::TlsProvisioner (decode all, then stage cert files)
//!     → render::Synthesizer (stage accounts.conf, then nats-server.conf)
//!     → writer::StagedWrites::commit (rename all, restore on failure)
//!     → release lock, return first error
//! ```
//!
//! # Design Decisions
//! - One lock guards the whole sequence; updates are fully serialized
//! - The lock travels with the blocking work, so a dropped caller cannot
//!   let a second update interleave with one still writing
//! - A failed update leaves certificates and artifacts as they were
//! - The running broker is not touched; restarts belong to the caller

pub mod coordinator;
pub mod writer;

pub use coordinator::{AppliedUpdate, UpdateCoordinator, UpdateError};
pub use writer::{CommitError, StagedWrites};
