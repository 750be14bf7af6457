//! Configuration document source.
//!
//! Stands in for the controller's control channel: the model is read from
//! a JSON document on disk, and changes to that document are the update
//! notifications.
//!
//! # Data Flow
//! ```text
//! startup:   source.rs fetch (bounded retries with backoff) → initial model
//! runtime:   watcher.rs detects change
//!                → model::read_document (parse & validate)
//!                → mpsc channel → owning control loop
//! ```
//!
//! # Design Decisions
//! - A document that fails to parse is logged and skipped; the broker keeps
//!   its last applied configuration
//! - Every change yields a full model; there is no incremental update

pub mod source;
pub mod watcher;

pub use source::DocumentSource;
pub use watcher::DocumentWatcher;
