//! Broker process supervision.
//!
//! # Data Flow
//! ```text
//! launch(model)
//!     → UpdateCoordinator::apply (materialize configuration)
//!     → spawn broker: [--name <instance>] -c <config_root>/nats-server.conf
//!     → monitor task owns the child
//!         → child exits (or stop requested → kill)
//!         → exactly one ExitReport on a oneshot channel
//! ```
//!
//! # Design Decisions
//! - No restart and no retry here; the owning loop decides
//! - The exit report is delivered at most once and never dropped silently
//! - Dropping the handle stops the broker

pub mod process;

pub use process::{BrokerCommand, BrokerProcess, ExitReport, ProcessError, Supervisor, SupervisorError};
