//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Fetch document → Apply → Launch broker → Control loop
//!
//! Control loop (startup.rs):
//!     New model        → Apply (broker keeps running unless restart policy)
//!     SIGHUP           → Re-fetch document → Apply
//!     Broker exit      → Agent returns; host process terminates
//!     SIGTERM/SIGINT   → Stop broker → Wait for exit → Agent returns
//! ```
//!
//! # Design Decisions
//! - Fail fast: a failed initial launch is fatal
//! - Failed updates are logged; fatal ones (undecodable TLS) stop the agent
//! - Restart policy lives here, never in the supervisor

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::spawn_signal_handler;
pub use startup::{Agent, AgentError, AgentExit};
