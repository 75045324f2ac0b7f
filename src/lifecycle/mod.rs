//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build orchestrator context → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Poller (poller.rs):
//!     start → periodic tick until stop signal → cancelled cleanly
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then clients, then the listener
//! - The background loop is a cancellable task with an explicit stop
//!   channel, never a boolean flag in a busy loop

pub mod poller;
pub mod shutdown;

pub use poller::Poller;
pub use shutdown::Shutdown;
