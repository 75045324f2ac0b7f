//! Transaction orchestration pipeline.
//!
//! # Data Flow
//! ```text
//! intent (transfer / swap / approve / create / sell)
//!     → ops.rs (operation entry points, balance preconditions)
//!     → custody resolver (from address)
//!     → builder.rs (nonce, fees, gas, calldata → UnsignedTx)
//!     → approval.rs (allowance gating for swaps and sales)
//!     → custody signer (raw signed bytes)
//!     → broadcast.rs (submit, confirm, interpret logs)
//! ```
//!
//! # Concurrency
//! One sequential flow per invocation, no internal parallelism, no shared
//! mutable state. Nonce serialization across concurrent invocations for the
//! same wallet is the caller's responsibility.

pub mod approval;
pub mod broadcast;
pub mod builder;
pub mod launchpad;
pub mod ops;
pub mod outcome;
pub mod tx;

pub use ops::Orchestrator;
pub use tx::UnsignedTx;
