//! Chain node integration subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkConfig (rpc url, chain id, explorer)
//!     → client.rs (JSON-RPC with timeouts + error classification)
//!     → fees.rs (EIP-1559 fee quoting)
//!     → erc20.rs (token reads + calldata)
//!     → units.rs (human ↔ base-unit scaling)
//! ```

pub mod client;
pub mod erc20;
pub mod fees;
pub mod units;

pub use client::ChainClient;
pub use fees::FeeQuote;
