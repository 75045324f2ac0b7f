//! Custody service integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variables (app id, app secret, authorization key)
//!     → types.rs (credential loading, wire types)
//!     → auth.rs (canonical-JSON + ECDSA P-256 request signature)
//!     → resolver.rs (wallet id → on-chain address)
//!     → signer.rs (eth_signTransaction → raw signed bytes)
//! ```
//!
//! # Security Constraints
//! - Private keys never leave the custody service; this crate only signs
//!   request envelopes, not transactions
//! - Credentials are read from the environment per call and never logged

pub mod auth;
pub mod resolver;
pub mod signer;
pub mod types;

pub use resolver::WalletResolver;
pub use signer::RemoteSigner;
pub use types::WalletId;
