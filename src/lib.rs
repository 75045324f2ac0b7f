//! Remote-signed blockchain transaction orchestration.
//!
//! Given a high-level intent (transfer, swap, approve, launch a token, sell
//! into a bonding curve), this crate resolves the acting wallet's address
//! from an external custody identifier, builds an unsigned EIP-1559
//! transaction, delegates signing to the remote custody service, broadcasts
//! the result, and interprets the receipt into a caller-facing outcome.

pub mod aggregator;
pub mod canonical;
pub mod chain;
pub mod config;
pub mod custody;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod tokens;

pub use config::AppConfig;
pub use error::{PipelineError, PipelineResult};
pub use http::HttpServer;
pub use pipeline::Orchestrator;
