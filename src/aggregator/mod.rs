//! DEX-aggregator integration subsystem.
//!
//! # Data Flow
//! ```text
//! token pair + raw amount
//!     → client.rs GET /routes (route summary + router address)
//!     → client.rs POST /route/build (HMAC-signed, encoded call data)
//!     → pipeline swap builder (transaction to the router)
//! ```

pub mod client;
pub mod types;

pub use client::AggregatorClient;
pub use types::SwapRoute;
