//! HTTP control surface.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → server.rs (router, middleware, request ID)
//!     → handlers.rs (parameter validation via serde)
//!     → pipeline operation (one per intent)
//!     → {"result": ...} or {"error": true, "detail": ...}
//! ```
//!
//! The surface maps requests 1:1 onto pipeline operations and adds no
//! business logic of its own.

pub mod handlers;
pub mod server;

pub use server::HttpServer;
