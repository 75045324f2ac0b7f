//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Provide structured log macros
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via environment (`RUST_LOG`)
//! - Signing material and credentials are never logged
