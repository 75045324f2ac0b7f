//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via the orchestrator context
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets come from the environment only, never from the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{
    AggregatorConfig, AppConfig, CustodyConfig, LaunchpadConfig, ListenerConfig, NetworkConfig,
    PipelineConfig, TokenLookupConfig,
};
