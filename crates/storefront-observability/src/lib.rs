//! Observability for the storefront client.
//!
//! This crate provides:
//! - `LoggingConfig` - Level and output format
//! - `init_logging` - Installs a `tracing` subscriber

mod logging;

pub use logging::*;
