//! Docforge Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings and logging setup.

pub mod adapters;
pub mod settings;
pub mod telemetry;

pub use adapters::{HttpBackend, SystemClock};
pub use settings::{ConfigError, DEFAULT_BACKEND_URL, Settings};
pub use telemetry::init_tracing;
