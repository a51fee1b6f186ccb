//! Infrastructure adapters

mod error_mapping;
mod http_backend;
mod system_clock;

pub use http_backend::HttpBackend;
pub use system_clock::SystemClock;
