//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod backend;
mod clock;

pub use backend::{
    AnalyticsApi, BackendError, BackendResult, DocumentSource, EndpointTester, SessionApi,
    TemplateSource,
};
pub use clock::Clock;
