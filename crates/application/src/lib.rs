//! Docforge Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the documentation backend
//! - The template store, editor and test coordinator
//! - Session and usage state
//! - Application-level error handling

pub mod analytics;
pub mod coordinator;
pub mod editor;
pub mod error;
pub mod ports;
pub mod session;
pub mod state;
pub mod store;
pub mod use_cases;

pub use analytics::AnalyticsTracker;
pub use coordinator::TestCoordinator;
pub use editor::TemplateEditor;
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    AnalyticsApi, BackendError, BackendResult, Clock, DocumentSource, EndpointTester, SessionApi,
    TemplateSource,
};
pub use session::SessionManager;
pub use state::AppState;
pub use store::{OutcomeRecord, TemplateStore};
pub use use_cases::{LoadTemplates, SourceSubmission, SubmitSource, SubmitSourceOutput};
