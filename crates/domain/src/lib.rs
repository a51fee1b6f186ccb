//! Docforge Domain - Core types
//!
//! This crate defines the domain model for the Docforge template explorer:
//! generated endpoint templates, the rules for turning them into concrete
//! test requests, and the records those tests produce.
//! All types here are pure Rust with no I/O dependencies.

pub mod analytics;
pub mod compiler;
pub mod error;
pub mod outcome;
pub mod request;
pub mod session;
pub mod source;
pub mod template;

pub use analytics::{Feature, FeatureCounts, GlobalStats, UsageEvent};
pub use compiler::{compile_url, unresolved_placeholders};
pub use error::{DomainError, DomainResult};
pub use outcome::{FailureKind, StatusClass, TestFailure, TestOutcome, TestSuccess};
pub use request::TestRequest;
pub use session::{AuthSession, User};
pub use source::{
    CurlSource, DocumentFormat, GeneratedDocument, MAX_ZIP_BYTES, OpenApiUrlSource, SourceKind,
    UploadReceipt,
};
pub use template::{
    EndpointTemplate, HttpMethod, ParameterLocation, ParameterSpec, ParameterValues, TemplateBody,
    TemplateEdit, TemplateHeader, TemplateHeaders, to_display_text, to_wire_value,
};
