//! Backend API ports
//!
//! Every non-trivial computation happens in the remote backend. These
//! traits are the only way the application layer reaches it.

use std::path::Path;

use async_trait::async_trait;
use docforge_domain::{
    CurlSource, DocumentFormat, EndpointTemplate, FailureKind, FeatureCounts, GeneratedDocument,
    GlobalStats, OpenApiUrlSource, TestRequest, TestSuccess, UploadReceipt, UsageEvent, User,
};
use serde_json::Value;

/// Errors returned by backend adapters.
///
/// Each variant carries the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The call did not complete in time.
    #[error("{0}")]
    Timeout(String),

    /// The backend could not be reached.
    #[error("{0}")]
    Connection(String),

    /// The backend answered with an error status.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The backend's `detail`, or a generic message for the status
        message: String,
    },

    /// The backend's answer could not be decoded.
    #[error("{0}")]
    Decode(String),

    /// The input was rejected before anything was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// A local file could not be read.
    #[error("{0}")]
    Io(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl BackendError {
    /// Maps this error to the failure category shown with a test outcome.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout(_) => FailureKind::Timeout,
            Self::Status { status: 408, .. } => FailureKind::Timeout,
            Self::Connection(_) | Self::Status { status: 503, .. } => FailureKind::ConnectionFailed,
            Self::Status { .. } => FailureKind::Upstream,
            Self::Decode(_) => FailureKind::InvalidResponse,
            Self::InvalidInput(_) | Self::Io(_) | Self::Other(_) => FailureKind::Unknown,
        }
    }

    /// Returns the HTTP status if the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Port for retrieving generated templates.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Fetches all templates generated for a project.
    ///
    /// # Errors
    /// Returns an error if the backend call fails or the payload is malformed.
    async fn fetch_templates(&self, project_id: &str) -> BackendResult<Vec<EndpointTemplate>>;
}

/// Port for the backend's endpoint test relay.
#[async_trait]
pub trait EndpointTester: Send + Sync {
    /// Asks the backend to execute a request and relay the response.
    ///
    /// # Errors
    /// Returns an error on transport failure, timeout or an error status.
    async fn test_endpoint(&self, request: &TestRequest) -> BackendResult<TestSuccess>;
}

/// Port for usage analytics.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Records one use of a feature.
    ///
    /// # Errors
    /// Returns an error if the call fails; callers are expected to ignore it.
    async fn track(&self, event: &UsageEvent) -> BackendResult<()>;

    /// Fetches usage across all users.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    async fn global_stats(&self) -> BackendResult<GlobalStats>;

    /// Fetches usage of one user.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    async fn user_stats(&self, user_id: &str) -> BackendResult<FeatureCounts>;
}

/// Port for the backend session.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Returns the signed-in user.
    ///
    /// The session cookie is always sent; `bearer` adds an
    /// `Authorization` header for the first check after an OAuth redirect.
    ///
    /// # Errors
    /// Returns an error when nobody is signed in or the call fails.
    async fn current_user(&self, bearer: Option<&str>) -> BackendResult<User>;

    /// Ends the backend session.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    async fn logout(&self) -> BackendResult<()>;

    /// URL the browser is sent to for signing in.
    fn login_url(&self) -> String;
}

/// Port for submitting API descriptions.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Registers an OpenAPI document by URL.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the document.
    async fn upload_openapi_url(&self, source: &OpenApiUrlSource) -> BackendResult<UploadReceipt>;

    /// Uploads an OpenAPI JSON/YAML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the backend rejects it.
    async fn upload_openapi_file(
        &self,
        path: &Path,
        base_url: Option<&str>,
    ) -> BackendResult<UploadReceipt>;

    /// Registers a cURL command.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the command.
    async fn upload_curl(&self, source: &CurlSource) -> BackendResult<UploadReceipt>;

    /// Uploads a backend source ZIP and returns the generated document.
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidInput`] for files that are not `.zip`
    /// or exceed the size limit, or an error if the backend fails.
    async fn upload_backend_zip(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> BackendResult<GeneratedDocument>;

    /// Analyzes a GitHub repository and returns the generated document.
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidInput`] for an empty URL, or an error
    /// if the backend fails.
    async fn upload_github_repo(
        &self,
        repo_url: &str,
        format: DocumentFormat,
    ) -> BackendResult<GeneratedDocument>;

    /// Returns the backend's limits for code uploads.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    async fn code_limits(&self) -> BackendResult<Value>;

    /// Checks whether the backend can clone a repository URL.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    async fn validate_repo_url(&self, repo_url: &str) -> BackendResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            BackendError::Timeout("slow".into()).kind(),
            FailureKind::Timeout
        );
        assert_eq!(
            BackendError::Connection("refused".into()).kind(),
            FailureKind::ConnectionFailed
        );
        let unreachable_target = BackendError::Status {
            status: 503,
            message: "Cannot connect to target server.".into(),
        };
        assert_eq!(unreachable_target.kind(), FailureKind::ConnectionFailed);
        assert_eq!(unreachable_target.status(), Some(503));
        assert_eq!(
            BackendError::Status {
                status: 422,
                message: "body: field required".into()
            }
            .kind(),
            FailureKind::Upstream
        );
    }

    #[test]
    fn test_message_is_display() {
        let error = BackendError::Status {
            status: 404,
            message: "Project not found".into(),
        };
        assert_eq!(error.to_string(), "Project not found");
    }
}
