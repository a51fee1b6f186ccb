//! Results of testing a template against its live endpoint.
//!
//! The view needs one of two things per template: the response the
//! backend relayed, or a message saying why there is none.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::template::{TemplateBody, to_display_text};

/// The most recently recorded test result for a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestOutcome {
    /// The request could not be executed or relayed.
    Failure(TestFailure),
    /// The backend executed the request and relayed the response.
    Success(TestSuccess),
}

impl TestOutcome {
    /// Creates a failure outcome.
    #[must_use]
    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        Self::Failure(TestFailure::new(kind, error))
    }

    /// Returns true for a relayed response, whatever its status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true if no response was obtained.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Status code of the relayed response, `0` for failures.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Success(success) => success.status_code,
            Self::Failure(failure) => failure.status_code,
        }
    }

    /// The error message for failures.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(failure) => Some(&failure.error),
            Self::Success(_) => None,
        }
    }
}

/// A response relayed by the backend's test endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuccess {
    /// Status returned by the target server
    pub status_code: u16,
    /// Response body, JSON or text
    #[serde(default)]
    pub response_body: Value,
    /// Response headers
    #[serde(default)]
    pub response_headers: Map<String, Value>,
    /// Round trip time measured by the backend, in milliseconds
    #[serde(default, rename = "response_time", skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,
    /// The URL the backend actually called
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
    /// The method the backend actually used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl TestSuccess {
    /// Returns the class of the relayed status for display.
    #[must_use]
    pub const fn status_class(&self) -> StatusClass {
        StatusClass::of(self.status_code)
    }

    /// Response body formatted for display: JSON pretty printed, text as-is.
    #[must_use]
    pub fn display_body(&self) -> String {
        let body = match &self.response_body {
            Value::Null => TemplateBody::Absent,
            Value::String(text) => TemplateBody::Raw(text.clone()),
            other => TemplateBody::Structured(other.clone()),
        };
        to_display_text(&body)
    }
}

/// Display class of an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 4xx and 5xx
    Error,
    /// Anything else
    Other,
}

impl StatusClass {
    /// Classifies a status code.
    #[must_use]
    pub const fn of(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            400..=u16::MAX => Self::Error,
            _ => Self::Other,
        }
    }
}

/// A test that produced no relayed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFailure {
    /// Human-readable message
    pub error: String,
    /// Always `0`
    pub status_code: u16,
    /// Failure category
    #[serde(default)]
    pub kind: FailureKind,
}

impl TestFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status_code: 0,
            kind,
        }
    }
}

/// Categories of test failures for targeted guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The backend or the target server did not answer in time.
    Timeout,
    /// The backend or the target server could not be reached.
    ConnectionFailed,
    /// The backend answered with an error status.
    Upstream,
    /// The backend answered with something that could not be decoded.
    InvalidResponse,
    /// Anything else.
    #[default]
    Unknown,
}

impl FailureKind {
    /// Returns a short title for this failure type.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Timeout => "Request Timeout",
            Self::ConnectionFailed => "Connection Failed",
            Self::Upstream => "Test Failed",
            Self::InvalidResponse => "Invalid Response",
            Self::Unknown => "Unknown Error",
        }
    }

    /// Returns troubleshooting tips for this failure type.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::Timeout => &[
                "The server took too long to respond",
                "This might indicate a slow endpoint or network issues",
            ],
            Self::ConnectionFailed => &[
                "Ensure the target server is running",
                "Check if the URL is correct and includes http:// or https://",
                "Verify the port number if different from standard ports",
                "Check for firewall or network restrictions",
            ],
            Self::Upstream => &["Check the error details returned by the server"],
            Self::InvalidResponse => &["The backend returned an unexpected response"],
            Self::Unknown => &[
                "An unexpected error occurred",
                "Check the error details for more information",
            ],
        }
    }
}
