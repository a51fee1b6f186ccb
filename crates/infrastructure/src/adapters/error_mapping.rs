//! Maps backend failures to the messages shown to users.

use docforge_application::BackendError;
use serde_json::Value;
use tracing::info;

/// Which kind of backend call failed. Some calls word their errors
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    /// Any ordinary API call
    Api,
    /// The endpoint test relay
    Test,
    /// Backend ZIP upload
    ZipUpload,
    /// GitHub repository analysis
    RepoClone,
}

impl CallKind {
    const fn timeout_message(self) -> &'static str {
        match self {
            Self::Api => "Request timeout. The operation took too long to complete.",
            Self::Test => "Test timeout. The request took too long to complete.",
            Self::ZipUpload => {
                "Upload timeout. The file might be too large or processing is taking too long."
            }
            Self::RepoClone => {
                "Repository cloning timeout. The repository might be too large or network is slow."
            }
        }
    }
}

/// Classifies a transport error: timeouts, connection failures, the rest.
pub(crate) fn transport_error(error: &reqwest::Error, call: CallKind) -> BackendError {
    if error.is_timeout() {
        return BackendError::Timeout(call.timeout_message().to_string());
    }
    if error.is_connect() {
        return BackendError::Connection(format!("Cannot connect to backend: {error}"));
    }
    if error.is_decode() {
        return BackendError::Decode(format!("Invalid response from backend: {error}"));
    }
    BackendError::Other(error.to_string())
}

/// Builds the error for a non-success status from the response body.
pub(crate) fn status_error(status: u16, body: &str, call: CallKind) -> BackendError {
    let detail = detail_message(body);
    let message = match call {
        CallKind::Test => test_status_message(status, detail),
        CallKind::Api | CallKind::ZipUpload | CallKind::RepoClone => {
            api_status_message(status, detail)
        }
    };
    BackendError::Status { status, message }
}

fn api_status_message(status: u16, detail: Option<String>) -> String {
    if status == 401 {
        info!("Authentication required");
    }
    match status {
        403 => detail.unwrap_or_else(|| "Access forbidden".to_string()),
        404 => detail.unwrap_or_else(|| "Resource not found".to_string()),
        408 => CallKind::Api.timeout_message().to_string(),
        413 => detail.unwrap_or_else(|| "File too large".to_string()),
        500..=u16::MAX => "Server error. Please try again later.".to_string(),
        _ => detail.unwrap_or_else(|| format!("Request failed with status code {status}")),
    }
}

fn test_status_message(status: u16, detail: Option<String>) -> String {
    match status {
        408 => "Request timeout. The target server took too long to respond.".to_string(),
        503 => detail.unwrap_or_else(|| {
            "Cannot connect to target server. Make sure it's running and accessible.".to_string()
        }),
        500 => detail.unwrap_or_else(|| "Server error during test execution.".to_string()),
        _ => api_status_message(status, detail),
    }
}

/// Extracts the backend's `detail` from an error body.
///
/// A string is used as-is. A validation error list
/// (`[{"loc": [...], "msg": ...}]`) becomes one `loc.path: msg` line per
/// entry.
pub(crate) fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let lines: Vec<String> = items.iter().filter_map(validation_line).collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }
        _ => None,
    }
}

fn validation_line(item: &Value) -> Option<String> {
    let msg = item.get("msg")?.as_str()?;
    let loc = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();
    Some(if loc.is_empty() {
        msg.to_string()
    } else {
        format!("{loc}: {msg}")
    })
}
