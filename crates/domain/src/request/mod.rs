//! Concrete request descriptors sent to the backend's test endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::template::{EndpointTemplate, HttpMethod, TemplateHeaders};

/// The request the backend executes on the user's behalf.
///
/// Serializes to the `/test-endpoint` payload
/// `{"method", "url", "headers", "body"}` with `body: null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Fully compiled URL
    pub url: String,
    /// Headers to send
    #[serde(default)]
    pub headers: TemplateHeaders,
    /// Body value, JSON or text
    #[serde(default)]
    pub body: Option<Value>,
}

impl TestRequest {
    /// Builds a descriptor that sends a template unchanged.
    ///
    /// Textual bodies are parsed as JSON when possible and otherwise sent as
    /// the original string.
    #[must_use]
    pub fn direct(template: &EndpointTemplate) -> Self {
        Self {
            method: template.method,
            url: template.url.clone(),
            headers: template.headers.clone(),
            body: template.body.clone().normalized().to_json(),
        }
    }

    /// Builds a descriptor with an already compiled URL.
    #[must_use]
    pub fn with_url(template: &EndpointTemplate, url: String) -> Self {
        Self {
            url,
            ..Self::direct(template)
        }
    }
}
