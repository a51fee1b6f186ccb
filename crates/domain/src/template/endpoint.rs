//! Endpoint template type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{HttpMethod, ParameterSpec, TemplateBody, TemplateHeaders};
use crate::error::{DomainError, DomainResult};

/// A generated description of one HTTP operation that can be edited and tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireTemplate")]
pub struct EndpointTemplate {
    /// Backend-assigned identifier
    pub id: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request URL, possibly containing `{name}` placeholders
    pub url: String,
    /// Request headers in generation order
    pub headers: TemplateHeaders,
    /// Request body
    pub body: TemplateBody,
    /// Declared path/query parameters
    pub parameters: Vec<ParameterSpec>,
    /// Whether the headers carry placeholder credentials
    pub requires_auth: bool,
    /// Short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Backend shape; the identifier may arrive as `endpoint_id`, `id`, or both.
#[derive(Deserialize)]
struct WireTemplate {
    #[serde(default)]
    endpoint_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    method: HttpMethod,
    url: String,
    #[serde(default)]
    headers: TemplateHeaders,
    #[serde(default)]
    body: TemplateBody,
    #[serde(default)]
    parameters: Option<Vec<ParameterSpec>>,
    #[serde(default)]
    requires_auth: bool,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<WireTemplate> for EndpointTemplate {
    type Error = DomainError;

    fn try_from(wire: WireTemplate) -> DomainResult<Self> {
        let id = wire
            .endpoint_id
            .or(wire.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                DomainError::InvalidIdentifier(format!("template {} {} has no id", wire.method, wire.url))
            })?;

        Ok(Self {
            id,
            method: wire.method,
            url: wire.url,
            headers: wire.headers,
            body: wire.body,
            parameters: wire.parameters.unwrap_or_default(),
            requires_auth: wire.requires_auth,
            summary: wire.summary,
            description: wire.description,
        })
    }
}

/// A single-field change to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateEdit {
    /// Replace the URL.
    Url(String),
    /// Replace the summary.
    Summary(String),
    /// Replace the description.
    Description(String),
    /// Replace the value of an existing header.
    HeaderValue {
        /// Name of the header to change
        name: String,
        /// New value
        value: String,
    },
    /// Replace the body with editor text.
    BodyText(String),
}

impl EndpointTemplate {
    /// Decodes a backend template list one entry at a time.
    ///
    /// Entries that cannot be represented, such as an unsupported method or
    /// a missing id, are logged and skipped so the rest still load.
    #[must_use]
    pub fn decode_list(items: Vec<Value>) -> Vec<Self> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(template) => Some(template),
                Err(error) => {
                    warn!(index, %error, "skipping template");
                    None
                }
            })
            .collect()
    }

    /// Creates a template with no headers, body or parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method,
            url: url.into(),
            headers: TemplateHeaders::new(),
            body: TemplateBody::Absent,
            parameters: Vec::new(),
            requires_auth: false,
            summary: None,
            description: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: TemplateBody) -> Self {
        self.body = body;
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Returns true if the template declares any parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Returns true if a test should compile parameter values into the URL.
    ///
    /// That is the case when parameters are declared and there is no body.
    /// Everything else, including templates with neither, is tested directly.
    #[must_use]
    pub fn uses_parameter_flow(&self) -> bool {
        self.has_parameters() && !self.body.is_present()
    }

    /// Applies one field change, leaving every other field as it was.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownHeader`] when a header edit names a
    /// header the template does not have. Header names are fixed once the
    /// template is generated.
    pub fn apply(&mut self, edit: TemplateEdit) -> DomainResult<()> {
        match edit {
            TemplateEdit::Url(url) => self.url = url,
            TemplateEdit::Summary(summary) => self.summary = Some(summary),
            TemplateEdit::Description(description) => self.description = Some(description),
            TemplateEdit::HeaderValue { name, value } => {
                if !self.headers.set_value(&name, value) {
                    return Err(DomainError::UnknownHeader(name));
                }
            }
            TemplateEdit::BodyText(text) => self.body = TemplateBody::Raw(text),
        }
        Ok(())
    }
}
