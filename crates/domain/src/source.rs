//! API descriptions submitted to the backend for documentation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::analytics::Feature;
use crate::error::{DomainError, DomainResult};

/// Largest backend ZIP the client will upload (100 MiB).
pub const MAX_ZIP_BYTES: u64 = 100 * 1024 * 1024;

/// Output format of documentation generated from source code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// OpenAPI as JSON
    #[default]
    Json,
    /// OpenAPI as YAML
    Yaml,
}

impl DocumentFormat {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(DomainError::InvalidIdentifier(format!(
                "unknown document format: {other}"
            ))),
        }
    }
}

/// Payload for registering an OpenAPI document by URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenApiUrlSource {
    /// Where the backend downloads the document from
    pub openapi_url: String,
    /// Base URL the generated templates call
    pub base_url: String,
}

/// Payload for registering a cURL command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurlSource {
    /// The command as pasted
    pub curl: String,
}

/// Backend acknowledgement of an OpenAPI or cURL upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Project whose templates can now be fetched
    #[serde(default, deserialize_with = "optional_id")]
    pub project_id: Option<String>,
    /// Everything else the backend returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Documentation generated from source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    /// The document text
    pub content: String,
    /// Its format
    pub format: DocumentFormat,
}

/// The kinds of API description a user can submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// OpenAPI document by URL or file
    OpenApi,
    /// cURL command
    Curl,
    /// Backend source ZIP
    BackendZip,
    /// GitHub repository
    GithubRepo,
}

impl SourceKind {
    /// The analytics feature recorded when this source is used.
    #[must_use]
    pub const fn feature(&self) -> Feature {
        match self {
            Self::OpenApi => Feature::OpenApiJson,
            Self::Curl => Feature::Curl,
            Self::BackendZip => Feature::BackendZip,
            Self::GithubRepo => Feature::GithubRepo,
        }
    }
}
