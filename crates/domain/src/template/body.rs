//! Template request bodies and the text/structured conversions around them
//!
//! A body that fails to parse as JSON is never an error: it travels as
//! opaque text. [`to_wire_value`] is the single place that decides this.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// Request payload of a template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateBody {
    /// No body.
    #[default]
    Absent,
    /// A parsed JSON value.
    Structured(Value),
    /// Text that is sent exactly as written.
    Raw(String),
}

impl TemplateBody {
    /// Creates a raw text body.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Returns true if this body would be sent with a request.
    ///
    /// Blank text and a structured `null` count as no body.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent | Self::Structured(Value::Null) => false,
            Self::Structured(_) => true,
            Self::Raw(text) => !text.trim().is_empty(),
        }
    }

    /// Parses raw text into a structured value where possible.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Raw(text) => to_wire_value(&text),
            other => other,
        }
    }

    /// The JSON value sent on the wire, or `None` for no body.
    #[must_use]
    pub fn to_json(&self) -> Option<Value> {
        if !self.is_present() {
            return None;
        }
        match self {
            Self::Absent => None,
            Self::Structured(value) => Some(value.clone()),
            Self::Raw(text) => Some(Value::String(text.clone())),
        }
    }
}

/// Renders a body for an editor text area.
///
/// Structured values and JSON-parseable text are pretty printed with a
/// two-space indent; any other text is returned unchanged.
#[must_use]
pub fn to_display_text(body: &TemplateBody) -> String {
    match body {
        TemplateBody::Absent => String::new(),
        TemplateBody::Structured(value) => pretty(value),
        TemplateBody::Raw(text) => serde_json::from_str::<Value>(text)
            .map_or_else(|_| text.clone(), |value| pretty(&value)),
    }
}

/// Converts editor text into the body value to send.
///
/// Valid JSON becomes [`TemplateBody::Structured`]; anything else is kept
/// verbatim as [`TemplateBody::Raw`].
#[must_use]
pub fn to_wire_value(text: &str) -> TemplateBody {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => TemplateBody::Structured(value),
        Err(error) => {
            debug!(%error, len = text.len(), "body is not JSON, sending as text");
            TemplateBody::Raw(text.to_string())
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

impl Serialize for TemplateBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Structured(value) => value.serialize(serializer),
            Self::Raw(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for TemplateBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Self::Absent,
            Value::String(text) => Self::Raw(text),
            other => Self::Structured(other),
        })
    }
}
