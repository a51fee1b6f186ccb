//! Declared template parameters and the values a user enters for them

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Where a parameter value is injected into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Substituted into a `{name}` placeholder in the URL path.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a header. Not compiled into the URL.
    Header,
    /// Sent as a cookie. Not compiled into the URL.
    Cookie,
    /// Any other location the backend reports, such as `formData`. Kept
    /// for display and ignored by the compiler.
    #[serde(other)]
    Other,
}

/// One declared parameter of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name, unique within its template.
    pub name: String,
    /// Injection point.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the endpoint requires a value.
    #[serde(default)]
    pub required: bool,
    /// Schema type such as `"integer"` or `"string"`.
    #[serde(
        rename = "schema",
        default = "default_schema_type",
        serialize_with = "serialize_schema",
        deserialize_with = "deserialize_schema"
    )]
    pub schema_type: String,
}

fn default_schema_type() -> String {
    "string".to_string()
}

#[derive(Serialize, Deserialize)]
struct SchemaRef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

#[allow(clippy::ptr_arg)] // serde's serialize_with hands us &String
fn serialize_schema<S: Serializer>(schema_type: &String, serializer: S) -> Result<S::Ok, S::Error> {
    SchemaRef {
        kind: Some(schema_type.clone()),
    }
    .serialize(serializer)
}

fn deserialize_schema<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let schema = Option::<SchemaRef>::deserialize(deserializer)?;
    Ok(schema
        .and_then(|s| s.kind)
        .unwrap_or_else(default_schema_type))
}

impl ParameterSpec {
    /// Creates a parameter with a `string` schema.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: false,
            schema_type: default_schema_type(),
        }
    }

    /// Marks the parameter as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the schema type.
    #[must_use]
    pub fn with_schema_type(mut self, schema_type: impl Into<String>) -> Self {
        self.schema_type = schema_type.into();
        self
    }

    /// The value a fresh input for this parameter starts with.
    ///
    /// Path parameters get a usable sample so a first test can go out
    /// unchanged; query parameters start empty and are skipped until filled.
    #[must_use]
    pub fn sample_value(&self) -> &'static str {
        match self.location {
            ParameterLocation::Path if self.schema_type == "integer" => "1",
            ParameterLocation::Path => "sample_value",
            _ => "",
        }
    }
}

/// Values entered for a template's parameters, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterValues {
    values: IndexMap<String, String>,
}

impl ParameterValues {
    /// Creates an empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one value per declared parameter with its sample value.
    #[must_use]
    pub fn seeded(parameters: &[ParameterSpec]) -> Self {
        parameters
            .iter()
            .map(|p| (p.name.clone(), p.sample_value().to_string()))
            .collect()
    }

    /// Returns the entered value, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Sets the value for a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the non-empty value for a parameter, if one was entered.
    #[must_use]
    pub fn filled(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Names of required parameters that still have no value.
    #[must_use]
    pub fn missing_required<'a>(&self, parameters: &'a [ParameterSpec]) -> Vec<&'a str> {
        parameters
            .iter()
            .filter(|p| p.required && self.filled(&p.name).is_none())
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Returns true if no value has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for ParameterValues {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}
