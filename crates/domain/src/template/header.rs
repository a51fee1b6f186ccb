//! Template header types

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single template header with name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateHeader {
    /// The header name (e.g., "Authorization")
    pub name: String,
    /// The header value (e.g., "Bearer <token>")
    pub value: String,
}

impl TemplateHeader {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered headers of a template.
///
/// Names are unique and keep the order the backend generated them in.
/// Only values can change after construction; see [`TemplateHeaders::set_value`].
/// On the wire this is a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateHeaders {
    items: Vec<TemplateHeader>,
}

impl TemplateHeaders {
    /// Creates an empty header list.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a header, or overwrites the value when the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.items.iter_mut().find(|h| h.name == name) {
            Some(existing) => existing.value = value,
            None => self.items.push(TemplateHeader { name, value }),
        }
    }

    /// Replaces the value of an existing header.
    ///
    /// Returns `false` and leaves the list untouched when no header has this name.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        self.items
            .iter_mut()
            .find(|h| h.name == name)
            .map(|h| h.value = value.into())
            .is_some()
    }

    /// Looks up a header value by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// Returns true if a header with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|h| h.name == name)
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateHeader> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty is not const in stable
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for TemplateHeaders {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl Serialize for TemplateHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: IndexMap<&str, &str> = self
            .items
            .iter()
            .map(|h| (h.name.as_str(), h.value.as_str()))
            .collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TemplateHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<IndexMap<String, serde_json::Value>>::deserialize(deserializer)?;
        Ok(map
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect())
    }
}
