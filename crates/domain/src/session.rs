//! Signed-in user session as mirrored from the backend

use serde::{Deserialize, Deserializer, Serialize};

/// The user the backend session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// E-mail address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected user id, found {other}"
        ))),
    }
}

/// What the client currently knows about the backend session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthSession {
    /// Not checked yet.
    #[default]
    Unknown,
    /// Checked, nobody is signed in.
    Anonymous,
    /// Signed in.
    Authenticated(User),
}

impl AuthSession {
    /// Returns the signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unknown | Self::Anonymous => None,
        }
    }

    /// Returns true if a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
