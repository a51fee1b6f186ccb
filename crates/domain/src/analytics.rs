//! Feature usage counters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// The documentation sources whose usage is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// OpenAPI JSON/YAML by URL or file
    #[serde(rename = "openapijson")]
    OpenApiJson,
    /// cURL command
    Curl,
    /// Backend source ZIP
    #[serde(rename = "backendzip")]
    BackendZip,
    /// GitHub repository URL
    #[serde(rename = "githubrepo")]
    GithubRepo,
}

impl Feature {
    /// Returns all tracked features.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::OpenApiJson, Self::Curl, Self::BackendZip, Self::GithubRepo]
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenApiJson => "openapijson",
            Self::Curl => "curl",
            Self::BackendZip => "backendzip",
            Self::GithubRepo => "githubrepo",
        }
    }

    /// Maps a navigation path such as `/curl` to its feature.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        path.strip_prefix('/').and_then(|name| name.parse().ok())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| DomainError::UnknownFeature(s.to_string()))
    }
}

/// Usage count per feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    /// OpenAPI uses
    #[serde(default)]
    pub openapijson: u64,
    /// cURL uses
    #[serde(default)]
    pub curl: u64,
    /// ZIP uses
    #[serde(default)]
    pub backendzip: u64,
    /// GitHub uses
    #[serde(default)]
    pub githubrepo: u64,
}

impl FeatureCounts {
    /// Returns the count for a feature.
    #[must_use]
    pub const fn get(&self, feature: Feature) -> u64 {
        match feature {
            Feature::OpenApiJson => self.openapijson,
            Feature::Curl => self.curl,
            Feature::BackendZip => self.backendzip,
            Feature::GithubRepo => self.githubrepo,
        }
    }

    /// Adds one use of a feature.
    pub const fn increment(&mut self, feature: Feature) {
        let slot = match feature {
            Feature::OpenApiJson => &mut self.openapijson,
            Feature::Curl => &mut self.curl,
            Feature::BackendZip => &mut self.backendzip,
            Feature::GithubRepo => &mut self.githubrepo,
        };
        *slot = slot.saturating_add(1);
    }

    /// Sum over all features.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.openapijson + self.curl + self.backendzip + self.githubrepo
    }
}

/// Usage across all users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    /// Registered users
    #[serde(default)]
    pub total_users: u64,
    /// Uses per feature
    #[serde(default)]
    pub feature_usage: FeatureCounts,
}

/// Body of a usage tracking call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// Feature used
    pub feature: Feature,
    /// Signed-in user, `null` for anonymous use
    pub user_id: Option<String>,
}
