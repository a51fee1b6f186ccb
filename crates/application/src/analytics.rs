//! Feature usage tracking with a local cache of the counters.

use std::sync::Arc;

use docforge_domain::{Feature, FeatureCounts, GlobalStats, UsageEvent, User};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::ports::AnalyticsApi;

/// Reports feature usage and keeps the last known counters.
///
/// Tracking is best effort: failed calls are logged and the cached
/// counters are still incremented.
pub struct AnalyticsTracker<A: AnalyticsApi> {
    api: Arc<A>,
    global: RwLock<GlobalStats>,
    user: RwLock<FeatureCounts>,
}

impl<A: AnalyticsApi> AnalyticsTracker<A> {
    /// Creates a tracker with zeroed counters.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            global: RwLock::default(),
            user: RwLock::default(),
        }
    }

    /// Cached usage across all users.
    pub fn global(&self) -> GlobalStats {
        *self.global.read()
    }

    /// Cached usage of the signed-in user.
    pub fn user(&self) -> FeatureCounts {
        *self.user.read()
    }

    /// Refreshes the cache. Counters that fail to load keep their values.
    pub async fn load(&self, user: Option<&User>) {
        match self.api.global_stats().await {
            Ok(stats) => *self.global.write() = stats,
            Err(error) => warn!(%error, "failed to load global usage"),
        }
        if let Some(user) = user {
            match self.api.user_stats(&user.id).await {
                Ok(counts) => *self.user.write() = counts,
                Err(error) => warn!(%error, user_id = %user.id, "failed to load user usage"),
            }
        }
    }

    /// Records one use of a feature.
    pub async fn track(&self, feature: Feature, user: Option<&User>) {
        let event = UsageEvent {
            feature,
            user_id: user.map(|u| u.id.clone()),
        };
        if let Err(error) = self.api.track(&event).await {
            warn!(%error, %feature, "failed to track usage");
        }

        self.global.write().feature_usage.increment(feature);
        if user.is_some() {
            self.user.write().increment(feature);
        }
    }

    /// Records a use when `path` is one of the feature pages.
    pub async fn track_navigation(&self, path: &str, user: Option<&User>) {
        match Feature::from_path(path) {
            Some(feature) => self.track(feature, user).await,
            None => debug!(path, "navigation not tracked"),
        }
    }

    /// Zeroes the per-user counters.
    pub fn clear_user(&self) {
        *self.user.write() = FeatureCounts::default();
    }
}
