//! Per-session application state
//!
//! Everything that lives from sign-in to sign-out: the session mirror and
//! the usage counters. Created once and handed to whoever needs it.

use std::sync::Arc;

use docforge_domain::{AuthSession, Feature};

use crate::analytics::AnalyticsTracker;
use crate::error::ApplicationResult;
use crate::ports::{AnalyticsApi, DocumentSource, SessionApi, TemplateSource};
use crate::session::SessionManager;
use crate::use_cases::{SourceSubmission, SubmitSource, SubmitSourceOutput};

/// Session and analytics state backed by one backend client.
pub struct AppState<B: SessionApi + AnalyticsApi> {
    session: SessionManager<B>,
    analytics: AnalyticsTracker<B>,
}

impl<B: SessionApi + AnalyticsApi> AppState<B> {
    /// Creates the state; nothing is fetched until [`Self::start`].
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            session: SessionManager::new(Arc::clone(&backend)),
            analytics: AnalyticsTracker::new(backend),
        }
    }

    /// Checks the session and loads the usage counters.
    pub async fn start(&self) -> AuthSession {
        let session = self.session.refresh().await;
        self.analytics.load(session.user()).await;
        session
    }

    /// The session mirror.
    pub const fn session(&self) -> &SessionManager<B> {
        &self.session
    }

    /// The usage counters.
    pub const fn analytics(&self) -> &AnalyticsTracker<B> {
        &self.analytics
    }

    /// Records a feature use on behalf of whoever is signed in.
    pub async fn track(&self, feature: Feature) {
        let session = self.session.current();
        self.analytics.track(feature, session.user()).await;
    }

    /// Records a page visit on behalf of whoever is signed in.
    pub async fn track_navigation(&self, path: &str) {
        let session = self.session.current();
        self.analytics.track_navigation(path, session.user()).await;
    }

    /// Submits a source and, once the backend accepts it, counts a use of
    /// that kind of source.
    ///
    /// # Errors
    /// Returns whatever the submission fails with; nothing is counted then.
    pub async fn submit_source<D: DocumentSource + TemplateSource>(
        &self,
        use_case: &SubmitSource<D>,
        submission: &SourceSubmission,
    ) -> ApplicationResult<SubmitSourceOutput> {
        let output = use_case.execute(submission).await?;
        self.track(submission.kind().feature()).await;
        Ok(output)
    }

    /// Signs out and forgets the user's counters.
    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.analytics.clear_user();
    }
}
