//! Load templates use case.

use std::sync::Arc;

use tracing::info;

use crate::error::ApplicationResult;
use crate::ports::TemplateSource;
use crate::store::TemplateStore;

/// Fetches a project's templates and makes them the store's template set.
pub struct LoadTemplates<S: TemplateSource> {
    source: Arc<S>,
    store: Arc<TemplateStore>,
}

impl<S: TemplateSource> LoadTemplates<S> {
    /// Creates a new `LoadTemplates` use case.
    #[must_use]
    pub const fn new(source: Arc<S>, store: Arc<TemplateStore>) -> Self {
        Self { source, store }
    }

    /// Replaces the stored templates with those of `project_id`.
    ///
    /// Returns how many templates were loaded. On error the store keeps
    /// its previous contents.
    ///
    /// # Errors
    /// Returns [`crate::ApplicationError::Backend`] if the fetch fails.
    pub async fn execute(&self, project_id: &str) -> ApplicationResult<usize> {
        let templates = self.source.fetch_templates(project_id).await?;
        self.store.load(templates);
        let loaded = self.store.len();
        info!(project_id, loaded, "templates loaded");
        Ok(loaded)
    }
}
