//! Template editor
//!
//! Pure state transformation over the [`TemplateStore`]; no network calls.

use std::sync::Arc;

use docforge_domain::{
    DomainError, EndpointTemplate, TemplateEdit, compile_url, to_display_text,
};
use tracing::{debug, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::store::TemplateStore;

/// Edits, saves and resets templates held by a [`TemplateStore`].
#[derive(Debug, Clone)]
pub struct TemplateEditor {
    store: Arc<TemplateStore>,
}

impl TemplateEditor {
    /// Creates an editor over a store.
    #[must_use]
    pub const fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    /// Applies a single-field change to the draft of a template.
    ///
    /// # Errors
    /// - [`ApplicationError::NotFound`] for an unknown id
    /// - [`DomainError::UnknownHeader`] when a header edit names a header
    ///   the template does not have; the draft is left unchanged
    pub fn edit(&self, id: &str, edit: TemplateEdit) -> ApplicationResult<()> {
        self.store
            .update_draft(id, |draft| {
                let mut next = draft.clone();
                next.apply(edit)?;
                *draft = next;
                Ok::<_, DomainError>(())
            })
            .ok_or_else(|| not_found(id))??;
        Ok(())
    }

    /// The template as currently being edited.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn draft(&self, id: &str) -> ApplicationResult<EndpointTemplate> {
        self.store.draft(id).ok_or_else(|| not_found(id))
    }

    /// The draft body as editor text.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn body_text(&self, id: &str) -> ApplicationResult<String> {
        self.draft(id).map(|t| to_display_text(&t.body))
    }

    /// Commits an edited template as the overlay for `id`.
    ///
    /// A textual body is parsed as JSON when possible and kept verbatim
    /// otherwise. The id cannot be changed by saving.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn save(&self, id: &str, mut edited: EndpointTemplate) -> ApplicationResult<EndpointTemplate> {
        if edited.id != id {
            warn!(id, edited_id = %edited.id, "ignoring id change on save");
            edited.id = id.to_string();
        }
        edited.body = edited.body.normalized();
        let saved = self.store.commit(id, edited).ok_or_else(|| not_found(id))?;
        debug!(id, "template saved");
        Ok(saved)
    }

    /// Commits the current draft.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn save_draft(&self, id: &str) -> ApplicationResult<EndpointTemplate> {
        let draft = self.draft(id)?;
        self.save(id, draft)
    }

    /// Throws the draft away, keeping the committed overlay.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn cancel(&self, id: &str) -> ApplicationResult<()> {
        self.store.discard_draft(id).ok_or_else(|| not_found(id))
    }

    /// Restores the canonical template and commits it immediately.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn reset(&self, id: &str) -> ApplicationResult<EndpointTemplate> {
        let canonical = self.store.reset(id).ok_or_else(|| not_found(id))?;
        debug!(id, "template reset to canonical");
        Ok(canonical)
    }

    /// Sets the value entered for one declared parameter.
    ///
    /// # Errors
    /// - [`ApplicationError::NotFound`] for an unknown id
    /// - [`DomainError::UnknownParameter`] if the working template does not
    ///   declare the parameter
    pub fn set_parameter(&self, id: &str, name: &str, value: impl Into<String>) -> ApplicationResult<()> {
        let template = self.store.working(id).ok_or_else(|| not_found(id))?;
        if !template.parameters.iter().any(|p| p.name == name) {
            return Err(DomainError::UnknownParameter(name.to_string()).into());
        }
        self.store
            .set_parameter_value(id, name, value.into())
            .ok_or_else(|| not_found(id))
    }

    /// The URL a parameter-driven test would call right now.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn preview_url(&self, id: &str) -> ApplicationResult<String> {
        let template = self.store.working(id).ok_or_else(|| not_found(id))?;
        let values = self.store.parameter_values(id).unwrap_or_default();
        Ok(compile_url(&template, &values))
    }

    /// Names of required parameters that have no value yet.
    ///
    /// # Errors
    /// Returns [`ApplicationError::NotFound`] for an unknown id.
    pub fn missing_parameters(&self, id: &str) -> ApplicationResult<Vec<String>> {
        let template = self.store.working(id).ok_or_else(|| not_found(id))?;
        let values = self.store.parameter_values(id).unwrap_or_default();
        Ok(values
            .missing_required(&template.parameters)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

fn not_found(id: &str) -> ApplicationError {
    ApplicationError::NotFound(id.to_string())
}
