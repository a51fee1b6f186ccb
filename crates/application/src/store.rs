//! Template store
//!
//! Holds, per endpoint id, the canonical template as generated by the
//! backend, the committed overlay, the uncommitted draft, the parameter
//! values being entered and the latest test outcome. Everything is
//! dropped when a new template set is loaded.
//!
//! Reads are public; writes go through [`crate::TemplateEditor`] and
//! [`crate::TestCoordinator`].

use chrono::{DateTime, Utc};
use docforge_domain::{EndpointTemplate, ParameterValues, TestOutcome};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// A test outcome together with when and by which run it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeRecord {
    /// The outcome
    pub outcome: TestOutcome,
    /// Sequence number of the run that produced it
    pub sequence: u64,
    /// When it was recorded
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    canonical: EndpointTemplate,
    overlay: Option<EndpointTemplate>,
    draft: Option<EndpointTemplate>,
    parameter_values: ParameterValues,
    outcome: Option<OutcomeRecord>,
}

impl Entry {
    fn new(canonical: EndpointTemplate) -> Self {
        Self {
            parameter_values: ParameterValues::seeded(&canonical.parameters),
            canonical,
            overlay: None,
            draft: None,
            outcome: None,
        }
    }

    fn working(&self) -> &EndpointTemplate {
        self.overlay.as_ref().unwrap_or(&self.canonical)
    }
}

/// A snapshot of what a test run needs, taken when the run starts.
#[derive(Debug, Clone)]
pub(crate) struct TestTicket {
    pub template: EndpointTemplate,
    pub parameter_values: ParameterValues,
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: IndexMap<String, Entry>,
    /// Last sequence number handed out. Never reset, so run order holds
    /// across reloads.
    last_sequence: u64,
    /// Value of `last_sequence` when the current set was loaded. Runs at or
    /// below it belong to an earlier set.
    loaded_after: u64,
}

/// In-memory store of the templates of one documentation view.
#[derive(Debug, Default)]
pub struct TemplateStore {
    inner: RwLock<Inner>,
}

impl TemplateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole template set.
    ///
    /// Overlays, drafts, parameter values and outcomes of the previous set
    /// are discarded. When the backend repeats an id, the first template wins.
    pub fn load(&self, templates: Vec<EndpointTemplate>) {
        let mut entries = IndexMap::with_capacity(templates.len());
        for template in templates {
            if entries.contains_key(&template.id) {
                warn!(id = %template.id, "duplicate template id, keeping the first");
                continue;
            }
            entries.insert(template.id.clone(), Entry::new(template));
        }
        debug!(count = entries.len(), "template set loaded");
        let mut inner = self.inner.write();
        inner.entries = entries;
        inner.loaded_after = inner.last_sequence;
    }

    /// Drops every template.
    pub fn clear(&self) {
        self.inner.write().entries.clear();
    }

    /// Ids in the order the backend returned them.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.inner.read().entries.keys().cloned().collect()
    }

    /// Number of loaded templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Returns true if nothing is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Returns true if a template with this id is loaded.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().entries.contains_key(id)
    }

    /// The template exactly as generated.
    #[must_use]
    pub fn canonical(&self, id: &str) -> Option<EndpointTemplate> {
        self.inner.read().entries.get(id).map(|e| e.canonical.clone())
    }

    /// The committed overlay, if one exists.
    #[must_use]
    pub fn overlay(&self, id: &str) -> Option<EndpointTemplate> {
        self.inner.read().entries.get(id).and_then(|e| e.overlay.clone())
    }

    /// The template used for display and testing: overlay, else canonical.
    #[must_use]
    pub fn working(&self, id: &str) -> Option<EndpointTemplate> {
        self.inner.read().entries.get(id).map(|e| e.working().clone())
    }

    /// The template being edited: draft, else the working template.
    #[must_use]
    pub fn draft(&self, id: &str) -> Option<EndpointTemplate> {
        self.inner
            .read()
            .entries
            .get(id)
            .map(|e| e.draft.as_ref().unwrap_or_else(|| e.working()).clone())
    }

    /// Returns true if an uncommitted draft exists.
    #[must_use]
    pub fn has_draft(&self, id: &str) -> bool {
        self.inner.read().entries.get(id).is_some_and(|e| e.draft.is_some())
    }

    /// Working templates of all entries, in order.
    #[must_use]
    pub fn templates(&self) -> Vec<EndpointTemplate> {
        self.inner
            .read()
            .entries
            .values()
            .map(|e| e.working().clone())
            .collect()
    }

    /// Parameter values currently entered for a template.
    #[must_use]
    pub fn parameter_values(&self, id: &str) -> Option<ParameterValues> {
        self.inner.read().entries.get(id).map(|e| e.parameter_values.clone())
    }

    /// The latest recorded outcome for a template.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<TestOutcome> {
        self.outcome_record(id).map(|r| r.outcome)
    }

    /// The latest recorded outcome with its metadata.
    #[must_use]
    pub fn outcome_record(&self, id: &str) -> Option<OutcomeRecord> {
        self.inner.read().entries.get(id).and_then(|e| e.outcome.clone())
    }

    /// Applies `f` to the draft, creating it from the working template first.
    pub(crate) fn update_draft<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut EndpointTemplate) -> T,
    ) -> Option<T> {
        let mut inner = self.inner.write();
        let entry = inner.entries.get_mut(id)?;
        if entry.draft.is_none() {
            entry.draft = Some(entry.working().clone());
        }
        entry.draft.as_mut().map(f)
    }

    /// Commits a template as the overlay and re-seeds parameter values.
    pub(crate) fn commit(&self, id: &str, template: EndpointTemplate) -> Option<EndpointTemplate> {
        let mut inner = self.inner.write();
        let entry = inner.entries.get_mut(id)?;
        entry.parameter_values = ParameterValues::seeded(&template.parameters);
        entry.draft = None;
        entry.overlay = Some(template.clone());
        Some(template)
    }

    /// Replaces the overlay with the canonical template.
    pub(crate) fn reset(&self, id: &str) -> Option<EndpointTemplate> {
        let canonical = self.canonical(id)?;
        self.commit(id, canonical)
    }

    /// Drops the draft. Returns `None` for an unknown id.
    pub(crate) fn discard_draft(&self, id: &str) -> Option<()> {
        let mut inner = self.inner.write();
        inner.entries.get_mut(id).map(|e| e.draft = None)
    }

    /// Updates one parameter value.
    pub(crate) fn set_parameter_value(&self, id: &str, name: &str, value: String) -> Option<()> {
        let mut inner = self.inner.write();
        inner
            .entries
            .get_mut(id)
            .map(|e| e.parameter_values.set(name, value))
    }

    /// Starts a test run: ensures an overlay exists and hands out the next
    /// sequence number together with the inputs the run uses.
    pub(crate) fn begin_test(&self, id: &str) -> Option<TestTicket> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let entry = inner.entries.get_mut(id)?;
        if entry.overlay.is_none() {
            entry.overlay = Some(entry.canonical.clone());
        }
        inner.last_sequence += 1;
        Some(TestTicket {
            template: entry.working().clone(),
            parameter_values: entry.parameter_values.clone(),
            sequence: inner.last_sequence,
        })
    }

    /// Records an outcome unless a run started later has already recorded one
    /// or the run was started before the current template set was loaded.
    ///
    /// Returns whether the outcome was stored.
    pub(crate) fn record_outcome(
        &self,
        id: &str,
        sequence: u64,
        outcome: TestOutcome,
        recorded_at: DateTime<Utc>,
    ) -> bool {
        let mut inner = self.inner.write();
        if sequence <= inner.loaded_after {
            debug!(id, sequence, "dropping outcome of a run from a previous template set");
            return false;
        }
        let Some(entry) = inner.entries.get_mut(id) else {
            return false;
        };
        if entry
            .outcome
            .as_ref()
            .is_some_and(|current| current.sequence > sequence)
        {
            debug!(id, sequence, "dropping outcome of a superseded test run");
            return false;
        }
        entry.outcome = Some(OutcomeRecord {
            outcome,
            sequence,
            recorded_at,
        });
        true
    }
}
