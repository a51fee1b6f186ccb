//! Test Execution Coordinator
//!
//! Turns a stored template into a request descriptor, hands it to the
//! backend's test relay and records what came back.

use std::sync::Arc;

use docforge_domain::{FailureKind, TestOutcome, TestRequest, compile_url, unresolved_placeholders};
use tracing::{debug, info, warn};

use crate::ports::{BackendError, Clock, EndpointTester};
use crate::store::{TemplateStore, TestTicket};

/// Message used when a failure carries no text of its own.
const FALLBACK_MESSAGE: &str = "Test failed";

/// Runs endpoint tests and records their outcomes in a [`TemplateStore`].
///
/// Outcomes are kept per template id. When two runs for the same id
/// overlap, the run that started last decides the recorded outcome,
/// whichever finishes first.
pub struct TestCoordinator<T: EndpointTester> {
    store: Arc<TemplateStore>,
    tester: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<T: EndpointTester> TestCoordinator<T> {
    /// Creates a coordinator.
    pub fn new(store: Arc<TemplateStore>, tester: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            tester,
            clock,
        }
    }

    /// Tests the working template stored under `id`.
    ///
    /// Never fails: every problem is reported as a
    /// [`TestOutcome::Failure`] with status code `0`. The returned outcome
    /// is this run's own, even when a later run has superseded it in the
    /// store.
    pub async fn run_test(&self, id: &str) -> TestOutcome {
        let Some(ticket) = self.store.begin_test(id) else {
            warn!(id, "test requested for an unknown template");
            return TestOutcome::failure(FailureKind::Unknown, format!("Template not found: {id}"));
        };

        let request = build_request(id, &ticket);
        info!(
            id,
            method = %request.method,
            url = %request.url,
            sequence = ticket.sequence,
            "testing endpoint"
        );

        let outcome = match self.tester.test_endpoint(&request).await {
            Ok(success) => {
                debug!(id, status = success.status_code, "test response relayed");
                TestOutcome::Success(success)
            }
            Err(error) => {
                warn!(id, %error, "endpoint test failed");
                failure_outcome(&error)
            }
        };

        let recorded = self
            .store
            .record_outcome(id, ticket.sequence, outcome.clone(), self.clock.now());
        if !recorded {
            debug!(id, sequence = ticket.sequence, "outcome superseded by a later run");
        }
        outcome
    }

    /// Tests the given templates one after another.
    pub async fn run_many(&self, ids: &[String]) -> Vec<(String, TestOutcome)> {
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids {
            outcomes.push((id.clone(), self.run_test(id).await));
        }
        outcomes
    }

    /// Tests every loaded template in load order.
    pub async fn run_all(&self) -> Vec<(String, TestOutcome)> {
        self.run_many(&self.store.ids()).await
    }
}

fn build_request(id: &str, ticket: &TestTicket) -> TestRequest {
    let template = &ticket.template;
    if !template.uses_parameter_flow() {
        debug!(id, "sending template as-is");
        return TestRequest::direct(template);
    }

    let url = compile_url(template, &ticket.parameter_values);
    let missing = ticket.parameter_values.missing_required(&template.parameters);
    if !missing.is_empty() {
        warn!(id, ?missing, "required parameters have no value");
    }
    let unresolved = unresolved_placeholders(&url);
    if !unresolved.is_empty() {
        warn!(id, ?unresolved, "compiled URL still has placeholders");
    }
    debug!(id, %url, "sending compiled parameter request");
    TestRequest::with_url(template, url)
}

fn failure_outcome(error: &BackendError) -> TestOutcome {
    let message = error.to_string();
    let message = if message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    };
    TestOutcome::failure(error.kind(), message)
}
