//! Docforge command line driver
//!
//! Loads the templates generated for a project, tests them through the
//! backend relay and reports every outcome as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use docforge_application::{
    AppState, ApplicationError, BackendError, LoadTemplates, TemplateStore, TestCoordinator,
};
use docforge_domain::{TestOutcome, User};
use docforge_infrastructure::{HttpBackend, Settings, SystemClock};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "docforge", version, about)]
pub struct Cli {
    /// Project whose templates are tested
    pub project_id: String,

    /// Test only this template id (repeatable)
    #[arg(long = "only", value_name = "ENDPOINT_ID")]
    pub only: Vec<String>,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Errors that stop a run before any test is made.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The HTTP client could not be set up.
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// Loading the templates failed.
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

/// One tested template.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Template id
    pub id: String,
    /// What the test produced
    pub outcome: TestOutcome,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    /// Tested project
    pub project_id: String,
    /// Signed-in user, if the backend session is active
    pub user: Option<User>,
    /// Number of templates the project has
    pub templates_loaded: usize,
    /// One entry per tested template, in test order
    pub outcomes: Vec<ReportEntry>,
}

impl TestReport {
    /// Number of tests that got no relayed response.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|e| e.outcome.is_failure()).count()
    }
}

/// Runs the tests requested on the command line.
///
/// # Errors
/// Returns an error if the client cannot be built or the templates cannot
/// be loaded. Failing tests are part of the report, not errors.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<TestReport, DriverError> {
    let backend = Arc::new(HttpBackend::new(settings)?);

    let state = AppState::new(Arc::clone(&backend));
    let session = state.start().await;

    let store = Arc::new(TemplateStore::new());
    let templates_loaded = LoadTemplates::new(Arc::clone(&backend), Arc::clone(&store))
        .execute(&cli.project_id)
        .await?;

    let coordinator = TestCoordinator::new(Arc::clone(&store), backend, Arc::new(SystemClock::new()));
    let outcomes = if cli.only.is_empty() {
        coordinator.run_all().await
    } else {
        coordinator.run_many(&cli.only).await
    };

    let report = TestReport {
        project_id: cli.project_id.clone(),
        user: session.user().cloned(),
        templates_loaded,
        outcomes: outcomes
            .into_iter()
            .map(|(id, outcome)| ReportEntry { id, outcome })
            .collect(),
    };
    info!(
        project_id = %report.project_id,
        tested = report.outcomes.len(),
        failures = report.failures(),
        "run finished"
    );
    Ok(report)
}
