//! Submit source use case.

use std::path::PathBuf;
use std::sync::Arc;

use docforge_domain::{
    CurlSource, DocumentFormat, GeneratedDocument, OpenApiUrlSource, SourceKind, UploadReceipt,
};
use tracing::{info, warn};

use crate::error::ApplicationResult;
use crate::ports::{DocumentSource, TemplateSource};
use crate::store::TemplateStore;

/// An API description to hand to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSubmission {
    /// OpenAPI document the backend downloads itself.
    OpenApiUrl(OpenApiUrlSource),
    /// Local OpenAPI JSON/YAML file.
    OpenApiFile {
        /// File to upload
        path: PathBuf,
        /// Base URL the generated templates call
        base_url: Option<String>,
    },
    /// cURL command.
    Curl(CurlSource),
    /// Zipped backend sources to generate documentation from.
    BackendZip {
        /// Archive to upload
        path: PathBuf,
        /// Format of the generated document
        format: DocumentFormat,
    },
    /// GitHub repository to generate documentation from.
    GithubRepo {
        /// Repository URL
        repo_url: String,
        /// Format of the generated document
        format: DocumentFormat,
    },
}

impl SourceSubmission {
    /// What kind of source this is.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::OpenApiUrl(_) | Self::OpenApiFile { .. } => SourceKind::OpenApi,
            Self::Curl(_) => SourceKind::Curl,
            Self::BackendZip { .. } => SourceKind::BackendZip,
            Self::GithubRepo { .. } => SourceKind::GithubRepo,
        }
    }
}

/// Output from submitting a source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitSourceOutput {
    /// Project created by the backend, for OpenAPI and cURL uploads
    pub project_id: Option<String>,
    /// Templates now in the store
    pub templates_loaded: usize,
    /// Generated document, for code uploads
    pub document: Option<GeneratedDocument>,
}

/// Submits an API description and loads the resulting templates.
pub struct SubmitSource<B: DocumentSource + TemplateSource> {
    backend: Arc<B>,
    store: Arc<TemplateStore>,
}

impl<B: DocumentSource + TemplateSource> SubmitSource<B> {
    /// Creates a new `SubmitSource` use case.
    #[must_use]
    pub const fn new(backend: Arc<B>, store: Arc<TemplateStore>) -> Self {
        Self { backend, store }
    }

    /// Sends the submission to the backend.
    ///
    /// OpenAPI and cURL uploads yield a project whose templates are
    /// fetched into the store. Code uploads yield a generated document and
    /// leave the store alone.
    ///
    /// # Errors
    /// Returns [`crate::ApplicationError::Backend`] if validation or any
    /// backend call fails.
    pub async fn execute(&self, submission: &SourceSubmission) -> ApplicationResult<SubmitSourceOutput> {
        let receipt = match submission {
            SourceSubmission::OpenApiUrl(source) => self.backend.upload_openapi_url(source).await?,
            SourceSubmission::OpenApiFile { path, base_url } => {
                self.backend
                    .upload_openapi_file(path, base_url.as_deref())
                    .await?
            }
            SourceSubmission::Curl(source) => self.backend.upload_curl(source).await?,
            SourceSubmission::BackendZip { path, format } => {
                let document = self.backend.upload_backend_zip(path, *format).await?;
                return Ok(Self::generated(document));
            }
            SourceSubmission::GithubRepo { repo_url, format } => {
                let document = self.backend.upload_github_repo(repo_url, *format).await?;
                return Ok(Self::generated(document));
            }
        };
        self.load(receipt).await
    }

    fn generated(document: GeneratedDocument) -> SubmitSourceOutput {
        info!(format = %document.format, len = document.content.len(), "document generated");
        SubmitSourceOutput {
            document: Some(document),
            ..SubmitSourceOutput::default()
        }
    }

    async fn load(&self, receipt: UploadReceipt) -> ApplicationResult<SubmitSourceOutput> {
        let Some(project_id) = receipt.project_id else {
            warn!("upload accepted without a project id");
            return Ok(SubmitSourceOutput::default());
        };
        let templates = self.backend.fetch_templates(&project_id).await?;
        self.store.load(templates);
        let templates_loaded = self.store.len();
        info!(%project_id, templates_loaded, "source submitted");
        Ok(SubmitSourceOutput {
            project_id: Some(project_id),
            templates_loaded,
            document: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;

    use async_trait::async_trait;
    use docforge_domain::{EndpointTemplate, HttpMethod};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, Value, json};

    use crate::ApplicationError;
    use crate::ports::{AnalyticsApi, BackendError, BackendResult, SessionApi};
    use crate::state::AppState;
    use docforge_domain::{Feature, FeatureCounts, GlobalStats, UsageEvent, User};

    #[derive(Default)]
    struct MockBackend {
        project_id: Option<String>,
        fetched: Mutex<Vec<String>>,
    }

    impl MockBackend {
        fn receipt(&self) -> UploadReceipt {
            UploadReceipt {
                project_id: self.project_id.clone(),
                extra: Map::new(),
            }
        }
    }

    #[async_trait]
    impl TemplateSource for MockBackend {
        async fn fetch_templates(&self, project_id: &str) -> BackendResult<Vec<EndpointTemplate>> {
            self.fetched.lock().push(project_id.to_string());
            Ok(vec![EndpointTemplate::new("ep", HttpMethod::Get, "/ep")])
        }
    }

    #[async_trait]
    impl DocumentSource for MockBackend {
        async fn upload_openapi_url(&self, _source: &OpenApiUrlSource) -> BackendResult<UploadReceipt> {
            Ok(self.receipt())
        }

        async fn upload_openapi_file(
            &self,
            _path: &Path,
            _base_url: Option<&str>,
        ) -> BackendResult<UploadReceipt> {
            Ok(self.receipt())
        }

        async fn upload_curl(&self, _source: &CurlSource) -> BackendResult<UploadReceipt> {
            Ok(self.receipt())
        }

        async fn upload_backend_zip(
            &self,
            _path: &Path,
            format: DocumentFormat,
        ) -> BackendResult<GeneratedDocument> {
            Ok(GeneratedDocument {
                content: "openapi: 3.0.0".into(),
                format,
            })
        }

        async fn upload_github_repo(
            &self,
            repo_url: &str,
            _format: DocumentFormat,
        ) -> BackendResult<GeneratedDocument> {
            Err(BackendError::InvalidInput(format!("cannot clone {repo_url}")))
        }

        async fn code_limits(&self) -> BackendResult<Value> {
            Ok(json!({}))
        }

        async fn validate_repo_url(&self, _repo_url: &str) -> BackendResult<Value> {
            Ok(json!({"valid": true}))
        }
    }

    #[derive(Default)]
    struct UsageBackend {
        events: Mutex<Vec<UsageEvent>>,
    }

    #[async_trait]
    impl SessionApi for UsageBackend {
        async fn current_user(&self, _bearer: Option<&str>) -> BackendResult<User> {
            Err(BackendError::Status {
                status: 401,
                message: "Not authenticated".into(),
            })
        }

        async fn logout(&self) -> BackendResult<()> {
            Ok(())
        }

        fn login_url(&self) -> String {
            String::new()
        }
    }

    #[async_trait]
    impl AnalyticsApi for UsageBackend {
        async fn track(&self, event: &UsageEvent) -> BackendResult<()> {
            self.events.lock().push(event.clone());
            Ok(())
        }

        async fn global_stats(&self) -> BackendResult<GlobalStats> {
            Ok(GlobalStats::default())
        }

        async fn user_stats(&self, _user_id: &str) -> BackendResult<FeatureCounts> {
            Ok(FeatureCounts::default())
        }
    }

    #[tokio::test]
    async fn test_accepted_submission_is_counted() {
        let usage = Arc::new(UsageBackend::default());
        let state = AppState::new(Arc::clone(&usage));
        let use_case = SubmitSource::new(
            Arc::new(MockBackend {
                project_id: Some("42".into()),
                ..MockBackend::default()
            }),
            Arc::new(TemplateStore::new()),
        );

        state
            .submit_source(
                &use_case,
                &SourceSubmission::Curl(CurlSource {
                    curl: "curl http://api.test/ep".into(),
                }),
            )
            .await
            .unwrap();
        let rejected = state
            .submit_source(
                &use_case,
                &SourceSubmission::GithubRepo {
                    repo_url: "https://github.com/acme/api".into(),
                    format: DocumentFormat::Json,
                },
            )
            .await;

        assert!(rejected.is_err());
        assert_eq!(
            *usage.events.lock(),
            vec![UsageEvent {
                feature: Feature::Curl,
                user_id: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_curl_upload_loads_templates() {
        let backend = Arc::new(MockBackend {
            project_id: Some("42".into()),
            ..MockBackend::default()
        });
        let store = Arc::new(TemplateStore::new());
        let use_case = SubmitSource::new(Arc::clone(&backend), Arc::clone(&store));

        let output = use_case
            .execute(&SourceSubmission::Curl(CurlSource {
                curl: "curl http://api.test/ep".into(),
            }))
            .await
            .unwrap();

        assert_eq!(output.project_id.as_deref(), Some("42"));
        assert_eq!(output.templates_loaded, 1);
        assert_eq!(*backend.fetched.lock(), vec!["42".to_string()]);
        assert!(store.contains("ep"));
    }

    #[tokio::test]
    async fn test_receipt_without_project_loads_nothing() {
        let backend = Arc::new(MockBackend::default());
        let store = Arc::new(TemplateStore::new());
        let use_case = SubmitSource::new(Arc::clone(&backend), Arc::clone(&store));

        let output = use_case
            .execute(&SourceSubmission::OpenApiUrl(OpenApiUrlSource {
                openapi_url: "http://api.test/openapi.json".into(),
                base_url: "http://api.test".into(),
            }))
            .await
            .unwrap();

        assert_eq!(output, SubmitSourceOutput::default());
        assert!(backend.fetched.lock().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_code_upload_returns_document() {
        let backend = Arc::new(MockBackend::default());
        let store = Arc::new(TemplateStore::new());
        let use_case = SubmitSource::new(backend, Arc::clone(&store));

        let output = use_case
            .execute(&SourceSubmission::BackendZip {
                path: PathBuf::from("backend.zip"),
                format: DocumentFormat::Yaml,
            })
            .await
            .unwrap();

        assert_eq!(
            output.document,
            Some(GeneratedDocument {
                content: "openapi: 3.0.0".into(),
                format: DocumentFormat::Yaml,
            })
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let use_case = SubmitSource::new(
            Arc::new(MockBackend::default()),
            Arc::new(TemplateStore::new()),
        );

        let result = use_case
            .execute(&SourceSubmission::GithubRepo {
                repo_url: "https://github.com/acme/api".into(),
                format: DocumentFormat::Json,
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Backend(BackendError::InvalidInput(_)))
        ));
    }

    #[test]
    fn test_submission_kind() {
        let submission = SourceSubmission::OpenApiFile {
            path: PathBuf::from("api.yaml"),
            base_url: None,
        };
        assert_eq!(submission.kind(), SourceKind::OpenApi);
    }
}
