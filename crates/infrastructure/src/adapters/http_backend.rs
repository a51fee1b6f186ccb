//! Backend client using reqwest.
//!
//! Implements every backend port from the application layer against the
//! documentation backend's `/api/v1` HTTP API. One cookie store is shared
//! by all calls so the session cookie set at sign-in is sent back.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use docforge_application::{
    AnalyticsApi, BackendError, BackendResult, DocumentSource, EndpointTester, SessionApi,
    TemplateSource,
};
use docforge_domain::{
    CurlSource, DocumentFormat, EndpointTemplate, FeatureCounts, GeneratedDocument, GlobalStats,
    MAX_ZIP_BYTES, OpenApiUrlSource, TestRequest, TestSuccess, UploadReceipt, UsageEvent, User,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::error_mapping::{CallKind, status_error, transport_error};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy)]
struct Timeouts {
    request: Duration,
    test: Duration,
    analytics: Duration,
}

/// HTTP adapter for the documentation backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    api_base: String,
    timeouts: Timeouts,
}

impl HttpBackend {
    /// Creates a backend client from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &Settings) -> BackendResult<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| BackendError::Other(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, settings))
    }

    /// Creates a backend client around an existing reqwest client.
    #[must_use]
    pub fn with_client(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            api_base: settings.api_base(),
            timeouts: Timeouts {
                request: settings.request_timeout(),
                test: settings.test_timeout(),
                analytics: settings.analytics_timeout(),
            },
        }
    }

    /// Base URL of the versioned API.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        timeout: Duration,
        call: CallKind,
    ) -> BackendResult<Response> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(&e, call))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), ?call, "backend returned an error status");
        Err(status_error(status.as_u16(), &body, call))
    }

    async fn read_json<T: DeserializeOwned>(response: Response, call: CallKind) -> BackendResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e, call))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Decode(format!("Invalid response from backend: {e}")))
    }

    async fn read_text(response: Response, call: CallKind) -> BackendResult<String> {
        response.text().await.map_err(|e| transport_error(&e, call))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> BackendResult<T> {
        debug!(path, "GET");
        let response = self
            .send(self.client.get(self.endpoint(path)), timeout, CallKind::Api)
            .await?;
        Self::read_json(response, CallKind::Api).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl serde::Serialize + Sync),
        timeout: Duration,
    ) -> BackendResult<T> {
        debug!(path, "POST");
        let response = self
            .send(
                self.client.post(self.endpoint(path)).json(body),
                timeout,
                CallKind::Api,
            )
            .await?;
        Self::read_json(response, CallKind::Api).await
    }
}

async fn file_part(path: &Path) -> BackendResult<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| BackendError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.as_ref())
        .map_err(|e| BackendError::Other(e.to_string()))
}

/// Checks a backend archive before uploading it.
async fn validate_zip(path: &Path) -> BackendResult<()> {
    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return Err(BackendError::InvalidInput("Only ZIP files are allowed".to_string()));
    }

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| BackendError::Io(format!("Failed to read {}: {e}", path.display())))?;
    if metadata.len() > MAX_ZIP_BYTES {
        return Err(BackendError::InvalidInput(format!(
            "File too large. Maximum size: {}MB",
            MAX_ZIP_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

#[async_trait]
impl TemplateSource for HttpBackend {
    async fn fetch_templates(&self, project_id: &str) -> BackendResult<Vec<EndpointTemplate>> {
        let path = format!(
            "/openapi/project/{}/templates",
            urlencoding::encode(project_id)
        );
        let items: Vec<Value> = self.get_json(&path, self.timeouts.request).await?;
        Ok(EndpointTemplate::decode_list(items))
    }
}

#[async_trait]
impl EndpointTester for HttpBackend {
    async fn test_endpoint(&self, request: &TestRequest) -> BackendResult<TestSuccess> {
        debug!(method = %request.method, url = %request.url, "POST /test-endpoint");
        let response = self
            .send(
                self.client.post(self.endpoint("/test-endpoint")).json(request),
                self.timeouts.test,
                CallKind::Test,
            )
            .await?;
        Self::read_json(response, CallKind::Test).await
    }
}

#[async_trait]
impl AnalyticsApi for HttpBackend {
    async fn track(&self, event: &UsageEvent) -> BackendResult<()> {
        self.post_json::<Value>("/analytics/track", event, self.timeouts.analytics)
            .await
            .map(|_| ())
    }

    async fn global_stats(&self) -> BackendResult<GlobalStats> {
        self.get_json("/analytics/global", self.timeouts.analytics).await
    }

    async fn user_stats(&self, user_id: &str) -> BackendResult<FeatureCounts> {
        let path = format!("/analytics/user/{}", urlencoding::encode(user_id));
        self.get_json(&path, self.timeouts.analytics).await
    }
}

#[async_trait]
impl SessionApi for HttpBackend {
    async fn current_user(&self, bearer: Option<&str>) -> BackendResult<User> {
        let mut request = self.client.get(self.endpoint("/authentication/user"));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .timeout(self.timeouts.request)
            .send()
            .await
            .map_err(|e| transport_error(&e, CallKind::Api))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: "Not authenticated".to_string(),
            });
        }
        Self::read_json(response, CallKind::Api).await
    }

    async fn logout(&self) -> BackendResult<()> {
        self.send(
            self.client.post(self.endpoint("/authentication/logout")),
            self.timeouts.request,
            CallKind::Api,
        )
        .await
        .map(|_| ())
    }

    fn login_url(&self) -> String {
        self.endpoint("/authentication/login")
    }
}

#[async_trait]
impl DocumentSource for HttpBackend {
    async fn upload_openapi_url(&self, source: &OpenApiUrlSource) -> BackendResult<UploadReceipt> {
        self.post_json("/openapi/upload", source, self.timeouts.request)
            .await
    }

    async fn upload_openapi_file(
        &self,
        path: &Path,
        base_url: Option<&str>,
    ) -> BackendResult<UploadReceipt> {
        let mut url = self.endpoint("/openapi/upload-file");
        if let Some(base_url) = base_url.filter(|b| !b.is_empty()) {
            url.push_str("?base_url=");
            url.push_str(&urlencoding::encode(base_url));
        }
        let form = Form::new().part("file", file_part(path).await?);
        debug!(file = %path.display(), "POST /openapi/upload-file");
        let response = self
            .send(
                self.client.post(url).multipart(form),
                self.timeouts.request,
                CallKind::Api,
            )
            .await?;
        Self::read_json(response, CallKind::Api).await
    }

    async fn upload_curl(&self, source: &CurlSource) -> BackendResult<UploadReceipt> {
        self.post_json("/curl/upload", source, self.timeouts.request)
            .await
    }

    async fn upload_backend_zip(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> BackendResult<GeneratedDocument> {
        validate_zip(path).await?;
        let form = Form::new()
            .part("file", file_part(path).await?)
            .text("format", format.as_str());
        debug!(file = %path.display(), %format, "POST /code/upload-backend-zip");
        let response = self
            .send(
                self.client
                    .post(self.endpoint("/code/upload-backend-zip"))
                    .multipart(form),
                self.timeouts.request,
                CallKind::ZipUpload,
            )
            .await?;
        let content = Self::read_text(response, CallKind::ZipUpload).await?;
        Ok(GeneratedDocument { content, format })
    }

    async fn upload_github_repo(
        &self,
        repo_url: &str,
        format: DocumentFormat,
    ) -> BackendResult<GeneratedDocument> {
        let repo_url = repo_url.trim();
        if repo_url.is_empty() {
            return Err(BackendError::InvalidInput(
                "Repository URL cannot be empty".to_string(),
            ));
        }
        let form = Form::new()
            .text("repo_url", repo_url.to_string())
            .text("format", format.as_str());
        debug!(repo_url, %format, "POST /code/upload-github-repo");
        let response = self
            .send(
                self.client
                    .post(self.endpoint("/code/upload-github-repo"))
                    .multipart(form),
                self.timeouts.request,
                CallKind::RepoClone,
            )
            .await?;
        let content = Self::read_text(response, CallKind::RepoClone).await?;
        Ok(GeneratedDocument { content, format })
    }

    async fn code_limits(&self) -> BackendResult<Value> {
        self.get_json("/code/limits", self.timeouts.request).await
    }

    async fn validate_repo_url(&self, repo_url: &str) -> BackendResult<Value> {
        let form = Form::new().text("repo_url", repo_url.to_string());
        let response = self
            .send(
                self.client
                    .post(self.endpoint("/code/validate-repo-url"))
                    .multipart(form),
                self.timeouts.request,
                CallKind::Api,
            )
            .await?;
        Self::read_json(response, CallKind::Api).await
    }
}
