//! Integration tests for the reqwest backend adapter
//!
//! Each test starts a wiremock server standing in for the documentation
//! backend and drives the adapter through the application ports.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use docforge_application::{
    AnalyticsApi, BackendError, DocumentSource, EndpointTester, SessionApi, TemplateSource,
};
use docforge_domain::{
    CurlSource, DocumentFormat, Feature, FailureKind, HttpMethod, OpenApiUrlSource, TemplateBody,
    TestRequest, UsageEvent,
};
use docforge_infrastructure::{HttpBackend, Settings};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    let settings = Settings {
        backend_url: server.uri(),
        test_timeout_secs: 1,
        ..Settings::default()
    };
    HttpBackend::new(&settings).expect("client")
}

#[tokio::test]
async fn test_fetch_templates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/openapi/project/42/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "endpoint_id": "get-user",
                "method": "GET",
                "url": "http://api.test/users/{id}",
                "headers": {"Accept": "application/json"},
                "body": null,
                "parameters": [
                    {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
                ],
                "requires_auth": false
            },
            {
                "id": "create-user",
                "method": "post",
                "url": "http://api.test/users",
                "headers": {"Content-Type": "application/json"},
                "body": {"name": "string"},
                "requires_auth": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let templates = backend(&server).fetch_templates("42").await.unwrap();

    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].id, "get-user");
    assert!(templates[0].uses_parameter_flow());
    assert_eq!(templates[1].id, "create-user");
    assert_eq!(templates[1].method, HttpMethod::Post);
    assert_eq!(
        templates[1].body,
        TemplateBody::Structured(json!({"name": "string"}))
    );
}

#[tokio::test]
async fn test_fetch_templates_skips_unsupported_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/openapi/project/7/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "trace", "method": "TRACE", "url": "http://api.test/trace"},
            {
                "id": "upload",
                "method": "POST",
                "url": "http://api.test/upload",
                "parameters": [{"name": "file", "in": "formData"}]
            }
        ])))
        .mount(&server)
        .await;

    let templates = backend(&server).fetch_templates("7").await.unwrap();

    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].id, "upload");
}

#[tokio::test]
async fn test_fetch_templates_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/openapi/project/missing/templates"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Project not found"})))
        .mount(&server)
        .await;

    let error = backend(&server).fetch_templates("missing").await.unwrap_err();

    assert_eq!(
        error,
        BackendError::Status {
            status: 404,
            message: "Project not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_endpoint_relays_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/test-endpoint"))
        .and(body_json(json!({
            "method": "POST",
            "url": "http://api.test/pets",
            "headers": {"Content-Type": "application/json"},
            "body": {"name": "rex"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 201,
            "response_body": {"id": 7, "name": "rex"},
            "response_headers": {"content-type": "application/json"},
            "response_time": 42.5,
            "request_url": "http://api.test/pets",
            "method": "POST"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = TestRequest {
        method: HttpMethod::Post,
        url: "http://api.test/pets".to_string(),
        headers: [("Content-Type", "application/json")].into_iter().collect(),
        body: Some(json!({"name": "rex"})),
    };
    let success = backend(&server).test_endpoint(&request).await.unwrap();

    assert_eq!(success.status_code, 201);
    assert_eq!(success.response_body, json!({"id": 7, "name": "rex"}));
    assert_eq!(success.response_time_ms, Some(42.5));
}

#[tokio::test]
async fn test_endpoint_sends_null_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/test-endpoint"))
        .and(body_json(json!({
            "method": "GET",
            "url": "http://api.test/health",
            "headers": {},
            "body": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status_code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    let request = TestRequest {
        method: HttpMethod::Get,
        url: "http://api.test/health".to_string(),
        headers: std::iter::empty::<(String, String)>().collect(),
        body: None,
    };
    let success = backend(&server).test_endpoint(&request).await.unwrap();

    assert_eq!(success.status_code, 200);
}

#[tokio::test]
async fn test_endpoint_target_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/test-endpoint"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({})))
        .mount(&server)
        .await;

    let request = TestRequest {
        method: HttpMethod::Get,
        url: "http://localhost:9/".to_string(),
        headers: std::iter::empty::<(String, String)>().collect(),
        body: None,
    };
    let error = backend(&server).test_endpoint(&request).await.unwrap_err();

    assert_eq!(error.kind(), FailureKind::ConnectionFailed);
    assert_eq!(
        error.to_string(),
        "Cannot connect to target server. Make sure it's running and accessible."
    );
}

#[tokio::test]
async fn test_endpoint_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/test-endpoint"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status_code": 200}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let request = TestRequest {
        method: HttpMethod::Get,
        url: "http://api.test/slow".to_string(),
        headers: std::iter::empty::<(String, String)>().collect(),
        body: None,
    };
    let error = backend(&server).test_endpoint(&request).await.unwrap_err();

    assert_eq!(
        error,
        BackendError::Timeout("Test timeout. The request took too long to complete.".to_string())
    );
    assert_eq!(error.kind(), FailureKind::Timeout);
}

#[tokio::test]
async fn test_backend_unreachable() {
    let settings = Settings {
        backend_url: "http://127.0.0.1:1".to_string(),
        ..Settings::default()
    };
    let backend = HttpBackend::new(&settings).unwrap();

    let error = backend.fetch_templates("1").await.unwrap_err();

    assert!(matches!(error, BackendError::Connection(_)), "{error:?}");
    assert!(error.to_string().starts_with("Cannot connect to backend"));
}

#[tokio::test]
async fn test_invalid_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/global"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let error = backend(&server).global_stats().await.unwrap_err();

    assert!(matches!(error, BackendError::Decode(_)));
    assert_eq!(error.kind(), FailureKind::InvalidResponse);
}

#[tokio::test]
async fn test_analytics_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/analytics/track"))
        .and(body_json(json!({"feature": "curl", "user_id": "u1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/global"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 12,
            "feature_usage": {"openapijson": 5, "curl": 3, "backendzip": 1, "githubrepo": 0}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/analytics/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"curl": 2})))
        .mount(&server)
        .await;

    let backend = backend(&server);
    backend
        .track(&UsageEvent {
            feature: Feature::Curl,
            user_id: Some("u1".to_string()),
        })
        .await
        .unwrap();
    let global = backend.global_stats().await.unwrap();
    let user = backend.user_stats("u1").await.unwrap();

    assert_eq!(global.total_users, 12);
    assert_eq!(global.feature_usage.openapijson, 5);
    assert_eq!(user.curl, 2);
    assert_eq!(user.githubrepo, 0);
}

#[tokio::test]
async fn test_current_user_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/authentication/user"))
        .and(header("authorization", "Bearer tmp-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "email": "ada@example.com",
            "name": "Ada"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/authentication/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let anonymous = backend.current_user(None).await.unwrap_err();
    let user = backend.current_user(Some("tmp-1")).await.unwrap();

    assert_eq!(anonymous.status(), Some(401));
    assert_eq!(user.id, "5");
    assert_eq!(user.name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_logout_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/authentication/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out"})))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server).logout().await.unwrap();
}

#[tokio::test]
async fn test_openapi_and_curl_uploads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/openapi/upload"))
        .and(body_json(json!({
            "openapi_url": "http://api.test/openapi.json",
            "base_url": "http://api.test"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"project_id": "p-1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/curl/upload"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "curl"], "msg": "field required", "type": "value_error.missing"}]
        })))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let receipt = backend
        .upload_openapi_url(&OpenApiUrlSource {
            openapi_url: "http://api.test/openapi.json".to_string(),
            base_url: "http://api.test".to_string(),
        })
        .await
        .unwrap();
    let rejected = backend
        .upload_curl(&CurlSource {
            curl: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(receipt.project_id.as_deref(), Some("p-1"));
    assert_eq!(rejected.to_string(), "body.curl: field required");
}

#[tokio::test]
async fn test_openapi_file_upload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/openapi/upload-file"))
        .and(query_param("base_url", "http://api.test/v1"))
        .and(body_string_contains("filename=\"petstore.yaml\""))
        .and(body_string_contains("openapi: 3.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"project_id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("petstore.yaml");
    tokio::fs::write(&file, "openapi: 3.0.0\n").await.unwrap();

    let receipt = backend(&server)
        .upload_openapi_file(&file, Some("http://api.test/v1"))
        .await
        .unwrap();

    assert_eq!(receipt.project_id.as_deref(), Some("9"));
}

#[tokio::test]
async fn test_backend_zip_upload_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/code/upload-backend-zip"))
        .and(body_string_contains("name=\"format\""))
        .and(body_string_contains("yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("openapi: 3.0.0\ninfo: {}\n"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("backend.zip");
    tokio::fs::write(&archive, b"PK\x03\x04").await.unwrap();

    let document = backend(&server)
        .upload_backend_zip(&archive, DocumentFormat::Yaml)
        .await
        .unwrap();

    assert_eq!(document.content, "openapi: 3.0.0\ninfo: {}\n");
    assert_eq!(document.format, DocumentFormat::Yaml);
}

#[tokio::test]
async fn test_rejected_uploads_never_reach_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("backend.rar");
    tokio::fs::write(&archive, b"Rar!").await.unwrap();
    let backend = backend(&server);

    let zip = backend
        .upload_backend_zip(&archive, DocumentFormat::Json)
        .await
        .unwrap_err();
    let repo = backend
        .upload_github_repo("   ", DocumentFormat::Json)
        .await
        .unwrap_err();

    assert_eq!(zip, BackendError::InvalidInput("Only ZIP files are allowed".to_string()));
    assert_eq!(
        repo,
        BackendError::InvalidInput("Repository URL cannot be empty".to_string())
    );
}

#[tokio::test]
async fn test_github_repo_upload_trims_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/code/upload-github-repo"))
        .and(body_string_contains("https://github.com/acme/api\r\n"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"openapi\": \"3.0.0\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let document = backend(&server)
        .upload_github_repo("  https://github.com/acme/api \n", DocumentFormat::Json)
        .await
        .unwrap();

    assert_eq!(document.content, "{\"openapi\": \"3.0.0\"}");
}

#[tokio::test]
async fn test_code_helpers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/code/limits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"max_zip_mb": 100})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/code/validate-repo-url"))
        .and(body_string_contains("name=\"repo_url\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .mount(&server)
        .await;

    let backend = backend(&server);

    assert_eq!(backend.code_limits().await.unwrap(), json!({"max_zip_mb": 100}));
    assert_eq!(
        backend
            .validate_repo_url("https://github.com/acme/api")
            .await
            .unwrap(),
        json!({"valid": true})
    );
}
