//! HTTP-contract tests for the object uploader against a mock store.

use std::io::Write;

use httpmock::Method::{POST, PUT};
use httpmock::MockServer;

use derivo_auth::{ClientCredentials, TokenProvider};
use derivo_core::config::service::ServiceConfig;
use derivo_storage::{ObjectUploader, UploadError};

fn service_config(base_url: &str) -> ServiceConfig {
    ServiceConfig {
        base_url: base_url.to_string(),
        request_timeout_seconds: 5,
        transfer_timeout_seconds: 5,
    }
}

fn uploader(server: &MockServer) -> ObjectUploader {
    let config = service_config(&server.base_url());
    let tokens = TokenProvider::new(&config, ClientCredentials::new("id", "secret"))
        .expect("build provider");
    ObjectUploader::new(&config, tokens).expect("build uploader")
}

fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/authentication/v1/authenticate");
        then.status(200).json_body(serde_json::json!({
            "access_token": "upload-token",
            "expires_in": 3599
        }));
    })
}

fn temp_model(bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("model.rvt");
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(bytes).expect("write");
    (dir, path)
}

#[tokio::test]
async fn uploads_file_and_returns_encoded_urn() {
    let server = MockServer::start();
    let _token = mock_token(&server);

    let bucket = server.mock(|when, then| {
        when.method(POST)
            .path("/oss/v2/buckets")
            .header("authorization", "Bearer upload-token")
            .json_body_partial(r#"{"policyKey": "transient"}"#);
        then.status(200)
            .json_body(serde_json::json!({"bucketKey": "ignored"}));
    });

    let object = server.mock(|when, then| {
        when.method(PUT)
            .path_contains("/objects/model.rvt")
            .header("authorization", "Bearer upload-token")
            .header("content-length", "11")
            .body("design byte");
        then.status(200).json_body(serde_json::json!({
            "objectId": "urn:adsk.objects:os.object:bucket/model.rvt",
            "size": 11
        }));
    });

    let (_dir, path) = temp_model(b"design byte");
    let urn = uploader(&server).upload(&path).await.expect("upload");

    bucket.assert();
    object.assert();
    assert_eq!(
        urn.as_str(),
        "dXJuOmFkc2sub2JqZWN0czpvcy5vYmplY3Q6YnVja2V0L21vZGVsLnJ2dA=="
    );
}

#[tokio::test]
async fn missing_file_fails_before_any_network_io() {
    let server = MockServer::start();
    let token = mock_token(&server);

    let err = uploader(&server)
        .upload(std::path::Path::new("/nonexistent/model.rvt"))
        .await
        .expect_err("must fail");

    assert!(matches!(err, UploadError::Source { .. }));
    token.assert_hits(0);
}

#[tokio::test]
async fn bucket_rejection_aborts_before_transfer() {
    let server = MockServer::start();
    let _token = mock_token(&server);

    let bucket = server.mock(|when, then| {
        when.method(POST).path("/oss/v2/buckets");
        then.status(403).body("bucket quota exceeded");
    });
    let object = server.mock(|when, then| {
        when.method(PUT).path_contains("/objects/");
        then.status(200);
    });

    let (_dir, path) = temp_model(b"bytes");
    let err = uploader(&server).upload(&path).await.expect_err("fail");

    bucket.assert();
    object.assert_hits(0);
    match err {
        UploadError::BucketRejected { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("quota"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn transfer_failure_carries_status_and_body() {
    let server = MockServer::start();
    let _token = mock_token(&server);

    server.mock(|when, then| {
        when.method(POST).path("/oss/v2/buckets");
        then.status(200).json_body(serde_json::json!({}));
    });
    server.mock(|when, then| {
        when.method(PUT).path_contains("/objects/");
        then.status(500).body("disk full");
    });

    let (_dir, path) = temp_model(b"bytes");
    let err = uploader(&server).upload(&path).await.expect_err("fail");

    match err {
        UploadError::TransferFailed { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("disk full"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
