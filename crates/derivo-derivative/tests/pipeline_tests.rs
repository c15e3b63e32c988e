//! End-to-end pipeline tests against a mock conversion service.

use std::io::Write;

use httpmock::Method::{GET, POST, PUT};
use httpmock::MockServer;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

use derivo_auth::{ClientCredentials, TokenProvider};
use derivo_core::config::polling::PollingConfig;
use derivo_core::config::service::ServiceConfig;
use derivo_core::config::{AppConfig, CredentialsConfig, OutputConfig};
use derivo_core::traits::{ChannelSink, NullSink};
use derivo_core::types::{DerivativeUrn, Urn};
use derivo_derivative::{DerivativeClient, DerivativeError, Translator};
use tokio_util::sync::CancellationToken;

const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Mirror of the client's path-segment encoding, for building mock paths.
fn seg(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SEGMENT).to_string()
}

/// Base64 of `urn:adsk.objects:os.object:transient/model.rvt`, as the
/// uploader produces it.
const DESIGN_URN: &str = "dXJuOmFkc2sub2JqZWN0czpvcy5vYmplY3Q6dHJhbnNpZW50L21vZGVsLnJ2dA==";

const D1: &str = "urn:adsk.viewing:fs.file:abc/output/geometry.svf";
const D2: &str = "urn:adsk.viewing:fs.file:abc/output/materials.json";

fn app_config(server: &MockServer, output_root: &std::path::Path) -> AppConfig {
    AppConfig {
        service: ServiceConfig {
            base_url: server.base_url(),
            request_timeout_seconds: 5,
            transfer_timeout_seconds: 5,
        },
        credentials: CredentialsConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
        },
        polling: PollingConfig {
            interval_ms: 10,
            max_attempts: 5,
        },
        output: OutputConfig {
            directory: Some(output_root.to_string_lossy().into_owned()),
        },
        logging: Default::default(),
    }
}

fn mock_token(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST).path("/authentication/v1/authenticate");
        then.status(200).json_body(serde_json::json!({
            "access_token": "test-token",
            "expires_in": 3599
        }));
    });
}

fn design_path(suffix: &str) -> String {
    format!(
        "/modelderivative/v2/designdata/{}{}",
        seg(DESIGN_URN),
        suffix
    )
}

#[tokio::test]
async fn full_pipeline_tolerates_one_failed_derivative() {
    let server = MockServer::start();
    mock_token(&server);

    // Object store: bucket creation + streamed upload.
    server.mock(|when, then| {
        when.method(POST).path("/oss/v2/buckets");
        then.status(200).json_body(serde_json::json!({}));
    });
    server.mock(|when, then| {
        when.method(PUT).path_contains("/objects/model.rvt");
        then.status(200).json_body(serde_json::json!({
            "objectId": "urn:adsk.objects:os.object:transient/model.rvt"
        }));
    });

    // Round-trip property: the job must receive the uploaded URN unchanged.
    let job = server.mock(|when, then| {
        when.method(POST)
            .path("/modelderivative/v2/designdata/job")
            .json_body_partial(format!(r#"{{"input": {{"urn": "{DESIGN_URN}"}}}}"#));
        then.status(200).json_body(serde_json::json!({"result": "created"}));
    });

    // Status: complete on the first check. D1 appears twice; extraction
    // must de-duplicate while keeping first-seen order.
    server.mock(|when, then| {
        when.method(GET).path(design_path("/manifest"));
        then.status(200).json_body(serde_json::json!({
            "urn": DESIGN_URN,
            "progress": "complete",
            "status": "success",
            "derivatives": [{
                "outputType": "svf",
                "children": [
                    {"urn": D1, "role": "graphics"},
                    {"urn": D2, "role": "materials"},
                    {"urn": D1, "role": "graphics"}
                ]
            }]
        }));
    });

    // D1 download fails; D2 succeeds. The batch must finish regardless.
    server.mock(|when, then| {
        when.method(GET)
            .path(design_path(&format!("/manifest/{}", seg(D1))));
        then.status(404).body("derivative not available");
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(design_path(&format!("/manifest/{}", seg(D2))));
        then.status(200).body("materials payload");
    });

    server.mock(|when, then| {
        when.method(GET).path(design_path("/thumbnail"));
        then.status(200).body("png-bytes");
    });

    // Metadata for the first derivative: two views, one property block and
    // one metadata block each.
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/modelderivative/v2/designdata/{}/metadata", seg(D1)));
        then.status(200).json_body(serde_json::json!({
            "data": {"metadata": [
                {"name": "3D view", "guid": "g-one"},
                {"name": "Sheet", "guid": "g-two"}
            ]}
        }));
    });
    for guid in ["g-one", "g-two"] {
        server.mock(|when, then| {
            when.method(GET).path(format!(
                "/modelderivative/v2/designdata/{}/metadata/{}/properties",
                seg(D1),
                guid
            ));
            then.status(200).json_body(serde_json::json!({
                "data": {"collection": [{"objectid": 1, "name": "Wall"}]}
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path(format!(
                "/modelderivative/v2/designdata/{}/metadata/{}",
                seg(D1),
                guid
            ));
            then.status(200)
                .json_body(serde_json::json!({"data": {"name": guid}}));
        });
    }

    // Local input file.
    let input_dir = tempfile::tempdir().expect("tempdir");
    let input = input_dir.path().join("model.rvt");
    std::fs::File::create(&input)
        .and_then(|mut f| f.write_all(b"revit bytes"))
        .expect("write input");

    let output_root = tempfile::tempdir().expect("tempdir");
    let translator =
        Translator::from_config(&app_config(&server, output_root.path())).expect("translator");

    let (sink, mut progress) = ChannelSink::new();
    let outcome = translator
        .run(&input, &sink, &CancellationToken::new())
        .await
        .expect("pipeline");

    job.assert();

    // Derivatives: de-duplicated, payload order.
    assert_eq!(
        outcome.derivatives,
        vec![DerivativeUrn::new(D1), DerivativeUrn::new(D2)]
    );

    // The single completion observation reached the sink.
    let update = progress.recv().await.expect("progress update");
    assert_eq!(update.percent, 100);
    assert!(update.manifest.contains("\"progress\": \"complete\""));

    // D1 failed but D2 was still saved.
    assert_eq!(outcome.retrieval.failures.len(), 1);
    assert_eq!(
        outcome.retrieval.failures[0].derivative,
        DerivativeUrn::new(D1)
    );
    assert_eq!(outcome.retrieval.saved.len(), 1);
    let saved = &outcome.retrieval.saved[0];
    assert_eq!(saved.file_name().and_then(|n| n.to_str()), Some("materials.json"));
    assert_eq!(
        std::fs::read_to_string(saved).expect("saved file"),
        "materials payload"
    );

    // Thumbnail landed under the fixed name.
    assert_eq!(
        outcome.thumbnail.file_name().and_then(|n| n.to_str()),
        Some("thumbnail.png")
    );
    assert_eq!(
        std::fs::read(&outcome.thumbnail).expect("thumbnail"),
        b"png-bytes"
    );

    // Metadata: one section per discovered view, discovery order.
    let report = outcome.metadata.expect("metadata report");
    assert_eq!(report.sections.len(), 2);
    assert_eq!(report.sections[0].guid, "g-one");
    assert_eq!(report.sections[1].guid, "g-two");
    assert!(report.to_text().contains("Wall"));

    // Artifacts live in a directory named after the URN.
    assert!(
        outcome
            .output_dir
            .starts_with(output_root.path()),
        "output under configured root"
    );
}

#[tokio::test]
async fn stalled_job_times_out_at_the_attempt_bound() {
    let server = MockServer::start();
    mock_token(&server);

    server.mock(|when, then| {
        when.method(POST).path("/modelderivative/v2/designdata/job");
        then.status(200).json_body(serde_json::json!({}));
    });
    let manifest = server.mock(|when, then| {
        when.method(GET).path(design_path("/manifest"));
        then.status(200)
            .json_body(serde_json::json!({"progress": "57% complete"}));
    });

    let output_root = tempfile::tempdir().expect("tempdir");
    let mut config = app_config(&server, output_root.path());
    config.polling.max_attempts = 3;
    let translator = Translator::from_config(&config).expect("translator");

    let err = translator
        .translate(
            &Urn::new(DESIGN_URN),
            &NullSink,
            &CancellationToken::new(),
        )
        .await
        .expect_err("must time out");

    assert!(matches!(err, DerivativeError::PollTimeout { attempts: 3 }));
    manifest.assert_hits(3);
}

#[tokio::test]
async fn rejected_submission_is_fatal_and_not_retried() {
    let server = MockServer::start();
    mock_token(&server);

    let job = server.mock(|when, then| {
        when.method(POST).path("/modelderivative/v2/designdata/job");
        then.status(400).body("unsupported source type");
    });

    let output_root = tempfile::tempdir().expect("tempdir");
    let translator =
        Translator::from_config(&app_config(&server, output_root.path())).expect("translator");

    let err = translator
        .translate(
            &Urn::new(DESIGN_URN),
            &NullSink,
            &CancellationToken::new(),
        )
        .await
        .expect_err("must fail");

    job.assert_hits(1);
    match err {
        DerivativeError::Submit { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("unsupported"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn metadata_extraction_aborts_on_a_failed_view_fetch() {
    let server = MockServer::start();
    mock_token(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/modelderivative/v2/designdata/{}/metadata", seg(D1)));
        then.status(200).json_body(serde_json::json!({
            "data": {"metadata": [
                {"name": "ok view", "guid": "good"},
                {"name": "broken view", "guid": "bad"}
            ]}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path(format!(
            "/modelderivative/v2/designdata/{}/metadata/good/properties",
            seg(D1)
        ));
        then.status(200).json_body(serde_json::json!({"data": {}}));
    });
    server.mock(|when, then| {
        when.method(GET).path(format!(
            "/modelderivative/v2/designdata/{}/metadata/good",
            seg(D1)
        ));
        then.status(200).json_body(serde_json::json!({"data": {}}));
    });
    server.mock(|when, then| {
        when.method(GET).path(format!(
            "/modelderivative/v2/designdata/{}/metadata/bad/properties",
            seg(D1)
        ));
        then.status(500).body("property backend down");
    });

    let output_root = tempfile::tempdir().expect("tempdir");
    let translator =
        Translator::from_config(&app_config(&server, output_root.path())).expect("translator");

    let err = translator
        .extract_metadata(&DerivativeUrn::new(D1))
        .await
        .expect_err("must abort");

    match err {
        DerivativeError::ViewFetch { guid, status, .. } => {
            assert_eq!(guid, "bad");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn status_source_reuses_one_token_for_the_batch() {
    let server = MockServer::start();

    let token = server.mock(|when, then| {
        when.method(POST).path("/authentication/v1/authenticate");
        then.status(200).json_body(serde_json::json!({
            "access_token": "batch-token",
            "expires_in": 3599
        }));
    });
    let manifest = server.mock(|when, then| {
        when.method(GET)
            .path(design_path("/manifest"))
            .header("authorization", "Bearer batch-token");
        then.status(200)
            .json_body(serde_json::json!({"progress": "complete"}));
    });

    let service = ServiceConfig {
        base_url: server.base_url(),
        request_timeout_seconds: 5,
        transfer_timeout_seconds: 5,
    };
    let tokens = TokenProvider::new(
        &service,
        ClientCredentials::new("client-id", "client-secret"),
    )
    .expect("provider");
    let client = DerivativeClient::new(&service).expect("client");

    let issued = tokens
        .acquire(derivo_core::types::Scope::DATA_RW)
        .await
        .expect("token");
    let source = client.status_source(issued);

    use derivo_derivative::ManifestSource;
    let urn = Urn::new(DESIGN_URN);
    source.fetch(&urn).await.expect("first");
    source.fetch(&urn).await.expect("second");

    token.assert_hits(1);
    manifest.assert_hits(2);
}
