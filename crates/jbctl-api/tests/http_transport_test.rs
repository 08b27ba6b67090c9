// Integration tests for `HttpTransport` using wiremock.
//
// The transport is blocking, so each exchange runs on a blocking thread
// while the mock server keeps serving on the tokio runtime.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jbctl_api::model::{FAILURE_DESCRIPTION, OUTCOME, RESULT};
use jbctl_api::{
    ConnectParams, Error, HttpTransport, ModelNode, OperationRequest, Session, TransportFactory,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn mount_probe(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/management"))
        .and(body_partial_json(json!({
            "operation": "read-attribute",
            "address": [],
            "name": "management-major-version"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "outcome": "success", "result": 1 })),
        )
        .mount(server)
        .await;
}

/// Connect (optionally with credentials), run `command`, and return the raw
/// response node.
async fn exchange(
    server: &MockServer,
    credentials: Option<(&'static str, &'static str)>,
    command: &'static str,
) -> Result<ModelNode, Error> {
    let addr = *server.address();
    tokio::task::spawn_blocking(move || {
        let host = addr.ip().to_string();
        let password = credentials.map(|(_, p)| SecretString::from(p));
        let params = ConnectParams {
            host: &host,
            port: addr.port(),
            username: credentials.map(|(u, _)| u),
            password: password.as_ref(),
        };
        let mut session = HttpTransport::default().connect(&params)?;
        let response = session.execute(&OperationRequest::parse(command).unwrap());
        session.disconnect();
        response
    })
    .await
    .unwrap()
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_read_attribute_success() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .and(body_partial_json(json!({
            "operation": "read-attribute",
            "address": [{ "subsystem": "web" }],
            "name": "default-virtual-server"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outcome": "success",
            "result": "default-host"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = exchange(
        &server,
        None,
        "/subsystem=web:read-attribute(name=default-virtual-server)",
    )
    .await
    .unwrap();

    assert_eq!(response, ModelNode::success("default-host"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_numeric_result_keeps_width() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .and(body_partial_json(json!({ "name": "big" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outcome": "success",
            "result": 10_000_000_000_i64
        })))
        .mount(&server)
        .await;

    let response = exchange(&server, None, ":read-attribute(name=big)")
        .await
        .unwrap();

    assert_eq!(response.get(RESULT), Some(&ModelNode::Long(10_000_000_000)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_small_long_result_comes_back_as_int() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .and(body_partial_json(json!({ "name": "uptime" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outcome": "success",
            "result": 42_i64
        })))
        .mount(&server)
        .await;

    let response = exchange(&server, None, ":read-attribute(name=uptime)")
        .await
        .unwrap();

    assert_eq!(response.get(RESULT), Some(&ModelNode::Int(42)));
}

// ── Failed operations ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_operation_is_a_response_not_an_error() {
    let server = MockServer::start().await;
    mount_probe(&server).await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .and(body_partial_json(json!({ "address": [{ "no": "such" }] })))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "outcome": "failed",
            "failure-description": "JBAS014807: Management resource '[(\"no\" => \"such\")]' not found",
            "rolled-back": true
        })))
        .mount(&server)
        .await;

    let response = exchange(&server, None, "/no=such:read-attribute(name=x)")
        .await
        .unwrap();

    assert_eq!(response.get(OUTCOME).and_then(ModelNode::as_str), Some("failed"));
    assert!(
        response
            .get(FAILURE_DESCRIPTION)
            .and_then(ModelNode::as_str)
            .unwrap()
            .starts_with("JBAS014807")
    );
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_basic_auth_header_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "outcome": "success",
            "result": true
        })))
        .expect(2)
        .mount(&server)
        .await;

    let response = exchange(&server, Some(("admin", "secret")), ":read-attribute(name=x)")
        .await
        .unwrap();

    assert_eq!(response.get(RESULT), Some(&ModelNode::Boolean(true)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_fails_connect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = exchange(&server, Some(("admin", "wrong")), ":read-attribute(name=x)")
        .await
        .unwrap_err();

    assert!(err.is_auth(), "expected Authentication, got: {err:?}");
}

// ── Non-management replies ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_non_json_body_is_deserialization_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .mount(&server)
        .await;

    let err = exchange(&server, None, ":read-attribute(name=x)")
        .await
        .unwrap_err();

    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>hello</html>"),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unexpected_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/management"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let err = exchange(&server, None, ":read-attribute(name=x)")
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Http { status: 404, .. }),
        "expected Http 404, got: {err:?}"
    );
}
