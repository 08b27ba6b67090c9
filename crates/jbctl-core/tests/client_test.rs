// Integration tests for `ControllerClient` against the in-memory controller.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use jbctl_api::{InMemoryController, ModelNode, ResourcePath};
use jbctl_core::{
    AttributeValue, ClientSettings, ConnectionState, ControllerAddress, ControllerClient,
    CoreError, TransportKind,
};
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};

// ── Helpers ─────────────────────────────────────────────────────────

fn setup() -> (InMemoryController, ControllerClient) {
    let controller = InMemoryController::new();
    let client = ControllerClient::new(ControllerAddress::default(), Arc::new(controller.clone()));
    (controller, client)
}

fn web() -> ResourcePath {
    ResourcePath::parse("/subsystem=web").unwrap()
}

// ── State machine ───────────────────────────────────────────────────

#[test]
fn test_created_disconnected() {
    let (controller, client) = setup();
    assert!(!client.is_connected());
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert_eq!(controller.open_sessions(), 0);
}

#[test]
fn test_read_before_connect_fails() {
    let (controller, mut client) = setup();
    controller.install(&web(), "native", false);

    let err = client.get_attribute_value("/subsystem=web", "native").unwrap_err();
    assert!(matches!(err, CoreError::NotConnected { .. }));
    assert!(err.to_string().contains("not connected"));
    assert!(controller.executed().is_empty());
}

#[test]
fn test_connect_twice_is_tolerated() {
    let (controller, mut client) = setup();
    client.connect().unwrap();
    client.connect().unwrap();
    assert!(client.is_connected());
    assert_eq!(controller.open_sessions(), 1);
}

#[test]
fn test_disconnect_is_idempotent() {
    let (controller, mut client) = setup();
    client.connect().unwrap();
    client.disconnect();
    client.disconnect();
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert_eq!(controller.open_sessions(), 0);

    let err = client.get_attribute_value("/", "x").unwrap_err();
    assert!(matches!(err, CoreError::NotConnected { .. }));
}

#[test]
fn test_reconnect_after_disconnect() {
    let (controller, mut client) = setup();
    controller.install(&ResourcePath::root(), "release-version", "7.1.1.Final");

    client.connect().unwrap();
    client.disconnect();
    client.connect().unwrap();

    let value = client.get_attribute_value("/", "release-version").unwrap();
    assert_eq!(value, Some(AttributeValue::String("7.1.1.Final".into())));
}

#[test]
fn test_drop_releases_session() {
    let (controller, mut client) = setup();
    client.connect().unwrap();
    assert_eq!(controller.open_sessions(), 1);
    drop(client);
    assert_eq!(controller.open_sessions(), 0);
}

#[test]
fn test_connection_failure_leaves_client_disconnected() {
    let (controller, mut client) = setup();
    controller.refuse_connections("nobody home");

    let err = client.connect().unwrap_err();
    match &err {
        CoreError::ConnectionFailed { address, source } => {
            assert_eq!(address, "localhost:9999");
            assert!(source.is_connect());
        }
        other => panic!("expected ConnectionFailed, got {other:?}"),
    }
    assert!(err.is_connection());
    assert!(!client.is_connected());
}

// ── Attribute reads ─────────────────────────────────────────────────

#[test]
fn test_installed_value_is_returned() {
    let (controller, mut client) = setup();
    controller.install(&web(), "default-virtual-server", "default-host");
    controller.install(&web(), "max-connections", 200);
    controller.install(&web(), "bytes-sent", 10_000_000_000_i64);
    controller.install(&web(), "native", false);
    controller.install(&web(), "load", 0.75);

    client.connect().unwrap();

    assert_eq!(
        client
            .get_attribute_value("/subsystem=web", "default-virtual-server")
            .unwrap(),
        Some(AttributeValue::String("default-host".into()))
    );
    assert_eq!(
        client.get_attribute_value("/subsystem=web", "max-connections").unwrap(),
        Some(AttributeValue::Int(200))
    );
    assert_eq!(
        client.get_attribute_value("/subsystem=web", "bytes-sent").unwrap(),
        Some(AttributeValue::Long(10_000_000_000))
    );
    assert_eq!(
        client.get_attribute_value("/subsystem=web", "native").unwrap(),
        Some(AttributeValue::Boolean(false))
    );
    assert_eq!(
        client.get_attribute_value("/subsystem=web", "load").unwrap(),
        Some(AttributeValue::Double(0.75))
    );
}

#[test]
fn test_unknown_attribute_on_known_path_is_none() {
    let (controller, mut client) = setup();
    controller.install(&web(), "native", false);
    client.connect().unwrap();

    assert_eq!(client.get_attribute_value("/subsystem=web", "no-such").unwrap(), None);
}

#[test]
fn test_undefined_attribute_is_none() {
    let (controller, mut client) = setup();
    controller.install(&web(), "proxy-name", ModelNode::Undefined);
    client.connect().unwrap();

    assert_eq!(client.get_attribute_value("/subsystem=web", "proxy-name").unwrap(), None);
}

#[test]
fn test_unknown_path_is_operation_failure() {
    let (_controller, mut client) = setup();
    client.connect().unwrap();

    let err = client
        .get_attribute_value("/subsystem=nosuch", "native")
        .unwrap_err();
    match err {
        CoreError::OperationFailed { description } => {
            assert!(
                description.contains("No resource definition is registered for address"),
                "{description}"
            );
            assert!(description.contains(r#"("subsystem" => "nosuch")"#));
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[test]
fn test_unsupported_result_type() {
    let (controller, mut client) = setup();
    controller.install(&web(), "virtual-servers", vec![ModelNode::from("default-host")]);
    client.connect().unwrap();

    let err = client
        .get_attribute_value("/subsystem=web", "virtual-servers")
        .unwrap_err();
    assert_eq!(err.to_string(), "unsupported response type LIST");
}

#[test]
fn test_malformed_path_fails_before_submission() {
    let (controller, mut client) = setup();
    client.connect().unwrap();

    for (path, attribute) in [
        ("/subsystem", "native"),
        ("/subsystem=", "native"),
        ("//subsystem=web", "native"),
        ("/subsystem=web", ""),
        ("/subsystem=web", "a,b"),
    ] {
        let err = client.get_attribute_value(path, attribute).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidRequest(_)),
            "{path:?} {attribute:?}: expected InvalidRequest, got {err:?}"
        );
    }
    assert!(controller.executed().is_empty());
}

#[test]
fn test_request_shape() {
    let (controller, mut client) = setup();
    controller.install(&web(), "native", false);
    client.connect().unwrap();
    client.get_attribute_value("subsystem=web", "native").unwrap();

    assert_eq!(
        controller.executed(),
        vec!["/subsystem=web:read-attribute(name=native)".to_owned()]
    );
}

// ── Address handling ────────────────────────────────────────────────

#[test]
fn test_set_controller_address_does_not_reconnect() {
    let (controller, mut client) = setup();
    client.connect().unwrap();

    let other = ControllerAddress::parse("admin:secret@example.com:9990").unwrap();
    client.set_controller_address(other.clone());

    assert!(client.is_connected());
    assert_eq!(controller.open_sessions(), 1);
    assert_eq!(client.address(), &other);
    assert_eq!(client.host(), "example.com");
    assert_eq!(client.port(), 9990);
    assert_eq!(client.username(), Some("admin"));
    assert_eq!(client.password().unwrap().expose_secret(), "secret");
    assert_eq!(client.to_string(), "admin:***@example.com:9990");
}

#[test]
fn test_address_is_copied_into_client() {
    let address = ControllerAddress::with_host("example.com")
        .unwrap()
        .with_credentials("admin", SecretString::from("secret"))
        .unwrap();
    let client = ControllerClient::new(address.clone(), Arc::new(InMemoryController::new()));
    drop(address);
    assert_eq!(client.password().unwrap().expose_secret(), "secret");
}

// ── Settings ────────────────────────────────────────────────────────

#[test]
fn test_from_settings_with_memory_transport() {
    let settings = ClientSettings::default().with_transport(TransportKind::Memory);
    let mut client = ControllerClient::from_settings(&settings).unwrap();
    client.connect().unwrap();

    // The bare in-memory controller only knows the root resource.
    assert_eq!(client.get_attribute_value("/", "anything").unwrap(), None);
    assert!(matches!(
        client.get_attribute_value("/a=b", "anything").unwrap_err(),
        CoreError::OperationFailed { .. }
    ));
}
