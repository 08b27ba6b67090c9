// In-process management controller.
//
// Holds a map of resource path -> attributes and answers operations the way
// a real controller does, including its failure descriptions. Used as the
// substitutable transport in tests and for offline fixture files.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::model::{ModelNode, NAME};
use crate::operation::{OperationRequest, READ_ATTRIBUTE, ResourcePath};
use crate::transport::{ConnectParams, Session, TransportFactory};

const READ_RESOURCE: &str = "read-resource";

type Attributes = IndexMap<String, ModelNode>;

#[derive(Debug, Default)]
struct State {
    resources: IndexMap<ResourcePath, Attributes>,
    refused: Option<String>,
    open_sessions: usize,
    executed: Vec<String>,
}

/// A shared in-memory controller. Clones observe the same state, so a test
/// can keep a handle while a client owns the factory.
#[derive(Debug, Clone)]
pub struct InMemoryController {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryController {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryController {
    /// A controller with only the (empty) root resource.
    pub fn new() -> Self {
        let mut state = State::default();
        state.resources.insert(ResourcePath::root(), Attributes::new());
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Load a controller from a JSON fixture of the form
    /// `{"/subsystem=web": {"attr": value, ...}, ...}`.
    pub fn from_json(fixture: &Value) -> Result<Self, Error> {
        let Value::Object(paths) = fixture else {
            return Err(Error::Fixture {
                message: "top-level value must be an object keyed by resource path".into(),
            });
        };

        let controller = Self::new();
        for (path, attributes) in paths {
            let path = ResourcePath::parse(path).map_err(|e| Error::Fixture {
                message: e.to_string(),
            })?;
            let Value::Object(attributes) = attributes else {
                return Err(Error::Fixture {
                    message: format!("attributes of {path} must be an object"),
                });
            };
            controller.add_resource(&path);
            for (name, value) in attributes {
                controller.install(&path, name, ModelNode::from_json(value));
            }
        }
        Ok(controller)
    }

    /// Read a JSON fixture file.
    pub fn from_fixture_file(path: &Path) -> Result<Self, Error> {
        let body = std::fs::read_to_string(path).map_err(|e| Error::Fixture {
            message: format!("{}: {e}", path.display()),
        })?;
        let json: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;
        Self::from_json(&json)
    }

    /// Register a resource with no attributes. Existing resources are kept.
    pub fn add_resource(&self, path: &ResourcePath) {
        self.lock().resources.entry(path.clone()).or_default();
    }

    /// Set `attribute` on the resource at `path`, creating the resource if
    /// needed.
    pub fn install(&self, path: &ResourcePath, attribute: &str, value: impl Into<ModelNode>) {
        self.lock()
            .resources
            .entry(path.clone())
            .or_default()
            .insert(attribute.to_owned(), value.into());
    }

    /// Make every subsequent `connect` fail with `reason`.
    pub fn refuse_connections(&self, reason: impl Into<String>) {
        self.lock().refused = Some(reason.into());
    }

    pub fn accept_connections(&self) {
        self.lock().refused = None;
    }

    /// Sessions opened and not yet disconnected.
    pub fn open_sessions(&self) -> usize {
        self.lock().open_sessions
    }

    /// Every request executed so far, in CLI form.
    pub fn executed(&self) -> Vec<String> {
        self.lock().executed.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, request: &OperationRequest) -> ModelNode {
        let mut state = self.lock();
        state.executed.push(request.to_string());

        let address = request.address().to_model_node();
        let Some(attributes) = state.resources.get(request.address()) else {
            return ModelNode::failure(format!(
                "JBAS014883: No resource definition is registered for address {address}"
            ));
        };

        match request.operation() {
            READ_ATTRIBUTE => {
                let name = request.parameter(NAME).map(ModelNode::to_text).unwrap_or_default();
                match attributes.get(&name) {
                    Some(value) => ModelNode::success(value.clone()),
                    None => ModelNode::failure(format!("JBAS014792: Unknown attribute {name}")),
                }
            }
            READ_RESOURCE => ModelNode::success(ModelNode::Object(attributes.clone())),
            other => ModelNode::failure(format!(
                "JBAS014884: No operation named '{other}' exists at address {address}"
            )),
        }
    }
}

impl TransportFactory for InMemoryController {
    fn connect(&self, params: &ConnectParams<'_>) -> Result<Box<dyn Session>, Error> {
        let mut state = self.lock();
        if let Some(reason) = &state.refused {
            return Err(Error::Refused {
                reason: reason.clone(),
            });
        }
        state.open_sessions += 1;
        debug!(host = params.host, port = params.port, "in-memory session opened");

        Ok(Box::new(MemorySession {
            controller: self.clone(),
            closed: false,
        }))
    }
}

struct MemorySession {
    controller: InMemoryController,
    closed: bool,
}

impl Session for MemorySession {
    fn execute(&mut self, request: &OperationRequest) -> Result<ModelNode, Error> {
        if self.closed {
            return Err(Error::SessionClosed);
        }
        Ok(self.controller.answer(request))
    }

    fn disconnect(&mut self) {
        if !self.closed {
            self.closed = true;
            let mut state = self.controller.lock();
            state.open_sessions = state.open_sessions.saturating_sub(1);
        }
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{FAILURE_DESCRIPTION, RESULT};

    fn params() -> ConnectParams<'static> {
        ConnectParams {
            host: "localhost",
            port: 9999,
            username: None,
            password: None,
        }
    }

    fn read(session: &mut dyn Session, command: &str) -> ModelNode {
        session
            .execute(&OperationRequest::parse(command).unwrap())
            .unwrap()
    }

    #[test]
    fn reads_installed_attribute() {
        let controller = InMemoryController::new();
        let web = ResourcePath::parse("/subsystem=web").unwrap();
        controller.install(&web, "default-virtual-server", "default-host");

        let mut session = controller.connect(&params()).unwrap();
        let response = read(
            session.as_mut(),
            "/subsystem=web:read-attribute(name=default-virtual-server)",
        );
        assert_eq!(response, ModelNode::success("default-host"));
    }

    #[test]
    fn unknown_path_and_attribute_failures() {
        let controller = InMemoryController::new();
        controller.install(&ResourcePath::parse("/a=b").unwrap(), "x", 1);
        let mut session = controller.connect(&params()).unwrap();

        let missing_path = read(session.as_mut(), "/a=c:read-attribute(name=x)");
        assert_eq!(
            missing_path.get(FAILURE_DESCRIPTION).and_then(ModelNode::as_str),
            Some(r#"JBAS014883: No resource definition is registered for address [("a" => "c")]"#)
        );

        let missing_attr = read(session.as_mut(), "/a=b:read-attribute(name=y)");
        assert_eq!(
            missing_attr.get(FAILURE_DESCRIPTION).and_then(ModelNode::as_str),
            Some("JBAS014792: Unknown attribute y")
        );

        let bad_op = read(session.as_mut(), "/a=b:remove");
        assert_eq!(
            bad_op.get(FAILURE_DESCRIPTION).and_then(ModelNode::as_str),
            Some(r#"JBAS014884: No operation named 'remove' exists at address [("a" => "b")]"#)
        );
    }

    #[test]
    fn fixture_loading() {
        let controller = InMemoryController::from_json(&json!({
            "/": { "release-version": "7.1.1.Final" },
            "/subsystem=web": { "native": false, "max-connections": 200 },
            "/subsystem=empty": {}
        }))
        .unwrap();
        let mut session = controller.connect(&params()).unwrap();

        let version = read(session.as_mut(), ":read-attribute(name=release-version)");
        assert_eq!(version.get(RESULT).and_then(ModelNode::as_str), Some("7.1.1.Final"));

        let max = read(session.as_mut(), "/subsystem=web:read-attribute(name=max-connections)");
        assert_eq!(max.get(RESULT), Some(&ModelNode::Int(200)));

        let resource = read(session.as_mut(), "/subsystem=empty:read-resource");
        assert_eq!(resource.get(RESULT), Some(&ModelNode::object()));
    }

    #[test]
    fn fixture_must_be_an_object() {
        let err = InMemoryController::from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Fixture { .. }));

        let err = InMemoryController::from_json(&json!({ "/a": {} })).unwrap_err();
        assert!(matches!(err, Error::Fixture { .. }));
    }

    #[test]
    fn refused_connections() {
        let controller = InMemoryController::new();
        controller.refuse_connections("controller is down");
        let err = controller.connect(&params()).err().unwrap();
        assert!(err.is_connect());
        assert_eq!(err.to_string(), "Connection refused: controller is down");

        controller.accept_connections();
        assert!(controller.connect(&params()).is_ok());
    }

    #[test]
    fn session_accounting() {
        let controller = InMemoryController::new();
        let mut session = controller.connect(&params()).unwrap();
        assert_eq!(controller.open_sessions(), 1);

        session.disconnect();
        session.disconnect();
        assert_eq!(controller.open_sessions(), 0);

        let err = session
            .execute(&OperationRequest::parse(":read-resource").unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed));

        let dropped = controller.connect(&params()).unwrap();
        assert_eq!(controller.open_sessions(), 1);
        drop(dropped);
        assert_eq!(controller.open_sessions(), 0);
    }
}
