// ── Operation requests ──
//
// Resource paths (`/subsystem=web/connector=http`) and the operations
// executed against them. Commands use the management CLI form
// `path:operation(param=value,...)`; parsing happens before anything is
// sent, so a malformed path never reaches a transport.

use std::fmt;

use indexmap::IndexMap;

use crate::error::Error;
use crate::model::{ADDRESS, ModelNode, NAME, OPERATION};

pub const READ_ATTRIBUTE: &str = "read-attribute";

// ── ResourcePath ────────────────────────────────────────────────────

/// An ordered list of `type=name` pairs addressing a management resource.
/// The empty list is the root resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResourcePath {
    segments: Vec<(String, String)>,
}

impl ResourcePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `/a=b/c=d`. The leading slash is optional and `/` (or the empty
    /// string) is the root.
    pub fn parse(path: &str) -> Result<Self, Error> {
        parse_segments(path).map_err(|reason| Error::InvalidOperation {
            command: path.to_owned(),
            reason,
        })
    }

    /// Append a `type=name` segment.
    pub fn child(mut self, node_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.segments.push((node_type.into(), name.into()));
        self
    }

    pub fn segments(&self) -> &[(String, String)] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The wire form: a list of property nodes.
    pub fn to_model_node(&self) -> ModelNode {
        ModelNode::List(
            self.segments
                .iter()
                .map(|(k, v)| ModelNode::property(k.as_str(), v.as_str()))
                .collect(),
        )
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for (node_type, name) in &self.segments {
            write!(f, "/{node_type}={name}")?;
        }
        Ok(())
    }
}

fn parse_segments(path: &str) -> Result<ResourcePath, String> {
    let trimmed = path.trim();
    let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let body = body.strip_suffix('/').unwrap_or(body);

    if body.is_empty() {
        return Ok(ResourcePath::root());
    }

    let mut segments = Vec::new();
    for segment in body.split('/') {
        if segment.is_empty() {
            return Err("empty path segment".into());
        }
        let Some((node_type, name)) = segment.split_once('=') else {
            return Err(format!("segment '{segment}' is not of the form type=name"));
        };
        if node_type.is_empty() {
            return Err(format!("missing node type in segment '{segment}'"));
        }
        if name.is_empty() {
            return Err(format!("missing node name in segment '{segment}'"));
        }
        segments.push((node_type.to_owned(), name.to_owned()));
    }
    Ok(ResourcePath { segments })
}

// ── OperationRequest ────────────────────────────────────────────────

/// A single management operation: target address, operation name, and
/// string-valued parameters in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    address: ResourcePath,
    operation: String,
    parameters: IndexMap<String, ModelNode>,
}

impl OperationRequest {
    pub fn new(address: ResourcePath, operation: impl Into<String>) -> Self {
        Self {
            address,
            operation: operation.into(),
            parameters: IndexMap::new(),
        }
    }

    /// `address:read-attribute(name=<name>)`
    pub fn read_attribute(address: ResourcePath, name: impl Into<String>) -> Self {
        Self::new(address, READ_ATTRIBUTE).with_parameter(NAME, ModelNode::String(name.into()))
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<ModelNode>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Parse a command of the form `path:operation(param=value,...)`.
    ///
    /// The parameter list is optional. Values may be wrapped in double
    /// quotes; unquoted values must not contain `=`, `(` or `)`.
    pub fn parse(command: &str) -> Result<Self, Error> {
        parse_command(command).map_err(|reason| Error::InvalidOperation {
            command: command.to_owned(),
            reason,
        })
    }

    pub fn address(&self) -> &ResourcePath {
        &self.address
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn parameter(&self, name: &str) -> Option<&ModelNode> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &ModelNode)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The wire form sent to the controller.
    pub fn to_model_node(&self) -> ModelNode {
        let mut node = ModelNode::object()
            .with(OPERATION, self.operation.as_str())
            .with(ADDRESS, self.address.to_model_node());
        for (name, value) in &self.parameters {
            node.set(name.as_str(), value.clone());
        }
        node
    }
}

impl fmt::Display for OperationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.address.is_root() {
            write!(f, "{}", self.address)?;
        }
        write!(f, ":{}", self.operation)?;
        if !self.parameters.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in self.parameters.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{name}={}", value.to_text())?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

fn parse_command(command: &str) -> Result<OperationRequest, String> {
    let command = command.trim();
    let Some((path, rest)) = command.split_once(':') else {
        return Err("missing operation; expected path:operation(...)".into());
    };

    let address = parse_segments(path)?;

    let (operation, params) = match rest.find('(') {
        Some(open) => {
            let Some(inner) = rest[open + 1..].strip_suffix(')') else {
                return Err("unterminated parameter list".into());
            };
            (&rest[..open], Some(inner))
        }
        None => (rest, None),
    };

    if operation.is_empty() {
        return Err("missing operation name".into());
    }
    if let Some(c) = operation
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("invalid character '{c}' in operation name '{operation}'"));
    }

    let mut request = OperationRequest::new(address, operation);
    if let Some(params) = params.filter(|p| !p.trim().is_empty()) {
        for param in params.split(',') {
            let (name, value) = parse_parameter(param.trim())?;
            request = request.with_parameter(name, value);
        }
    }

    if request.operation == READ_ATTRIBUTE && request.parameter(NAME).is_none() {
        return Err(format!("{READ_ATTRIBUTE} requires a '{NAME}' parameter"));
    }

    Ok(request)
}

fn parse_parameter(param: &str) -> Result<(String, String), String> {
    let Some((name, value)) = param.split_once('=') else {
        return Err(format!("parameter '{param}' has no value"));
    };
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{param}'"));
    }

    let value = match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(quoted) => quoted,
        None => {
            if value.contains(['=', '(', ')']) {
                return Err(format!("invalid value '{value}' for parameter '{name}'"));
            }
            value
        }
    };
    if value.is_empty() {
        return Err(format!("empty value for parameter '{name}'"));
    }

    Ok((name.to_owned(), value.to_owned()))
}
