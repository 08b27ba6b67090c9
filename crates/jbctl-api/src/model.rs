// ── Management model ──
//
// `ModelNode` is the structured value every management operation speaks:
// requests are object nodes, responses are object nodes carrying an
// `outcome` plus either a typed `result` or a `failure-description`.
// The HTTP transport maps it to and from JSON; the in-memory controller
// builds it directly.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use strum::{Display, EnumString};

// ── Well-known keys and outcomes ────────────────────────────────────

pub const OUTCOME: &str = "outcome";
pub const RESULT: &str = "result";
pub const FAILURE_DESCRIPTION: &str = "failure-description";
pub const SUCCESS: &str = "success";
pub const FAILED: &str = "failed";
pub const OPERATION: &str = "operation";
pub const ADDRESS: &str = "address";
pub const NAME: &str = "name";

// JSON envelope keys for types JSON cannot express natively.
const EXPRESSION_VALUE: &str = "EXPRESSION_VALUE";
const TYPE_MODEL_VALUE: &str = "TYPE_MODEL_VALUE";

// ── ModelType ───────────────────────────────────────────────────────

/// The type tag of a [`ModelNode`], rendered the way the controller names it
/// (`STRING`, `BIG_DECIMAL`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    BigDecimal,
    BigInteger,
    Boolean,
    Bytes,
    Double,
    Expression,
    Int,
    List,
    Long,
    Object,
    Property,
    String,
    Type,
    Undefined,
}

// ── ModelNode ───────────────────────────────────────────────────────

/// A dynamically typed management value.
///
/// Numeric variants keep their native width: an `Int` is never silently
/// widened to a `Long`, and a `Double` is never truncated.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelNode {
    #[default]
    Undefined,
    String(String),
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    /// Arbitrary-precision decimal, kept in its textual form.
    BigDecimal(String),
    /// Arbitrary-precision integer, kept in its textual form.
    BigInteger(String),
    Bytes(Vec<u8>),
    Expression(String),
    List(Vec<ModelNode>),
    Object(IndexMap<String, ModelNode>),
    Property(String, Box<ModelNode>),
    Type(ModelType),
}

impl ModelNode {
    /// An empty object node.
    pub fn object() -> Self {
        Self::Object(IndexMap::new())
    }

    /// A property node (`("name" => value)`).
    pub fn property(name: impl Into<String>, value: impl Into<ModelNode>) -> Self {
        Self::Property(name.into(), Box::new(value.into()))
    }

    /// Builder-style insert. A node that is not already an object is
    /// replaced by a fresh object first.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ModelNode>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert `key => value`, turning the node into an object if needed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ModelNode>) {
        if !matches!(self, Self::Object(_)) {
            *self = Self::object();
        }
        if let Self::Object(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Build a successful operation response carrying `value` as its result.
    pub fn success(value: impl Into<ModelNode>) -> Self {
        Self::object()
            .with(OUTCOME, SUCCESS)
            .with(RESULT, value)
    }

    /// Build a failed operation response with the given description.
    pub fn failure(description: impl Into<String>) -> Self {
        Self::object()
            .with(OUTCOME, FAILED)
            .with(FAILURE_DESCRIPTION, ModelNode::String(description.into()))
    }

    pub fn model_type(&self) -> ModelType {
        match self {
            Self::Undefined => ModelType::Undefined,
            Self::String(_) => ModelType::String,
            Self::Boolean(_) => ModelType::Boolean,
            Self::Int(_) => ModelType::Int,
            Self::Long(_) => ModelType::Long,
            Self::Double(_) => ModelType::Double,
            Self::BigDecimal(_) => ModelType::BigDecimal,
            Self::BigInteger(_) => ModelType::BigInteger,
            Self::Bytes(_) => ModelType::Bytes,
            Self::Expression(_) => ModelType::Expression,
            Self::List(_) => ModelType::List,
            Self::Object(_) => ModelType::Object,
            Self::Property(..) => ModelType::Property,
            Self::Type(_) => ModelType::Type,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Look up a key on an object node. Non-object nodes have no keys.
    pub fn get(&self, key: &str) -> Option<&ModelNode> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// `true` if `key` exists and its value is not [`Undefined`](Self::Undefined).
    pub fn has_defined(&self, key: &str) -> bool {
        self.get(key).is_some_and(ModelNode::is_defined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ModelNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Textual form used in diagnostics: strings are returned bare, every
    /// other node in its DMR rendering.
    pub fn to_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    // ── JSON mapping ─────────────────────────────────────────────────

    /// Convert a JSON value (as produced by the HTTP management endpoint)
    /// into a model node.
    ///
    /// Integral numbers that fit in 32 bits become `Int`, wider ones `Long`,
    /// and anything beyond `i64` a `BigInteger`.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Undefined,
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => number_to_node(n),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(expr)) = map.get(EXPRESSION_VALUE) {
                        return Self::Expression(expr.clone());
                    }
                    if let Some(Value::String(ty)) = map.get(TYPE_MODEL_VALUE) {
                        if let Ok(model_type) = ty.parse() {
                            return Self::Type(model_type);
                        }
                    }
                }
                Self::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Self::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Convert to the JSON request encoding. Properties become single-entry
    /// objects, which is how the management endpoint expects address
    /// elements.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Undefined => Value::Null,
            Self::String(s) | Self::BigDecimal(s) | Self::BigInteger(s) => Value::String(s.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Long(l) => Value::from(*l),
            Self::Double(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
            Self::Bytes(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
            Self::Expression(expr) => single_entry(EXPRESSION_VALUE, Value::String(expr.clone())),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Property(name, value) => single_entry(name, value.to_json()),
            Self::Type(t) => single_entry(TYPE_MODEL_VALUE, Value::String(t.to_string())),
        }
    }
}

fn number_to_node(n: &Number) -> ModelNode {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).map_or(ModelNode::Long(i), ModelNode::Int);
    }
    if n.is_u64() {
        return ModelNode::BigInteger(n.to_string());
    }
    n.as_f64()
        .map_or_else(|| ModelNode::BigDecimal(n.to_string()), ModelNode::Double)
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_owned(), value);
    Value::Object(map)
}

// ── DMR text rendering ──────────────────────────────────────────────

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for ModelNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::String(s) => write_quoted(f, s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}L"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::BigDecimal(s) => write!(f, "big decimal {s}"),
            Self::BigInteger(s) => write!(f, "big integer {s}"),
            Self::Bytes(bytes) => {
                write!(f, "bytes {{")?;
                for (i, b) in bytes.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}0x{b:02x}")?;
                }
                write!(f, " }}")
            }
            Self::Expression(expr) => {
                write!(f, "expression ")?;
                write_quoted(f, expr)
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_quoted(f, k)?;
                    write!(f, " => {v}")?;
                }
                write!(f, "}}")
            }
            Self::Property(name, value) => {
                write!(f, "(")?;
                write_quoted(f, name)?;
                write!(f, " => {value})")
            }
            Self::Type(t) => write!(f, "{t}"),
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<&str> for ModelNode {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for ModelNode {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ModelNode {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for ModelNode {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<i64> for ModelNode {
    fn from(l: i64) -> Self {
        Self::Long(l)
    }
}

impl From<f64> for ModelNode {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<ModelType> for ModelNode {
    fn from(t: ModelType) -> Self {
        Self::Type(t)
    }
}

impl From<Vec<ModelNode>> for ModelNode {
    fn from(items: Vec<ModelNode>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn model_type_renders_controller_names() {
        assert_eq!(ModelType::BigDecimal.to_string(), "BIG_DECIMAL");
        assert_eq!(ModelType::Undefined.to_string(), "UNDEFINED");
        assert_eq!("BIG_INTEGER".parse::<ModelType>().unwrap(), ModelType::BigInteger);
    }

    #[test]
    fn set_on_undefined_creates_object() {
        let mut node = ModelNode::Undefined;
        node.set(OUTCOME, SUCCESS);
        assert_eq!(node.model_type(), ModelType::Object);
        assert_eq!(node.get(OUTCOME).and_then(ModelNode::as_str), Some(SUCCESS));
    }

    #[test]
    fn has_defined_ignores_undefined_values() {
        let node = ModelNode::object()
            .with(OUTCOME, SUCCESS)
            .with(RESULT, ModelNode::Undefined);
        assert!(node.has_defined(OUTCOME));
        assert!(!node.has_defined(RESULT));
        assert!(!node.has_defined("missing"));
    }

    #[test]
    fn success_builder_keeps_result_type() {
        let node = ModelNode::success(1);
        assert_eq!(node.get(RESULT).unwrap().model_type(), ModelType::Int);

        let node = ModelNode::success("test");
        assert_eq!(node.get(RESULT).unwrap().as_str(), Some("test"));
    }

    #[test]
    fn failure_builder_sets_description() {
        let node = ModelNode::failure("some failure description");
        assert_eq!(node.get(OUTCOME).unwrap().as_str(), Some(FAILED));
        assert_eq!(
            node.get(FAILURE_DESCRIPTION).unwrap().as_str(),
            Some("some failure description")
        );
    }

    #[test]
    fn display_address_list() {
        let address = ModelNode::List(vec![ModelNode::property("a", "b")]);
        insta::assert_snapshot!(address.to_string(), @r#"[("a" => "b")]"#);
    }

    #[test]
    fn display_object_and_scalars() {
        let node = ModelNode::object()
            .with("long", 10_i64)
            .with("double", 10.0)
            .with("big", ModelNode::BigDecimal("1".into()))
            .with("quoted", "say \"hi\"");
        insta::assert_snapshot!(
            node.to_string(),
            @r#"{"long" => 10L, "double" => 10.0, "big" => big decimal 1, "quoted" => "say \"hi\""}"#
        );
    }

    #[test]
    fn from_json_preserves_numeric_width() {
        let node = ModelNode::from_json(&json!({
            "int": 10,
            "long": 5_000_000_000_i64,
            "double": 10.1,
            "undefined": null,
        }));
        assert_eq!(node.get("int"), Some(&ModelNode::Int(10)));
        assert_eq!(node.get("long"), Some(&ModelNode::Long(5_000_000_000)));
        assert_eq!(node.get("double"), Some(&ModelNode::Double(10.1)));
        assert_eq!(node.get("undefined"), Some(&ModelNode::Undefined));
    }

    #[test]
    fn from_json_decodes_envelopes() {
        let node = ModelNode::from_json(&json!({ "EXPRESSION_VALUE": "${jboss.home}" }));
        assert_eq!(node, ModelNode::Expression("${jboss.home}".into()));

        let node = ModelNode::from_json(&json!({ "TYPE_MODEL_VALUE": "STRING" }));
        assert_eq!(node, ModelNode::Type(ModelType::String));
    }

    #[test]
    fn to_json_encodes_properties_as_single_entry_objects() {
        let request = ModelNode::object()
            .with(OPERATION, "read-attribute")
            .with(ADDRESS, vec![ModelNode::property("subsystem", "web")])
            .with(NAME, "default-virtual-server");
        assert_eq!(
            request.to_json(),
            json!({
                "operation": "read-attribute",
                "address": [{ "subsystem": "web" }],
                "name": "default-virtual-server",
            })
        );
    }
}
