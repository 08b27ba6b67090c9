// ── Attribute response decoding ──
//
// Turns the raw response to a `read-attribute` operation into a typed
// value, `None`, or a classified error. Two failures are deliberately
// recoverable and come back as `None`: an undefined result, and a failed
// operation whose description says the attribute is unknown.

use std::fmt;

use jbctl_api::model::{FAILED, FAILURE_DESCRIPTION, OUTCOME, RESULT, SUCCESS};
use jbctl_api::{ModelNode, ModelType};
use serde::Serialize;
use tracing::trace;

use crate::error::CoreError;

const UNKNOWN_ATTRIBUTE: &str = "unknown attribute";

/// A scalar attribute value with its native width preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
}

impl AttributeValue {
    pub fn model_type(&self) -> ModelType {
        match self {
            Self::String(_) => ModelType::String,
            Self::Boolean(_) => ModelType::Boolean,
            Self::Int(_) => ModelType::Int,
            Self::Long(_) => ModelType::Long,
            Self::Double(_) => ModelType::Double,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}"),
            Self::Double(d) => write!(f, "{d}"),
        }
    }
}

impl From<AttributeValue> for ModelNode {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::String(s) => Self::String(s),
            AttributeValue::Boolean(b) => Self::Boolean(b),
            AttributeValue::Int(i) => Self::Int(i),
            AttributeValue::Long(l) => Self::Long(l),
            AttributeValue::Double(d) => Self::Double(d),
        }
    }
}

/// Classify a `read-attribute` response.
///
/// - `Ok(Some(value))`: success with a scalar result
/// - `Ok(None)`: success with an undefined result, or an unknown attribute
/// - `Err(_)`: anything else, see [`CoreError`]
pub fn decode_attribute_response(
    response: &ModelNode,
) -> Result<Option<AttributeValue>, CoreError> {
    trace!(%response, "decoding attribute response");

    let outcome = match response.get(OUTCOME) {
        Some(outcome) if outcome.is_defined() => outcome.to_text(),
        _ => {
            return Err(CoreError::MalformedResponse {
                message: format!("node has no '{OUTCOME}' key; is it an operation response?"),
            });
        }
    };

    match outcome.as_str() {
        SUCCESS => decode_result(response.get(RESULT).unwrap_or(&ModelNode::Undefined)),
        FAILED => decode_failure(response),
        other => Err(CoreError::MalformedResponse {
            message: format!("unknown operation outcome: {other}"),
        }),
    }
}

fn decode_result(result: &ModelNode) -> Result<Option<AttributeValue>, CoreError> {
    let value = match result {
        ModelNode::Undefined => return Ok(None),
        ModelNode::String(s) => AttributeValue::String(s.clone()),
        ModelNode::Boolean(b) => AttributeValue::Boolean(*b),
        ModelNode::Int(i) => AttributeValue::Int(*i),
        ModelNode::Long(l) => AttributeValue::Long(*l),
        ModelNode::Double(d) => AttributeValue::Double(*d),
        other => {
            return Err(CoreError::UnsupportedType {
                model_type: other.model_type(),
            });
        }
    };
    Ok(Some(value))
}

fn decode_failure(response: &ModelNode) -> Result<Option<AttributeValue>, CoreError> {
    let Some(description) = response
        .get(FAILURE_DESCRIPTION)
        .filter(|d| d.is_defined())
        .map(ModelNode::to_text)
    else {
        return Err(CoreError::OperationFailed {
            description: "no details".into(),
        });
    };

    if description.to_lowercase().contains(UNKNOWN_ATTRIBUTE) {
        return Ok(None);
    }
    Err(CoreError::OperationFailed { description })
}
