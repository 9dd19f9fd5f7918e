//! Typed view over the parser's JSON syntax tree.
//!
//! The parser collaborator returns an untyped JSON document. It is converted
//! once into [`AstValue`] so the builder can match on shape instead of probing
//! fields. Conversion never fails: any JSON value has a representation.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Field holding a node's type tag.
pub const TYPE_FIELD: &str = "type";
/// Field holding a node's scalar payload.
pub const VALUE_FIELD: &str = "value";
/// Field holding a node's source span.
pub const LOCATION_FIELD: &str = "location";

/// A leaf JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Source span `[startLine, startColumn, endLine, endColumn]`.
///
/// Lines are 1-based and columns 0-based, matching `stree json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "[u64; 4]")]
pub struct SourceLocation {
    pub start_line: u64,
    pub start_column: u64,
    pub end_line: u64,
    pub end_column: u64,
}

impl From<SourceLocation> for [u64; 4] {
    fn from(loc: SourceLocation) -> Self {
        [loc.start_line, loc.start_column, loc.end_line, loc.end_column]
    }
}

impl SourceLocation {
    /// Parse a `location` value. Anything other than exactly four
    /// non-negative integers yields `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Array(items) = value else {
            return None;
        };
        let [a, b, c, d] = items.as_slice() else {
            return None;
        };
        Some(Self {
            start_line: a.as_u64()?,
            start_column: b.as_u64()?,
            end_line: c.as_u64()?,
            end_column: d.as_u64()?,
        })
    }
}

/// A mapping carrying a string `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedNode {
    pub kind: String,
    pub location: Option<SourceLocation>,
    /// Remaining fields in document order, without `type` and without a
    /// well-formed `location`.
    pub fields: Vec<(String, Arc<AstValue>)>,
}

/// One value of the external syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum AstValue {
    Scalar(Scalar),
    Sequence(Vec<Arc<AstValue>>),
    Node(TypedNode),
    Mapping(Vec<(String, Arc<AstValue>)>),
}

impl AstValue {
    /// The node's `value` field, when it is a string.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        let Self::Node(node) = self else {
            return None;
        };
        node.fields
            .iter()
            .find(|(key, _)| key == VALUE_FIELD)
            .and_then(|(_, value)| match value.as_ref() {
                Self::Scalar(Scalar::String(s)) => Some(s.as_str()),
                _ => None,
            })
    }

    /// The node's type tag, if it is a typed node.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Node(node) => Some(&node.kind),
            _ => None,
        }
    }

    /// The node's source span, if it is a typed node with a valid `location`.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::Node(node) => node.location,
            _ => None,
        }
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    /// Convert back to plain JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(scalar) => scalar_to_json(scalar),
            Self::Sequence(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            Self::Node(node) => {
                let mut map = Map::new();
                map.insert(TYPE_FIELD.to_owned(), Value::String(node.kind.clone()));
                if let Some(loc) = node.location {
                    map.insert(
                        LOCATION_FIELD.to_owned(),
                        Value::from(<[u64; 4]>::from(loc).to_vec()),
                    );
                }
                for (key, value) in &node.fields {
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
            Self::Mapping(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Number(n) => Value::Number(n.clone()),
        Scalar::String(s) => Value::String(s.clone()),
    }
}

impl From<Value> for AstValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(|v| Arc::new(Self::from(v))).collect()),
            Value::Object(map) => from_object(map),
        }
    }
}

fn from_object(map: Map<String, Value>) -> AstValue {
    let kind = match map.get(TYPE_FIELD) {
        Some(Value::String(kind)) => Some(kind.clone()),
        _ => None,
    };

    let Some(kind) = kind else {
        return AstValue::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, Arc::new(AstValue::from(value))))
                .collect(),
        );
    };

    let location = map.get(LOCATION_FIELD).and_then(SourceLocation::from_json);
    let fields = map
        .into_iter()
        .filter(|(key, _)| key != TYPE_FIELD && !(key == LOCATION_FIELD && location.is_some()))
        .map(|(key, value)| (key, Arc::new(AstValue::from(value))))
        .collect();

    AstValue::Node(TypedNode { kind, location, fields })
}

#[cfg(test)]
#[path = "ast_test.rs"]
mod tests;
