//! Dynamically typed connection string input.
//!
//! Callers that receive connection strings from untyped sources (scripting
//! bindings, JSON configuration) hand them to the parser as a
//! [`ConnectionInput`]. Only the `Text` variant is ever parsed; every other
//! variant is rejected before any scanning happens.

use serde_json::Value;

use crate::error::{ParseError, ParseResult};

/// A value that should be a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionInput {
    /// Nothing was supplied.
    Absent,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool,
    /// A number.
    Number,
    /// Text, the only parseable variant.
    Text(String),
    /// A list of values.
    Array,
    /// A key/value object.
    Object,
}

impl ConnectionInput {
    /// Get the name of the supplied type, as reported in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "undefined",
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::Text(_) => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Get the text, rejecting absent and non-text values.
    pub fn into_text(self) -> ParseResult<String> {
        match self {
            Self::Absent => Err(ParseError::MissingConnectionString),
            Self::Text(text) => Ok(text),
            other => Err(ParseError::IncorrectType {
                found: other.type_name(),
            }),
        }
    }
}

impl From<&str> for ConnectionInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConnectionInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for ConnectionInput {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<Option<&str>> for ConnectionInput {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Self::Absent, Self::from)
    }
}

impl From<Value> for ConnectionInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(s) => Self::Text(s),
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl From<&Value> for ConnectionInput {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl From<Option<&Value>> for ConnectionInput {
    fn from(value: Option<&Value>) -> Self {
        value.map_or(Self::Absent, Self::from)
    }
}
