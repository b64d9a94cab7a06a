//! Tool calls proposed by external decision-makers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// A named tool invocation with JSON arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name, e.g. `move_player`.
    pub name: String,
    /// Tool arguments, normally a JSON object.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Create a tool call.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Typed access to tool-call arguments with decode diagnostics.
pub(crate) struct Args<'a> {
    tool: &'a str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Args<'a> {
    /// Wrap a call's arguments. `null` is treated as an empty object.
    pub(crate) fn of(call: &'a ToolCall) -> Result<Self, DecodeError> {
        let map = match &call.arguments {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => {
                return Err(DecodeError::NotAnObject {
                    tool: call.name.clone(),
                });
            }
        };
        Ok(Self {
            tool: &call.name,
            map,
        })
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(field))
            .filter(|v| !v.is_null())
    }

    fn invalid(&self, field: &'static str, value: &Value) -> DecodeError {
        DecodeError::InvalidValue {
            tool: self.tool.to_string(),
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn missing(&self, field: &'static str) -> DecodeError {
        DecodeError::MissingField {
            tool: self.tool.to_string(),
            field,
        }
    }

    pub(crate) fn invalid_str(&self, field: &'static str, value: &str) -> DecodeError {
        DecodeError::InvalidValue {
            tool: self.tool.to_string(),
            field,
            value: value.to_string(),
        }
    }

    /// Optional string argument. Empty strings read as absent.
    pub(crate) fn opt_str(&self, field: &'static str) -> Result<Option<&'a str>, DecodeError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim())),
            Some(other) => Err(self.invalid(field, other)),
        }
    }

    /// Required string argument.
    pub(crate) fn str(&self, field: &'static str) -> Result<&'a str, DecodeError> {
        self.opt_str(field)?.ok_or_else(|| self.missing(field))
    }

    /// Required integer argument. Integral strings are accepted.
    pub(crate) fn i32(&self, field: &'static str) -> Result<i32, DecodeError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.invalid(field, value))
    }

    /// Boolean argument with a default. `"true"`/`"false"` strings are accepted.
    pub(crate) fn bool_or(&self, field: &'static str, default: bool) -> Result<bool, DecodeError> {
        match self.get(field) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self.invalid_str(field, s)),
            },
            Some(other) => Err(self.invalid(field, other)),
        }
    }
}
