use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

const ID_FIELD: &str = "id";
const MESSAGE_FIELD: &str = "message";

/// Client-supplied request identifier.
///
/// The JSON literal type is kept: `1`, `1.0` and `"1"` are three different ids.
/// Numbers keep their source text, so integers beyond `u64` stay exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    Number(Number),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(number) => write!(f, "{number}"),
            MessageId::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        MessageId::Number(Number::from(value))
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        MessageId::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRequest {
    pub id: MessageId,
    pub message: String,
}

impl MessageRequest {
    pub fn new(id: impl Into<MessageId>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("request body must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unexpected field `{0}`")]
    UnexpectedField(String),
    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("malformed json: {0}")]
    Parse(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Parses a raw request body and checks it against the request shape.
pub fn parse_request(body: &[u8]) -> Result<MessageRequest, RequestError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|err| RequestError::Parse(err.to_string()))?;
    Ok(validate_request(value)?)
}

/// Checks an already parsed value: an object holding exactly `id` (number or
/// string) and `message` (string).
pub fn validate_request(value: Value) -> Result<MessageRequest, SchemaError> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(SchemaError::NotAnObject {
                found: json_type_name(&other),
            })
        }
    };

    if let Some(extra) = fields
        .keys()
        .find(|key| key.as_str() != ID_FIELD && key.as_str() != MESSAGE_FIELD)
    {
        return Err(SchemaError::UnexpectedField(extra.clone()));
    }

    let id = match take_field(&mut fields, ID_FIELD)? {
        Value::Number(number) => MessageId::Number(number),
        Value::String(text) => MessageId::Text(text),
        other => {
            return Err(SchemaError::WrongType {
                field: ID_FIELD,
                expected: "a number or a string",
                found: json_type_name(&other),
            })
        }
    };

    let message = match take_field(&mut fields, MESSAGE_FIELD)? {
        Value::String(text) => text,
        other => {
            return Err(SchemaError::WrongType {
                field: MESSAGE_FIELD,
                expected: "a string",
                found: json_type_name(&other),
            })
        }
    };

    Ok(MessageRequest { id, message })
}

fn take_field(fields: &mut Map<String, Value>, name: &'static str) -> Result<Value, SchemaError> {
    fields.remove(name).ok_or(SchemaError::MissingField(name))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
