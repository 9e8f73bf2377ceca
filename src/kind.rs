use std::fmt;

use serde_json::Value;

/// Semantic shape of a loosely-typed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    PlainObject,
    Array,
    Other,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::PlainObject => "object",
            Kind::Array => "array",
            Kind::Other => "other",
        };
        f.write_str(name)
    }
}

pub fn classify(value: &Value) -> Kind {
    match value {
        Value::String(_) => Kind::String,
        Value::Object(_) => Kind::PlainObject,
        Value::Array(_) => Kind::Array,
        Value::Null | Value::Bool(_) | Value::Number(_) => Kind::Other,
    }
}
