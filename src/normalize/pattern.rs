use serde_json::{Map, Value};

use crate::error::{LoaderError, Result};
use crate::kind::{classify, Kind};

/// The first argument to `normalize`.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// File path, glob, or plain template key.
    Key(String),
    /// A single record description or a map of them.
    Object(Map<String, Value>),
    List(Vec<Pattern>),
}

impl TryFrom<Value> for Pattern {
    type Error = LoaderError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Pattern::Key(s)),
            Value::Object(map) => Ok(Pattern::Object(map)),
            Value::Array(items) => items
                .into_iter()
                .map(Pattern::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Pattern::List),
            other => Err(LoaderError::InvalidPattern {
                kind: classify(&other),
            }),
        }
    }
}

impl TryFrom<&Value> for Pattern {
    type Error = LoaderError;

    fn try_from(value: &Value) -> Result<Self> {
        Pattern::try_from(value.clone())
    }
}

/// An argument after the pattern, by role-relevant shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Absent,
    Str(&'a str),
    Object(&'a Map<String, Value>),
    /// Present but neither a string nor an object.
    Unusable(Kind),
}

impl<'a> Arg<'a> {
    fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Arg::Absent,
            Some(Value::String(s)) => Arg::Str(s),
            Some(Value::Object(map)) => Arg::Object(map),
            Some(other) => Arg::Unusable(classify(other)),
        }
    }
}

/// Positional arguments two through four. `Value::Null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub second: Option<Value>,
    pub third: Option<Value>,
    pub fourth: Option<Value>,
}

impl Args {
    /// Arguments beyond the third are ignored.
    pub fn from_slice(args: &[Value]) -> Self {
        if args.len() > 3 {
            tracing::warn!(count = args.len(), "ignoring arguments past the fourth");
        }
        Self {
            second: args.first().cloned(),
            third: args.get(1).cloned(),
            fourth: args.get(2).cloned(),
        }
    }

    pub fn second(&self) -> Arg<'_> {
        Arg::from_value(self.second.as_ref())
    }

    pub fn third(&self) -> Arg<'_> {
        Arg::from_value(self.third.as_ref())
    }

    pub fn fourth(&self) -> Arg<'_> {
        Arg::from_value(self.fourth.as_ref())
    }
}
