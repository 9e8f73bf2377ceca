//! Locals and options merging.
//!
//! Every record collects two ordered streams of mappings, one for locals and one
//! for options. Streams are folded left to right with last-write-wins at the top
//! level, and an empty result is dropped instead of becoming `{}`.
//!
//! Order within a record:
//!
//! 1. the record's inline properties, then its own `locals` sub-object
//! 2. shared locals sources passed alongside the pattern
//!
//! An `options` sub-object found in any locals source is moved to the options
//! stream at the same position, ahead of explicit options sources.

use serde_json::{Map, Value};

/// Record fields that only mean something on a record description.
const RECORD_FIELDS: &[&str] = &["path", "content", "orig", "data"];

pub fn merge_locals(sources: &[Map<String, Value>]) -> Map<String, Value> {
    merge_all(sources)
}

pub fn merge_options(sources: &[Map<String, Value>]) -> Map<String, Value> {
    merge_all(sources)
}

fn merge_all(sources: &[Map<String, Value>]) -> Map<String, Value> {
    let mut merged = Map::new();
    for source in sources {
        for (key, value) in source {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

fn non_empty(map: Map<String, Value>) -> Option<Map<String, Value>> {
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Pending locals and options sources for one or more records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeStreams {
    locals: Vec<Map<String, Value>>,
    options: Vec<Map<String, Value>>,
}

impl MergeStreams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_locals(&mut self, map: Map<String, Value>) {
        if !map.is_empty() {
            self.locals.push(map);
        }
    }

    pub fn push_options(&mut self, map: Map<String, Value>) {
        if !map.is_empty() {
            self.options.push(map);
        }
    }

    /// Push an explicit `locals` sub-object. Its own `options` goes to the options stream.
    pub fn push_nested_locals(&mut self, mut locals: Map<String, Value>) {
        let options = locals.remove("options");
        self.push_locals(locals);
        if let Some(options) = options.as_ref().and_then(|o| sub_object("options", o)) {
            self.push_options(options);
        }
    }

    /// Add a shared locals source.
    ///
    /// `locals` is unwrapped after the inline keys and `options` is moved to the
    /// options stream. Record fields are ignored.
    pub fn add_locals_source(&mut self, source: &Map<String, Value>) {
        let mut inline = Map::new();
        let mut nested_locals = None;
        let mut nested_options = None;

        for (key, value) in source {
            match key.as_str() {
                "locals" => nested_locals = sub_object("locals", value),
                "options" => nested_options = sub_object("options", value),
                k if RECORD_FIELDS.contains(&k) => {
                    tracing::warn!(field = k, "ignoring record field in shared locals");
                }
                _ => {
                    inline.insert(key.clone(), value.clone());
                }
            }
        }

        self.push_locals(inline);
        if let Some(locals) = nested_locals {
            self.push_nested_locals(locals);
        }
        if let Some(options) = nested_options {
            self.push_options(options);
        }
    }

    /// Add an options source. A nested `options` object is flattened after the other keys.
    pub fn add_options_source(&mut self, source: &Map<String, Value>) {
        let mut inline = Map::new();
        let mut nested = None;

        for (key, value) in source {
            if key == "options" {
                nested = sub_object("options", value);
            } else {
                inline.insert(key.clone(), value.clone());
            }
        }

        self.push_options(inline);
        if let Some(options) = nested {
            self.push_options(options);
        }
    }

    /// Append `shared` after this record's own sources.
    pub fn then(mut self, shared: &MergeStreams) -> Self {
        self.locals.extend(shared.locals.iter().cloned());
        self.options.extend(shared.options.iter().cloned());
        self
    }

    /// Fold both streams. Empty results come back as `None`.
    pub fn finish(self) -> (Option<Map<String, Value>>, Option<Map<String, Value>>) {
        (
            non_empty(merge_locals(&self.locals)),
            non_empty(merge_options(&self.options)),
        )
    }
}

pub(crate) fn sub_object(name: &str, value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::Null => None,
        _ => {
            tracing::warn!(field = name, "ignoring non-object sub-property");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn later_sources_win() {
        let merged = merge_locals(&[obj(json!({"x": 1, "y": 1})), obj(json!({"x": 2}))]);
        assert_eq!(Value::Object(merged), json!({"x": 2, "y": 1}));
    }

    #[test]
    fn merge_is_shallow() {
        let merged = merge_options(&[
            obj(json!({"a": {"b": 1, "c": 2}})),
            obj(json!({"a": {"b": 3}})),
        ]);
        assert_eq!(Value::Object(merged), json!({"a": {"b": 3}}));
    }

    #[test]
    fn empty_streams_finish_as_none() {
        let mut streams = MergeStreams::new();
        streams.push_locals(Map::new());
        streams.add_options_source(&Map::new());
        assert_eq!(streams.finish(), (None, None));
    }

    #[test]
    fn options_are_extracted_from_locals_source() {
        let mut streams = MergeStreams::new();
        streams.add_locals_source(&obj(json!({"a": "b", "options": {"b": "b"}})));
        streams.add_options_source(&obj(json!({"c": true})));

        let (locals, options) = streams.finish();
        assert_eq!(locals.map(Value::Object), Some(json!({"a": "b"})));
        assert_eq!(options.map(Value::Object), Some(json!({"b": "b", "c": true})));
    }

    #[test]
    fn explicit_options_source_wins_over_extracted() {
        let mut streams = MergeStreams::new();
        streams.add_locals_source(&obj(json!({"options": {"y": "z", "e": "old"}})));
        streams.add_options_source(&obj(json!({"e": "f"})));

        let (_, options) = streams.finish();
        assert_eq!(options.map(Value::Object), Some(json!({"y": "z", "e": "f"})));
    }

    #[test]
    fn nested_locals_are_unwrapped_after_inline() {
        let mut streams = MergeStreams::new();
        streams.add_locals_source(&obj(json!({"a": 1, "locals": {"a": 2, "b": 3}})));

        let (locals, _) = streams.finish();
        assert_eq!(locals.map(Value::Object), Some(json!({"a": 2, "b": 3})));
    }

    #[test]
    fn options_inside_nested_locals_are_extracted() {
        let mut streams = MergeStreams::new();
        streams.add_locals_source(&obj(json!({"locals": {"a": "b", "options": {"y": "z"}}})));

        let (locals, options) = streams.finish();
        assert_eq!(locals.map(Value::Object), Some(json!({"a": "b"})));
        assert_eq!(options.map(Value::Object), Some(json!({"y": "z"})));
    }

    #[test]
    fn nested_options_object_is_flattened() {
        let mut streams = MergeStreams::new();
        streams.add_options_source(&obj(json!({"options": {"y": "z"}})));

        let (_, options) = streams.finish();
        assert_eq!(options.map(Value::Object), Some(json!({"y": "z"})));
    }

    #[test]
    fn record_fields_in_shared_locals_are_dropped() {
        let mut streams = MergeStreams::new();
        streams.add_locals_source(&obj(json!({"content": "x", "path": "p", "a": "b"})));

        let (locals, _) = streams.finish();
        assert_eq!(locals.map(Value::Object), Some(json!({"a": "b"})));
    }

    #[test]
    fn shared_streams_follow_record_streams() {
        let mut own = MergeStreams::new();
        own.push_locals(obj(json!({"x": 1, "keep": true})));

        let mut shared = MergeStreams::new();
        shared.add_locals_source(&obj(json!({"x": 2})));

        let (locals, _) = own.then(&shared).finish();
        assert_eq!(locals.map(Value::Object), Some(json!({"x": 2, "keep": true})));
    }
}
