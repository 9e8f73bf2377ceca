use serde_json::{Map, Value};

use crate::config::LoaderConfig;
use crate::load::LoadedFile;
use crate::merge::{sub_object, MergeStreams};
use crate::record::TemplateRecord;

/// A caller-supplied object describing one template.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Description {
    pub path: Option<String>,
    pub content: Option<String>,
    pub orig: Option<String>,
    pub data: Option<Map<String, Value>>,
    pub extra: Map<String, Value>,
    pub streams: MergeStreams,
}

impl Description {
    /// Split `obj` into record fields, pass-through fields, and locals/options.
    pub fn from_object(obj: &Map<String, Value>, config: &LoaderConfig) -> Self {
        let mut desc = Description::default();
        let mut inline = Map::new();
        let mut nested_locals = None;
        let mut nested_options = None;

        for (key, value) in obj {
            match key.as_str() {
                "path" => desc.path = string_field("path", value),
                "content" => desc.content = string_field("content", value),
                "orig" => desc.orig = string_field("orig", value),
                "data" => desc.data = sub_object("data", value).filter(|d| !d.is_empty()),
                "locals" => nested_locals = sub_object("locals", value),
                "options" => nested_options = sub_object("options", value),
                k if config.is_passthrough(k) => {
                    desc.extra.insert(key.clone(), value.clone());
                }
                _ => {
                    inline.insert(key.clone(), value.clone());
                }
            }
        }

        desc.streams.push_locals(inline);
        if let Some(locals) = nested_locals {
            desc.streams.push_nested_locals(locals);
        }
        if let Some(options) = nested_options {
            desc.streams.push_options(options);
        }
        desc
    }

    pub fn with_content(content: &str) -> Self {
        Description {
            content: Some(content.to_string()),
            ..Description::default()
        }
    }

    /// Build the record. Description fields win over file-loaded ones, then
    /// `shared` sources are applied after the description's own.
    pub fn into_record(
        self,
        default_path: &str,
        loaded: Option<LoadedFile>,
        shared: &MergeStreams,
    ) -> TemplateRecord {
        let (file_content, file_orig, file_data) = match loaded {
            Some(file) => (
                Some(file.content),
                Some(file.orig),
                Some(file.data).filter(|d| !d.is_empty()),
            ),
            None => (None, None, None),
        };

        let (locals, options) = self.streams.then(shared).finish();

        TemplateRecord {
            path: self.path.unwrap_or_else(|| default_path.to_string()),
            content: self.content.or(file_content),
            orig: self.orig.or(file_orig),
            data: self.data.or(file_data),
            locals,
            options,
            extra: self.extra,
        }
    }
}

fn string_field(name: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        _ => {
            tracing::warn!(field = name, "ignoring non-string record field");
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
    fn splits_fields_locals_and_options() {
        let desc = Description::from_object(
            &obj(json!({
                "path": "a/b/c.md",
                "content": "body",
                "a": "b",
                "options": {"y": "z"}
            })),
            &LoaderConfig::default(),
        );
        let record = desc.into_record("ignored", None, &MergeStreams::new());

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "path": "a/b/c.md",
                "content": "body",
                "locals": {"a": "b"},
                "options": {"y": "z"}
            })
        );
    }

    #[test]
    fn nested_locals_win_over_inline() {
        let desc = Description::from_object(
            &obj(json!({"x": 1, "locals": {"x": 2}})),
            &LoaderConfig::default(),
        );
        let record = desc.into_record("k", None, &MergeStreams::new());
        assert_eq!(record.local("x"), Some(&json!(2)));
    }

    #[test]
    fn options_inside_nested_locals_move_to_options() {
        let desc = Description::from_object(
            &obj(json!({"path": "a", "locals": {"a": "b", "options": {"y": "z"}}})),
            &LoaderConfig::default(),
        );
        let record = desc.into_record("a", None, &MergeStreams::new());

        assert_eq!(record.locals.map(Value::Object), Some(json!({"a": "b"})));
        assert_eq!(record.options.map(Value::Object), Some(json!({"y": "z"})));
    }

    #[test]
    fn passthrough_names_skip_locals() {
        let config = LoaderConfig {
            passthrough: vec!["layout".into()],
            ..LoaderConfig::default()
        };
        let desc = Description::from_object(&obj(json!({"layout": "base", "a": 1})), &config);
        let record = desc.into_record("k", None, &MergeStreams::new());

        assert_eq!(record.extra.get("layout"), Some(&json!("base")));
        assert_eq!(record.locals.map(Value::Object), Some(json!({"a": 1})));
    }

    #[test]
    fn description_overrides_loaded_file() {
        let loaded = LoadedFile {
            orig: "---\ntitle: T\n---\nfile body".into(),
            content: "file body".into(),
            data: obj(json!({"title": "T"})),
        };
        let record = Description::with_content("override").into_record(
            "a.md",
            Some(loaded),
            &MergeStreams::new(),
        );

        assert_eq!(record.content.as_deref(), Some("override"));
        assert_eq!(record.orig.as_deref(), Some("---\ntitle: T\n---\nfile body"));
        assert_eq!(record.data.map(Value::Object), Some(json!({"title": "T"})));
    }

    #[test]
    fn empty_front_matter_leaves_data_absent() {
        let loaded = LoadedFile {
            orig: "plain".into(),
            content: "plain".into(),
            data: Map::new(),
        };
        let record = Description::default().into_record("a.md", Some(loaded), &MergeStreams::new());
        assert!(record.data.is_none());
        assert_eq!(record.path, "a.md");
    }
}
