use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Property names with a fixed meaning on a record description.
pub const RESERVED_FIELDS: &[&str] = &["path", "content", "orig", "data", "locals", "options"];

/// One normalized template.
///
/// Optional fields are `None` rather than empty: a record never carries an empty
/// `locals`, `options`, or `data` mapping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Raw source text, front matter included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig: Option<String>,

    /// Parsed front matter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locals: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    /// Pass-through properties copied from the caller's description.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn local(&self, key: &str) -> Option<&Value> {
        self.locals.as_ref().and_then(|l| l.get(key))
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.as_ref().and_then(|o| o.get(key))
    }
}

/// Records keyed by template key, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(String, TemplateRecord)>,
    index: HashMap<String, usize>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless `key` is already present. Returns whether the record was kept.
    pub fn insert(&mut self, key: String, record: TemplateRecord) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, record));
        true
    }

    /// Merge `other` into `self`, keeping existing keys. Returns the number of dropped duplicates.
    pub fn absorb(&mut self, other: ResultSet) -> usize {
        let mut dropped = 0;
        for (key, record) in other.entries {
            if !self.insert(key, record) {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn get(&self, key: &str) -> Option<&TemplateRecord> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }
}

impl std::ops::Index<&str> for ResultSet {
    type Output = TemplateRecord;

    fn index(&self, key: &str) -> &TemplateRecord {
        match self.get(key) {
            Some(record) => record,
            None => panic!("no template record for key '{key}'"),
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = (String, TemplateRecord);
    type IntoIter = std::vec::IntoIter<(String, TemplateRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}
