//! Argument-shape resolution.
//!
//! `normalize` accepts a pattern plus up to three loosely-typed arguments and
//! decides the role of each one:
//!
//! | pattern | second | third | fourth |
//! |---|---|---|---|
//! | glob | locals (a string is discarded) | options | - |
//! | file or plain key | content string | locals | options |
//! | file or plain key | description object | options | - |
//! | object | locals | options | - |
//! | array | each element as above, sharing the same arguments | | |
//!
//! Each row maps onto one of the named constructors on [`Loader`], which can
//! also be called directly when the caller already knows the shape.

mod describe;
mod pattern;

use serde_json::{Map, Value};

use crate::config::LoaderConfig;
use crate::error::Result;
use crate::load::load;
use crate::merge::MergeStreams;
use crate::record::{ResultSet, RESERVED_FIELDS};
use crate::resolve::{expand_glob, resolve_key_kind, KeyKind};
use crate::source::{
    FileSystem, FrontMatterParser, GlobExpander, MatterParser, OsFileSystem, WalkGlob,
};

use describe::Description;
pub use pattern::{Arg, Args, Pattern};

/// Locals and options applied to every record a call produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources {
    streams: MergeStreams,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locals source. Its `options` sub-object feeds the options stream.
    pub fn locals(mut self, source: &Map<String, Value>) -> Self {
        self.streams.add_locals_source(source);
        self
    }

    pub fn options(mut self, source: &Map<String, Value>) -> Self {
        self.streams.add_options_source(source);
        self
    }

    fn locals_opt(self, source: Option<&Map<String, Value>>) -> Self {
        match source {
            Some(s) => self.locals(s),
            None => self,
        }
    }

    fn options_opt(self, source: Option<&Map<String, Value>>) -> Self {
        match source {
            Some(s) => self.options(s),
            None => self,
        }
    }
}

/// Normalizes template descriptions using pluggable file, glob, and front-matter capabilities.
pub struct Loader {
    config: LoaderConfig,
    fs: Box<dyn FileSystem>,
    glob: Box<dyn GlobExpander>,
    matter: Box<dyn FrontMatterParser>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::with_os_collaborators(LoaderConfig::default())
    }
}

impl Loader {
    /// Validates `config` and wires the filesystem-backed collaborators.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_os_collaborators(config))
    }

    pub fn with_collaborators(
        config: LoaderConfig,
        fs: impl FileSystem + 'static,
        glob: impl GlobExpander + 'static,
        matter: impl FrontMatterParser + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, fs, glob, matter))
    }

    fn with_os_collaborators(config: LoaderConfig) -> Self {
        let fs = OsFileSystem::new(&config.base_dir);
        let glob = WalkGlob::new(&config.base_dir, config.glob.clone());
        Self::assemble(config, fs, glob, MatterParser)
    }

    fn assemble(
        config: LoaderConfig,
        fs: impl FileSystem + 'static,
        glob: impl GlobExpander + 'static,
        matter: impl FrontMatterParser + 'static,
    ) -> Self {
        Self {
            config,
            fs: Box::new(fs),
            glob: Box::new(glob),
            matter: Box::new(matter),
        }
    }

    /// Normalize a loosely-typed invocation: `pattern` plus up to three more arguments.
    pub fn normalize(&self, pattern: &Value, args: &[Value]) -> Result<ResultSet> {
        let pattern = Pattern::try_from(pattern)?;
        self.normalize_pattern(&pattern, &Args::from_slice(args))
    }

    pub fn normalize_pattern(&self, pattern: &Pattern, args: &Args) -> Result<ResultSet> {
        match pattern {
            Pattern::Key(key) => self.normalize_key(key, args),
            Pattern::Object(map) => {
                let sources = Sources::new()
                    .locals_opt(object_arg(args.second(), "locals"))
                    .options_opt(object_arg(args.third(), "options"));
                ignore_extra(args.fourth());
                self.from_record_map(map, &sources)
            }
            Pattern::List(items) => {
                let mut records = ResultSet::new();
                for item in items {
                    let dropped = records.absorb(self.normalize_pattern(item, args)?);
                    if dropped > 0 {
                        tracing::debug!(dropped, "kept first occurrence of duplicate keys");
                    }
                }
                Ok(records)
            }
        }
    }

    fn normalize_key(&self, key: &str, args: &Args) -> Result<ResultSet> {
        let kind = resolve_key_kind(self.fs.as_ref(), key);
        tracing::debug!(key, ?kind, "resolved string pattern");

        match (kind, args.second()) {
            (KeyKind::IsGlob, second) => {
                if let Arg::Str(_) = second {
                    tracing::warn!(pattern = key, "discarding string content passed with a glob");
                }
                let sources = Sources::new()
                    .locals_opt(object_arg(second, "locals"))
                    .options_opt(object_arg(args.third(), "options"));
                ignore_extra(args.fourth());
                self.from_glob(key, &sources)
            }
            (KeyKind::IsFile, Arg::Str(content)) => {
                let mut details = Map::new();
                details.insert("content".into(), Value::String(content.to_string()));
                self.from_path(key, Some(&details), &self.content_sources(args))
            }
            (KeyKind::IsFile, second) => {
                let sources = self.description_sources(args);
                self.from_path(key, object_arg(second, "description"), &sources)
            }
            (KeyKind::IsPlainKey, Arg::Str(content)) => {
                self.from_inline_content(key, content, &self.content_sources(args))
            }
            (KeyKind::IsPlainKey, second) => {
                let details = object_arg(second, "description").cloned().unwrap_or_default();
                let mut map = Map::new();
                map.insert(key.to_string(), Value::Object(details));
                self.from_record_map(&map, &self.description_sources(args))
            }
        }
    }

    /// `pattern, content, locals, options`
    fn content_sources(&self, args: &Args) -> Sources {
        Sources::new()
            .locals_opt(object_arg(args.third(), "locals"))
            .options_opt(object_arg(args.fourth(), "options"))
    }

    /// `pattern, description, options`
    fn description_sources(&self, args: &Args) -> Sources {
        ignore_extra(args.fourth());
        Sources::new().options_opt(object_arg(args.third(), "options"))
    }

    /// Load one existing file. `details` is a record description whose fields
    /// override the file's and whose other properties become locals.
    pub fn from_path(
        &self,
        path: &str,
        details: Option<&Map<String, Value>>,
        sources: &Sources,
    ) -> Result<ResultSet> {
        let loaded = load(
            self.fs.as_ref(),
            self.matter.as_ref(),
            path,
            self.config.front_matter.enabled,
        )?;
        let desc = details
            .map(|d| Description::from_object(d, &self.config))
            .unwrap_or_default();

        let mut records = ResultSet::new();
        records.insert(
            path.to_string(),
            desc.into_record(path, Some(loaded), &sources.streams),
        );
        Ok(records)
    }

    /// Expand `pattern` and load every match. No matches is an empty set.
    pub fn from_glob(&self, pattern: &str, sources: &Sources) -> Result<ResultSet> {
        let mut records = ResultSet::new();
        for path in expand_glob(self.glob.as_ref(), pattern) {
            let loaded = load(
                self.fs.as_ref(),
                self.matter.as_ref(),
                &path,
                self.config.front_matter.enabled,
            )?;
            let record = Description::default().into_record(&path, Some(loaded), &sources.streams);
            records.insert(path, record);
        }
        Ok(records)
    }

    /// One record from an object with a string `path`, otherwise one record per key.
    pub fn from_record_map(&self, map: &Map<String, Value>, sources: &Sources) -> Result<ResultSet> {
        let mut records = ResultSet::new();

        if let Some(Value::String(path)) = map.get("path") {
            tracing::debug!(path = path.as_str(), "normalizing single record description");
            let record = Description::from_object(map, &self.config).into_record(
                path,
                None,
                &sources.streams,
            );
            records.insert(path.clone(), record);
            return Ok(records);
        }

        for (key, value) in map {
            if RESERVED_FIELDS.contains(&key.as_str()) {
                tracing::warn!(
                    key = key.as_str(),
                    "record field used as a template key; add a string `path` for a single record"
                );
            }
            let desc = match value {
                Value::Object(inner) => Description::from_object(inner, &self.config),
                Value::String(content) => Description::with_content(content),
                other => {
                    tracing::warn!(
                        key = key.as_str(),
                        kind = %crate::kind::classify(other),
                        "skipping template entry that is not an object"
                    );
                    continue;
                }
            };
            records.insert(key.clone(), desc.into_record(key, None, &sources.streams));
        }

        Ok(records)
    }

    /// A template given as a key plus its literal text. No front matter is parsed.
    pub fn from_inline_content(
        &self,
        key: &str,
        content: &str,
        sources: &Sources,
    ) -> Result<ResultSet> {
        let mut desc = Description::with_content(content);
        desc.orig = Some(content.to_string());

        let mut records = ResultSet::new();
        records.insert(key.to_string(), desc.into_record(key, None, &sources.streams));
        Ok(records)
    }
}

fn object_arg<'a>(arg: Arg<'a>, role: &str) -> Option<&'a Map<String, Value>> {
    match arg {
        Arg::Object(map) => Some(map),
        Arg::Absent | Arg::Str(_) => None,
        Arg::Unusable(kind) => {
            tracing::warn!(role, %kind, "ignoring argument that is not an object");
            None
        }
    }
}

fn ignore_extra(arg: Arg<'_>) {
    if arg != Arg::Absent {
        tracing::debug!("ignoring argument with no role in this call shape");
    }
}

/// Normalize with the default loader rooted at the current directory.
pub fn normalize(pattern: &Value, args: &[Value]) -> Result<ResultSet> {
    Loader::default().normalize(pattern, args)
}
