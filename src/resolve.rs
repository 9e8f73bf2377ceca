use std::sync::OnceLock;

use regex_lite::Regex;

use crate::source::{FileSystem, GlobExpander};

/// How a string pattern should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// An existing regular file.
    IsFile,
    /// Glob syntax that does not itself name a file.
    IsGlob,
    /// An opaque template key.
    IsPlainKey,
}

fn glob_syntax() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[*?]|\[[^\]]+\]|\{[^}]*,[^}]*\}").expect("glob syntax regex is valid")
    })
}

/// True if `s` contains a wildcard, a bracket class, or a brace group.
pub fn is_glob(s: &str) -> bool {
    glob_syntax().is_match(s)
}

/// File existence wins over glob syntax.
pub fn resolve_key_kind(fs: &dyn FileSystem, s: &str) -> KeyKind {
    if fs.exists(s) {
        KeyKind::IsFile
    } else if is_glob(s) {
        KeyKind::IsGlob
    } else {
        KeyKind::IsPlainKey
    }
}

pub fn expand_glob(glob: &dyn GlobExpander, pattern: &str) -> Vec<String> {
    glob.expand(pattern)
}
