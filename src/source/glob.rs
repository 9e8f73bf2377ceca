use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::{DirEntry, WalkDir};

use crate::config::GlobConfig;

/// Expands a glob pattern into matching file paths.
pub trait GlobExpander {
    /// Matching files in a stable order. Never fails: a bad pattern matches nothing.
    fn expand(&self, pattern: &str) -> Vec<String>;
}

/// Walks the filesystem under the pattern's literal prefix and matches with globset.
#[derive(Debug, Clone)]
pub struct WalkGlob {
    base_dir: PathBuf,
    options: GlobConfig,
}

impl WalkGlob {
    pub fn new(base_dir: impl Into<PathBuf>, options: GlobConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            options,
        }
    }

    fn build_matcher(&self, pattern: &str) -> Option<GlobMatcher> {
        match GlobBuilder::new(pattern)
            .literal_separator(true)
            .case_insensitive(self.options.case_insensitive)
            .build()
        {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "malformed glob pattern, matching nothing");
                None
            }
        }
    }
}

impl GlobExpander for WalkGlob {
    fn expand(&self, pattern: &str) -> Vec<String> {
        let Some(matcher) = self.build_matcher(pattern) else {
            return Vec::new();
        };

        let (prefix, rest) = split_literal_prefix(pattern);
        let root = if prefix.is_empty() {
            self.base_dir.clone()
        } else {
            self.base_dir.join(&prefix)
        };
        if !root.is_dir() {
            return Vec::new();
        }

        let mut walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();
        if !rest.contains("**") && !rest.contains('{') {
            walker = walker.max_depth(rest.split('/').count());
        }

        let skip_hidden = !self.options.dotfiles && !names_dotfile(&rest);

        let mut matches = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !(skip_hidden && is_hidden(e)))
            .filter_map(|e| e.ok())
        {
            // Symlinked files count, matching how a literal path is resolved.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            let Some(candidate) = display_path(&prefix, &root, entry.path()) else {
                continue;
            };
            if matcher.is_match(&candidate) {
                matches.push(candidate);
            }
        }

        tracing::debug!(pattern, count = matches.len(), "expanded glob");
        matches
    }
}

/// Split `pattern` at the first path component containing glob syntax.
fn split_literal_prefix(pattern: &str) -> (String, String) {
    let components: Vec<&str> = pattern.split('/').collect();
    let first_glob = components
        .iter()
        .position(|c| has_glob_syntax(c))
        .unwrap_or(components.len().saturating_sub(1));

    (
        components[..first_glob].join("/"),
        components[first_glob..].join("/"),
    )
}

fn has_glob_syntax(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}

fn names_dotfile(rest: &str) -> bool {
    rest.starts_with('.') || rest.contains("/.")
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Spell a walked path the way the pattern spells it: literal prefix plus `/`-joined tail.
fn display_path(prefix: &str, root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let tail = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if prefix.is_empty() {
        Some(tail)
    } else if prefix.ends_with('/') {
        Some(format!("{prefix}{tail}"))
    } else {
        Some(format!("{prefix}/{tail}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pages/nested")).unwrap();
        fs::write(root.join("pages/b.md"), "b").unwrap();
        fs::write(root.join("pages/a.md"), "a").unwrap();
        fs::write(root.join("pages/c.txt"), "c").unwrap();
        fs::write(root.join("pages/.hidden.md"), "h").unwrap();
        fs::write(root.join("pages/nested/d.md"), "d").unwrap();
        dir
    }

    #[rstest]
    #[case("pages/*.md", ("pages", "*.md"))]
    #[case("*.md", ("", "*.md"))]
    #[case("a/b/**/*.md", ("a/b", "**/*.md"))]
    #[case("/abs/dir/*.md", ("/abs/dir", "*.md"))]
    #[case("a/{b,c}/x.md", ("a", "{b,c}/x.md"))]
    fn test_split_literal_prefix(#[case] pattern: &str, #[case] expected: (&str, &str)) {
        let (prefix, rest) = split_literal_prefix(pattern);
        assert_eq!((prefix.as_str(), rest.as_str()), expected);
    }

    #[test]
    fn star_matches_one_level_in_name_order() {
        let dir = tree();
        let glob = WalkGlob::new(dir.path(), GlobConfig::default());
        assert_eq!(glob.expand("pages/*.md"), vec!["pages/a.md", "pages/b.md"]);
    }

    #[test]
    fn double_star_crosses_directories() {
        let dir = tree();
        let glob = WalkGlob::new(dir.path(), GlobConfig::default());
        assert_eq!(
            glob.expand("pages/**/*.md"),
            vec!["pages/a.md", "pages/b.md", "pages/nested/d.md"]
        );
    }

    #[test]
    fn braces_select_alternatives() {
        let dir = tree();
        let glob = WalkGlob::new(dir.path(), GlobConfig::default());
        assert_eq!(
            glob.expand("pages/{a.md,c.txt}"),
            vec!["pages/a.md", "pages/c.txt"]
        );
    }

    #[test]
    fn dotfiles_are_opt_in() {
        let dir = tree();
        let glob = WalkGlob::new(
            dir.path(),
            GlobConfig {
                dotfiles: true,
                ..GlobConfig::default()
            },
        );
        assert_eq!(
            glob.expand("pages/*.md"),
            vec!["pages/.hidden.md", "pages/a.md", "pages/b.md"]
        );

        let default = WalkGlob::new(dir.path(), GlobConfig::default());
        assert_eq!(default.expand("pages/.*.md"), vec!["pages/.hidden.md"]);
    }

    #[test]
    fn case_insensitive_matching() {
        let dir = tree();
        let glob = WalkGlob::new(
            dir.path(),
            GlobConfig {
                case_insensitive: true,
                ..GlobConfig::default()
            },
        );
        assert_eq!(glob.expand("pages/*.TXT"), vec!["pages/c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.md"))
            .unwrap();

        let glob = WalkGlob::new(dir.path(), GlobConfig::default());
        assert_eq!(glob.expand("*.md"), vec!["link.md"]);
    }

    #[test]
    fn no_matches_and_bad_patterns_are_empty() {
        let dir = tree();
        let glob = WalkGlob::new(dir.path(), GlobConfig::default());
        assert!(glob.expand("pages/*.html").is_empty());
        assert!(glob.expand("missing/*.md").is_empty());
        assert!(glob.expand("pages/[*.md").is_empty());
    }
}
