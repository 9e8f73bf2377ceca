use serde_json::{Map, Value};

use crate::error::Result;
use crate::source::{FileSystem, FrontMatterParser};

/// A template file read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    /// Complete raw text, front matter included.
    pub orig: String,
    /// Body with the front-matter block removed.
    pub content: String,
    /// Empty when the file has no front matter.
    pub data: Map<String, Value>,
}

/// Read `path` and split off its front matter.
///
/// With `parse_front_matter` off, the whole file is the body.
pub fn load(
    fs: &dyn FileSystem,
    parser: &dyn FrontMatterParser,
    path: &str,
    parse_front_matter: bool,
) -> Result<LoadedFile> {
    let orig = fs.read_text(path)?;

    if !parse_front_matter {
        return Ok(LoadedFile {
            content: orig.clone(),
            orig,
            data: Map::new(),
        });
    }

    let parsed = parser.parse(path, &orig)?;
    tracing::trace!(path, front_matter = parsed.has_front_matter, "loaded template file");
    Ok(LoadedFile {
        orig,
        content: parsed.content,
        data: parsed.data,
    })
}
