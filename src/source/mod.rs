//! Pluggable capabilities the loader depends on: file access, glob expansion,
//! and front-matter parsing.

pub mod fs;
pub mod glob;
pub mod matter;

pub use fs::{FileSystem, OsFileSystem};
pub use glob::{GlobExpander, WalkGlob};
pub use matter::{FrontMatterParser, MatterParser, Parsed};
