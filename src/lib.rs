//! Normalize "load a template" invocations into canonical template records.
//!
//! A template can be named by a file path, a glob, an in-memory object, or an
//! array of those, followed by optional locals and options:
//!
//! ```no_run
//! use serde_json::json;
//!
//! let records = template_loader::normalize(
//!     &json!("pages/*.md"),
//!     &[json!({"site": "docs"}), json!({"engine": "hbs"})],
//! )?;
//! for (key, record) in records.iter() {
//!     println!("{key}: {:?}", record.content);
//! }
//! # Ok::<(), template_loader::LoaderError>(())
//! ```

pub mod config;
pub mod error;
pub mod kind;
pub mod load;
pub mod merge;
pub mod normalize;
pub mod record;
pub mod resolve;
pub mod source;

pub use config::{load_config, LoaderConfig};
pub use error::{LoaderError, Result};
pub use kind::{classify, Kind};
pub use normalize::{normalize, Args, Loader, Pattern, Sources};
pub use record::{ResultSet, TemplateRecord};
