//! AI coding assistant templates, embedded as a read-only filesystem.
//!
//! The `templates/` tree of this repository is captured at compile time and exposed
//! through [`Bundle`], a minimal in-memory filesystem: open, read, list, stat and walk.
//! No runtime file access is needed to read a template.
//!
//! ```ignore
//! let guide = agentic_templates::bundle().read_to_string("templates/web-frontend/CLAUDE.md")?;
//! ```
//!
//! On top of the bundle:
//! - [`catalog::Catalog`] — discovers templates and shared rules
//! - [`install::Installer`] — copies rules into a project and renders its `CLAUDE.md` guide

pub mod bundle;
pub mod catalog;
pub mod config;
pub mod embedded;
pub mod error;
pub mod install;
pub mod path;
pub mod renderer;

pub use bundle::{Bundle, DirEntry, DirHandle, Entry, FileHandle, Metadata, Walk, WalkEntry};
pub use embedded::{bundle, NAMESPACE};
pub use error::{Result, TemplatesError};
