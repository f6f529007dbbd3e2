//! Unified error types for the agentic-templates crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while reading the bundle or installing templates.
#[derive(Error, Debug)]
pub enum TemplatesError {
    // --- Lookup ---

    /// No entry exists at the given bundle path.
    #[error("no such file or directory in bundle: {0}")]
    NotFound(String),

    /// A file operation (`open`, `read_all`) was applied to a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// A directory operation (`read_dir`) was applied to a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The path is malformed or escapes the namespace root.
    #[error("invalid bundle path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A file was read as text but its bytes are not valid UTF-8.
    #[error("file is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    // --- Bundle construction ---

    /// Two source entries resolve to the same bundle path.
    #[error("duplicate bundle path: {0}")]
    DuplicatePath(String),

    // --- Catalog ---

    /// The requested template is not present in the bundle.
    #[error("unknown template: {name} (available: {available})")]
    UnknownTemplate { name: String, available: String },

    // --- Install ---

    /// `install` was called with an empty template selection.
    #[error("no templates specified")]
    NoTemplatesSelected,

    /// A destination file exists and the config forbids overwriting it.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    // --- Configuration ---

    /// A config path field is absolute or climbs out of the install target.
    #[error("config field '{field}' must stay inside the install target: {value}")]
    UnsafeConfigPath { field: &'static str, value: String },

    /// The install configuration file could not be read.
    #[error("config file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The install configuration file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // --- Rendering ---

    /// Handlebars rendering of the development guide failed.
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    // --- General ---

    /// A filesystem I/O error on the host side (install target).
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TemplatesError {
    /// True for [`TemplatesError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TemplatesError> for io::Error {
    fn from(err: TemplatesError) -> Self {
        let kind = match &err {
            TemplatesError::NotFound(_) => io::ErrorKind::NotFound,
            TemplatesError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            TemplatesError::NotADirectory(_) => io::ErrorKind::NotADirectory,
            TemplatesError::InvalidPath { .. } => io::ErrorKind::InvalidInput,
            TemplatesError::InvalidUtf8(_) => io::ErrorKind::InvalidData,
            TemplatesError::UnsafeConfigPath { .. } => io::ErrorKind::InvalidInput,
            TemplatesError::Io(e) => e.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

/// Alias for `Result<T, TemplatesError>`.
pub type Result<T> = std::result::Result<T, TemplatesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_map_to_io_kinds() {
        let e: io::Error = TemplatesError::NotFound("templates/x.md".into()).into();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);

        let e: io::Error = TemplatesError::IsADirectory("templates".into()).into();
        assert_eq!(e.kind(), io::ErrorKind::IsADirectory);

        let e: io::Error = TemplatesError::NotADirectory("templates/a.md".into()).into();
        assert_eq!(e.kind(), io::ErrorKind::NotADirectory);

        let e: io::Error = TemplatesError::InvalidPath {
            path: "../etc".into(),
            reason: "parent segment",
        }
        .into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_display_includes_path() {
        let e = TemplatesError::NotFound("templates/missing.md".into());
        assert!(e.to_string().contains("templates/missing.md"));
        assert!(e.is_not_found());
        assert!(!TemplatesError::NoTemplatesSelected.is_not_found());
    }
}
