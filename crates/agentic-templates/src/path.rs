//! Bundle path validation.
//!
//! Bundle paths are slash-separated, case-sensitive and rooted at the namespace
//! prefix, e.g. `templates/web-frontend/CLAUDE.md`. The rules are strict: no
//! leading or trailing slash, no empty segments, no `.` or `..` segments and no
//! backslashes. A path that fails these rules never reaches a lookup.

use crate::error::{Result, TemplatesError};

/// Validate a relative path (no namespace requirement).
///
/// Used when building a bundle from in-memory entries.
pub fn validate_relative(path: &str) -> Result<()> {
    let invalid = |reason| TemplatesError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if path.is_empty() {
        return Err(invalid("empty path"));
    }
    if path.contains('\\') {
        return Err(invalid("backslash separator"));
    }
    if path.starts_with('/') {
        return Err(invalid("absolute path"));
    }
    if path.ends_with('/') {
        return Err(invalid("trailing slash"));
    }

    for segment in path.split('/') {
        match segment {
            "" => return Err(invalid("empty segment")),
            "." => return Err(invalid("current-directory segment")),
            ".." => return Err(invalid("parent segment")),
            _ => {}
        }
    }

    Ok(())
}

/// Validate a namespace prefix: a single relative segment such as `templates`.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    validate_relative(namespace)?;
    if namespace.contains('/') {
        return Err(TemplatesError::InvalidPath {
            path: namespace.to_string(),
            reason: "namespace must be a single segment",
        });
    }
    Ok(())
}

/// Validate a lookup path and check that it lives under `namespace`.
///
/// Returns the path unchanged on success so callers can chain it into a lookup.
pub fn validate<'a>(path: &'a str, namespace: &str) -> Result<&'a str> {
    validate_relative(path)?;

    let first = path.split('/').next().unwrap_or_default();
    if first != namespace {
        return Err(TemplatesError::InvalidPath {
            path: path.to_string(),
            reason: "outside the namespace root",
        });
    }

    Ok(path)
}

/// Join a directory path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Final segment of a path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the final segment, or `None` for a single-segment path.
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<&str>) -> &'static str {
        match result {
            Err(TemplatesError::InvalidPath { reason, .. }) => reason,
            other => panic!("expected InvalidPath, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_namespace_paths() {
        assert_eq!(validate("templates", "templates").unwrap(), "templates");
        assert!(validate("templates/web-frontend/CLAUDE.md", "templates").is_ok());
        assert!(validate("templates/_shared/core-principles.md", "templates").is_ok());
        assert!(validate("templates/web-frontend/.cursorrules/overview.md", "templates").is_ok());
    }

    #[test]
    fn test_rejects_malformed_paths() {
        assert_eq!(reason(validate("", "templates")), "empty path");
        assert_eq!(reason(validate("/templates", "templates")), "absolute path");
        assert_eq!(reason(validate("templates/", "templates")), "trailing slash");
        assert_eq!(reason(validate("templates//a.md", "templates")), "empty segment");
        assert_eq!(reason(validate("templates/./a.md", "templates")), "current-directory segment");
        assert_eq!(reason(validate("templates\\a.md", "templates")), "backslash separator");
    }

    #[test]
    fn test_rejects_escape_from_namespace() {
        assert_eq!(reason(validate("templates/../secret", "templates")), "parent segment");
        assert_eq!(reason(validate("..", "templates")), "parent segment");
        assert_eq!(reason(validate("other/a.md", "templates")), "outside the namespace root");
        // case-sensitive
        assert_eq!(reason(validate("Templates/a.md", "templates")), "outside the namespace root");
    }

    #[test]
    fn test_namespace_is_single_segment() {
        assert!(validate_namespace("templates").is_ok());
        assert!(validate_namespace("_assets").is_ok());
        match validate_namespace("assets/templates") {
            Err(TemplatesError::InvalidPath { reason, .. }) => {
                assert_eq!(reason, "namespace must be a single segment")
            }
            other => panic!("expected InvalidPath, got {other:?}"),
        }
        assert!(validate_namespace("..").is_err());
        assert!(validate_namespace("").is_err());
    }

    #[test]
    fn test_join_and_split() {
        assert_eq!(join("templates", "_shared"), "templates/_shared");
        assert_eq!(join("", "templates"), "templates");
        assert_eq!(file_name("templates/web-frontend/CLAUDE.md"), "CLAUDE.md");
        assert_eq!(file_name("templates"), "templates");
        assert_eq!(parent("templates/web-frontend"), Some("templates"));
        assert_eq!(parent("templates"), None);
    }
}
