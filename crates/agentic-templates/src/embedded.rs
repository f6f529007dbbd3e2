//! Compile-time embedded template tree.
//!
//! The whole `templates/` directory at the workspace root is captured by
//! [`include_dir!`] when this crate is compiled. Every entry is included,
//! including `_shared/` and the per-template `.cursorrules/` directories.
//!
//! ## Adding a template file
//!
//! 1. Place the file under `templates/<template>/` (or `templates/_shared/`)
//! 2. Run `cargo build`; `build.rs` picks up the new file and triggers a re-embed
//!
//! The bundle is then reachable at `templates/<template>/<file>` through [`bundle()`].

use std::sync::LazyLock;

use include_dir::{include_dir, Dir};

use crate::bundle::Bundle;

/// Root segment of every bundle path.
pub const NAMESPACE: &str = "templates";

/// Name of the directory holding rules shared by every template.
pub const SHARED_DIR: &str = "_shared";

/// Raw compile-time capture of `templates/`.
pub static TEMPLATES_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/../../templates");

static BUNDLE: LazyLock<Bundle> = LazyLock::new(|| match Bundle::from_dir(NAMESPACE, &TEMPLATES_DIR) {
    Ok(bundle) => bundle,
    // build.rs rejects the only failing input (non UTF-8 names)
    Err(e) => panic!("embedded template tree is malformed: {e}"),
});

/// The process-wide template bundle, indexed on first access.
pub fn bundle() -> &'static Bundle {
    &BUNDLE
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use walkdir::WalkDir;

    use super::*;

    fn source_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
    }

    fn bundle_path(source: &Path) -> String {
        let relative = source.strip_prefix(source_root()).unwrap();
        let mut path = NAMESPACE.to_string();
        for component in relative.components() {
            path.push('/');
            path.push_str(component.as_os_str().to_str().unwrap());
        }
        path
    }

    #[test]
    fn test_every_source_file_is_byte_identical() {
        let bundle = bundle();
        let mut checked = 0;
        for entry in WalkDir::new(source_root()).min_depth(1) {
            let entry = entry.unwrap();
            if !entry.file_type().is_file() {
                continue;
            }
            let expected = std::fs::read(entry.path()).unwrap();
            let path = bundle_path(entry.path());
            assert_eq!(bundle.read_all(&path).unwrap(), expected.as_slice(), "{path}");
            checked += 1;
        }
        assert!(checked > 0);
        assert_eq!(checked, bundle.file_count());
    }

    #[test]
    fn test_every_source_dir_is_listed_by_parent() {
        let bundle = bundle();
        for entry in WalkDir::new(source_root()).min_depth(1) {
            let entry = entry.unwrap();
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = bundle_path(entry.path());
            let (parent, name) = path.rsplit_once('/').unwrap();
            let listed = bundle.read_dir(parent).unwrap();
            assert!(
                listed.iter().any(|e| e.name == name && e.is_dir),
                "{path} missing from listing of {parent}"
            );
        }
    }

    #[test]
    fn test_underscore_and_dot_dirs_are_bundled() {
        let bundle = bundle();
        let root = bundle.read_dir(NAMESPACE).unwrap();
        assert!(root.iter().any(|e| e.name == SHARED_DIR && e.is_dir));

        assert!(bundle.stat("templates/_shared/core-principles.md").is_ok());
        let rules = bundle.read_dir("templates/web-frontend/.cursorrules").unwrap();
        assert!(rules.iter().any(|e| e.name == "overview.md"));
    }

    #[test]
    fn test_walk_totals_match_source_tree() {
        let bundle = bundle();
        let source_bytes: u64 = WalkDir::new(source_root())
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.metadata().unwrap().len())
            .sum();
        let source_entries = WalkDir::new(source_root()).into_iter().count();

        let mut visited = 0;
        let mut bytes = 0;
        bundle
            .walk_with(NAMESPACE, |e| {
                visited += 1;
                bytes += e.size();
            })
            .unwrap();

        assert_eq!(bytes, source_bytes);
        assert_eq!(bytes, bundle.total_size());
        // WalkDir also yields the root, like the bundle walk
        assert_eq!(visited, source_entries);
    }

    #[test]
    fn test_singleton_is_shared() {
        assert!(std::ptr::eq(bundle(), bundle()));
        assert_eq!(bundle().namespace(), NAMESPACE);
    }

    #[test]
    fn test_web_frontend_guide_is_readable() {
        let guide = bundle().read_to_string("templates/web-frontend/CLAUDE.md").unwrap();
        assert!(guide.starts_with("# Web Frontend"));
        assert!(matches!(
            bundle().read_all("templates/missing.md"),
            Err(crate::TemplatesError::NotFound(_))
        ));
    }
}
