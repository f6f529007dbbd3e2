//! Build script for the embedded template bundle
//!
//! `include_dir!` does not track files added after the first build, so this
//! script registers every directory and file under templates/ for rerun.
//! A missing or unreadable tree aborts the build here with a readable message
//! instead of a macro expansion error.

use std::env;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();

    // templates/ lives at the workspace root, two levels up from this crate
    let templates_dir = Path::new(&manifest_dir).join("../../templates");

    if !templates_dir.is_dir() {
        panic!(
            "template bundle source not found: {} (expected a templates/ directory at the workspace root)",
            templates_dir.display()
        );
    }

    let mut files = 0usize;

    // No name filtering: _shared/ and .cursorrules/ must be bundled
    for entry in WalkDir::new(&templates_dir) {
        let entry = entry.unwrap_or_else(|e| panic!("failed to walk template directory: {e}"));
        let path = entry.path();

        if entry.depth() > 0 && entry.file_name().to_str().is_none() {
            panic!("template path has a non UTF-8 name: {}", path.display());
        }

        if entry.file_type().is_file() {
            if let Err(e) = fs::File::open(path) {
                panic!("template file is unreadable: {}: {e}", path.display());
            }
            files += 1;
        }

        println!("cargo:rerun-if-changed={}", path.display());
    }

    if files == 0 {
        println!("cargo:warning=templates/ contains no files; the bundle will be empty");
    }
}
