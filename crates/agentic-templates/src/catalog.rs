//! Template discovery over a [`Bundle`].
//!
//! Every directory directly under the namespace root is a template, except the
//! shared-rules directory (`_shared`) and dot-prefixed names. A template carries a
//! `CLAUDE.md` guide and a `.cursorrules/` directory of rule files:
//!
//! ```text
//! templates/
//! ├── _shared/                  # rules installed with every template
//! │   └── core-principles.md
//! └── web-frontend/
//!     ├── CLAUDE.md             # first heading becomes the description
//!     └── .cursorrules/
//!         └── overview.md
//! ```

use tracing::debug;

use crate::bundle::Bundle;
use crate::embedded::SHARED_DIR;
use crate::error::{Result, TemplatesError};
use crate::path;

/// Directory inside a template that holds its rule files.
pub const RULES_DIR: &str = ".cursorrules";

/// File inside a template whose first heading describes it.
pub const GUIDE_FILE: &str = "CLAUDE.md";

const MAX_DESCRIPTION_LEN: usize = 120;

/// One installable template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    /// First `# ` heading of the template's `CLAUDE.md`.
    pub description: Option<String>,
    /// Rule file names under `.cursorrules/`, name-sorted.
    pub rules: Vec<String>,
}

impl Template {
    /// Bundle path of a rule file of this template.
    pub fn rule_path(&self, namespace: &str, rule: &str) -> String {
        format!("{namespace}/{}/{RULES_DIR}/{rule}", self.name)
    }
}

/// Templates and shared rules discovered in a bundle.
#[derive(Debug, Clone)]
pub struct Catalog {
    namespace: String,
    templates: Vec<Template>,
    shared_rules: Vec<String>,
}

impl Catalog {
    /// Scan the namespace root of `bundle`.
    pub fn from_bundle(bundle: &Bundle) -> Result<Self> {
        let namespace = bundle.namespace();
        let mut templates = Vec::new();
        let mut shared_rules = Vec::new();

        for entry in bundle.read_dir(namespace)? {
            if !entry.is_dir || entry.name.starts_with('.') {
                continue;
            }
            if entry.name == SHARED_DIR {
                shared_rules = file_names(bundle, &entry.path)?;
                continue;
            }

            let rules_path = path::join(&entry.path, RULES_DIR);
            let rules = if bundle.exists(&rules_path) {
                file_names(bundle, &rules_path)?
            } else {
                Vec::new()
            };

            let guide_path = path::join(&entry.path, GUIDE_FILE);
            let description = match bundle.read_to_string(&guide_path) {
                Ok(text) => extract_description(text),
                Err(TemplatesError::NotFound(_)) => None,
                Err(e) => return Err(e),
            };

            templates.push(Template {
                name: entry.name,
                description,
                rules,
            });
        }

        debug!(
            templates = templates.len(),
            shared_rules = shared_rules.len(),
            "catalog scanned"
        );

        Ok(Self {
            namespace: namespace.to_string(),
            templates,
            shared_rules,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// All templates, name-sorted.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Like [`Catalog::get`], but an unknown name is an error listing the alternatives.
    pub fn require(&self, name: &str) -> Result<&Template> {
        self.get(name).ok_or_else(|| TemplatesError::UnknownTemplate {
            name: name.to_string(),
            available: self.names().join(", "),
        })
    }

    /// Rule file names under `_shared/`, name-sorted.
    pub fn shared_rules(&self) -> &[String] {
        &self.shared_rules
    }

    /// Bundle path of a shared rule file.
    pub fn shared_rule_path(&self, rule: &str) -> String {
        format!("{}/{SHARED_DIR}/{rule}", self.namespace)
    }
}

fn file_names(bundle: &Bundle, dir: &str) -> Result<Vec<String>> {
    Ok(bundle
        .read_dir(dir)?
        .into_iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.name)
        .collect())
}

/// Title of the first line when it is a `# ` heading, cut to 120 characters.
pub fn extract_description(text: &str) -> Option<String> {
    let first = text.lines().next()?;
    let title = first.strip_prefix("# ")?.trim();
    if title.is_empty() {
        return None;
    }
    if title.chars().count() > MAX_DESCRIPTION_LEN {
        let cut: String = title.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
        Some(format!("{cut}..."))
    } else {
        Some(title.to_string())
    }
}

/// Rule file name without its `.mdc` or `.md` extension.
pub fn rule_stem(rule_file: &str) -> &str {
    rule_file
        .strip_suffix(".mdc")
        .or_else(|| rule_file.strip_suffix(".md"))
        .unwrap_or(rule_file)
}

/// Human label for a rule file: `api-design.md` becomes `api design guidelines`.
pub fn rule_purpose(rule_file: &str) -> String {
    format!("{} guidelines", rule_stem(rule_file).replace('-', " "))
}

/// Front matter for a rule written in `.mdc` form.
///
/// The description is the rule's first heading (`Rule` when it has none) with
/// double quotes escaped. Shared rules apply to every file.
pub fn mdc_front_matter(contents: &[u8], always_apply: bool) -> String {
    let description = std::str::from_utf8(contents)
        .ok()
        .and_then(extract_description)
        .unwrap_or_else(|| "Rule".to_string())
        .replace('"', "\\\"");
    format!("---\ndescription: {description}\nalwaysApply: {always_apply}\n---\n\n")
}
