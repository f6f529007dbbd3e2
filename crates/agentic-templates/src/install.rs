//! Install templates from the bundle into a project directory.
//!
//! ## Output layout
//!
//! ```text
//! <target>/
//! ├── CLAUDE.md                       # generated guide (InstallConfig::guide_file)
//! └── .cursorrules/                   # InstallConfig::rules_dir
//!     ├── core-principles.md          # shared rules keep their name
//!     └── web-frontend-overview.md    # template rules get a `<template>-` prefix
//! ```
//!
//! With [`RuleFormat::Mdc`] every rule is written as `<stem>.mdc` behind a front
//! matter block; shared rules get `alwaysApply: true`.
//!
//! The whole install is planned before anything is written: unknown templates and
//! (with `overwrite = false`) existing destinations fail without side effects.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::bundle::Bundle;
use crate::catalog::{self, Catalog, Template};
use crate::config::{InstallConfig, RuleFormat};
use crate::error::{Result, TemplatesError};
use crate::renderer::{self, GuideContext, GuideRule, GuideTemplate, TemplateRenderer};

/// A rule file copied (or planned, in dry-run mode) into the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFile {
    /// Bundle path of the source file.
    pub source: String,
    pub destination: PathBuf,
    pub bytes: u64,
}

/// Outcome of [`Installer::install`].
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub target_dir: PathBuf,
    /// Installed template names, in request order without duplicates.
    pub templates: Vec<String>,
    pub files: Vec<InstalledFile>,
    /// Path of the generated guide, if one was produced.
    pub guide: Option<PathBuf>,
    pub dry_run: bool,
}

impl InstallReport {
    /// Number of rule files (shared and template-specific).
    pub fn rule_count(&self) -> usize {
        self.files.len()
    }
}

struct PlannedCopy {
    source: String,
    destination: PathBuf,
    contents: Cow<'static, [u8]>,
}

/// Copies shared and template rules out of a [`Bundle`].
pub struct Installer<'a> {
    bundle: &'a Bundle,
    catalog: Catalog,
    config: InstallConfig,
    renderer: TemplateRenderer,
}

impl<'a> Installer<'a> {
    /// Fails when `rules_dir` or `guide_file` would write outside the target.
    pub fn new(bundle: &'a Bundle, config: InstallConfig) -> Result<Self> {
        check_contained("rules_dir", &config.rules_dir)?;
        check_contained("guide_file", &config.guide_file)?;
        Ok(Self {
            bundle,
            catalog: Catalog::from_bundle(bundle)?,
            config,
            renderer: TemplateRenderer::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Install `templates` (plus all shared rules) into `target_dir`.
    pub fn install(&self, target_dir: &Path, templates: &[&str]) -> Result<InstallReport> {
        if templates.is_empty() {
            return Err(TemplatesError::NoTemplatesSelected);
        }

        let mut selected: Vec<&Template> = Vec::new();
        for name in templates {
            let template = self.catalog.require(name)?;
            if !selected.iter().any(|t| t.name == template.name) {
                selected.push(template);
            }
        }

        let rules_dir = target_dir.join(&self.config.rules_dir);
        let copies = self.plan_copies(&rules_dir, &selected)?;

        let guide = if self.config.generate_guide {
            let context = self.guide_context(&selected);
            let text = self.renderer.render_guide(&context)?;
            Some((target_dir.join(&self.config.guide_file), text))
        } else {
            None
        };

        if !self.config.overwrite {
            let destinations = copies
                .iter()
                .map(|c| &c.destination)
                .chain(guide.as_ref().map(|(path, _)| path));
            for destination in destinations {
                if destination.exists() {
                    return Err(TemplatesError::DestinationExists(destination.clone()));
                }
            }
        }

        if self.config.dry_run {
            info!(dir = %target_dir.display(), "dry run: no files will be written");
        } else {
            std::fs::create_dir_all(&rules_dir)?;
        }

        info!(
            count = self.catalog.shared_rules().len(),
            "installing shared rules"
        );
        let mut files = Vec::with_capacity(copies.len());
        for copy in copies {
            debug!(source = %copy.source, destination = %copy.destination.display(), "copy rule");
            if !self.config.dry_run {
                write_file(&copy.destination, &copy.contents)?;
            }
            files.push(InstalledFile {
                source: copy.source,
                destination: copy.destination,
                bytes: copy.contents.len() as u64,
            });
        }

        let guide = match guide {
            Some((path, text)) => {
                info!(path = %path.display(), "generating guide");
                if !self.config.dry_run {
                    write_file(&path, text.as_bytes())?;
                }
                Some(path)
            }
            None => None,
        };

        let names: Vec<String> = selected.iter().map(|t| t.name.clone()).collect();
        info!(
            templates = %names.join(", "),
            rules = files.len(),
            dry_run = self.config.dry_run,
            "install complete"
        );

        Ok(InstallReport {
            target_dir: target_dir.to_path_buf(),
            templates: names,
            files,
            guide,
            dry_run: self.config.dry_run,
        })
    }

    fn plan_copies(&self, rules_dir: &Path, selected: &[&Template]) -> Result<Vec<PlannedCopy>> {
        let mut copies = Vec::new();

        for rule in self.catalog.shared_rules() {
            let source = self.catalog.shared_rule_path(rule);
            let contents = self.bundle.read_all(&source)?;
            copies.push(PlannedCopy {
                destination: rules_dir.join(self.installed_name(None, rule)),
                contents: self.rule_contents(rule, contents, true),
                source,
            });
        }

        for template in selected {
            info!(template = %template.name, rules = template.rules.len(), "installing template");
            for rule in &template.rules {
                let source = template.rule_path(self.catalog.namespace(), rule);
                let contents = self.bundle.read_all(&source)?;
                copies.push(PlannedCopy {
                    destination: rules_dir.join(self.installed_name(Some(&template.name), rule)),
                    contents: self.rule_contents(rule, contents, false),
                    source,
                });
            }
        }

        Ok(copies)
    }

    /// File name of a rule in the target, optionally prefixed with its template.
    fn installed_name(&self, template: Option<&str>, rule: &str) -> String {
        let name = match self.config.rule_format {
            RuleFormat::Md => Cow::Borrowed(rule),
            RuleFormat::Mdc => Cow::Owned(format!("{}.mdc", catalog::rule_stem(rule))),
        };
        match template {
            Some(template) => format!("{template}-{name}"),
            None => name.into_owned(),
        }
    }

    fn rule_contents(
        &self,
        rule: &str,
        contents: &'static [u8],
        shared: bool,
    ) -> Cow<'static, [u8]> {
        // .mdc sources already carry their front matter
        if self.config.rule_format == RuleFormat::Md || rule.ends_with(".mdc") {
            return Cow::Borrowed(contents);
        }
        let mut out = catalog::mdc_front_matter(contents, shared).into_bytes();
        out.extend_from_slice(contents);
        Cow::Owned(out)
    }

    fn guide_context(&self, selected: &[&Template]) -> GuideContext {
        let shared = self.catalog.shared_rules();
        let shared_summary = shared
            .iter()
            .map(|r| catalog::rule_stem(r).replace('-', " "))
            .collect::<Vec<_>>()
            .join(", ");

        let templates = selected
            .iter()
            .map(|t| GuideTemplate {
                name: t.name.clone(),
                title: renderer::title_case(&t.name),
                description: t.description.clone().unwrap_or_else(|| t.name.clone()),
                rules: t
                    .rules
                    .iter()
                    .map(|rule| GuideRule {
                        file: self.installed_name(Some(&t.name), rule),
                        purpose: catalog::rule_purpose(rule),
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        let names: Vec<&str> = selected.iter().map(|t| t.name.as_str()).collect();

        GuideContext {
            rules_dir: self.config.rules_dir.clone(),
            shared_summary,
            shared_rules: shared
                .iter()
                .map(|rule| GuideRule {
                    file: self.installed_name(None, rule),
                    purpose: catalog::rule_purpose(rule),
                })
                .collect(),
            templates,
            install_command: format!("{} {}", self.config.reinstall_command, names.join(" ")),
        }
    }
}

fn check_contained(field: &'static str, value: &str) -> Result<()> {
    let escapes = Path::new(value).components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    if escapes {
        return Err(TemplatesError::UnsafeConfigPath {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing file");
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
