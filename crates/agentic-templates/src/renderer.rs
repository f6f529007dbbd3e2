//! Handlebars-based renderer for the generated development guide.
//!
//! Wraps the [`handlebars::Handlebars`] engine with **strict mode** enabled, so any
//! `{{variable}}` missing from the data context is an error instead of an empty
//! string. HTML escaping is turned off because the output is markdown.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TemplatesError};

/// Handlebars source of the `CLAUDE.md` guide written by the installer.
pub const GUIDE_TEMPLATE: &str = include_str!("guide.md.hbs");

/// One row of a rule table.
#[derive(Debug, Clone, Serialize)]
pub struct GuideRule {
    /// File name as installed (template rules carry a `<template>-` prefix).
    pub file: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuideTemplate {
    pub name: String,
    /// Section heading, e.g. `Web-frontend`.
    pub title: String,
    pub description: String,
    pub rules: Vec<GuideRule>,
}

/// Data context for [`GUIDE_TEMPLATE`].
#[derive(Debug, Clone, Serialize)]
pub struct GuideContext {
    pub rules_dir: String,
    pub shared_summary: String,
    pub shared_rules: Vec<GuideRule>,
    pub templates: Vec<GuideTemplate>,
    pub install_command: String,
}

/// Template renderer for installer output.
pub struct TemplateRenderer {
    hbs: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a new renderer with strict mode enabled and escaping disabled.
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render a template string with the given data context.
    pub fn render(&self, template: &str, data: &Value) -> Result<String> {
        self.hbs
            .render_template(template, data)
            .map_err(|e| TemplatesError::TemplateRender(e.to_string()))
    }

    /// Render the development guide.
    pub fn render_guide(&self, context: &GuideContext) -> Result<String> {
        let data = serde_json::to_value(context).map_err(|e| TemplatesError::TemplateRender(e.to_string()))?;
        self.render(GUIDE_TEMPLATE, &data)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase the first character: `web-frontend` becomes `Web-frontend`.
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
