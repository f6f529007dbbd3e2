//! Installer configuration.
//!
//! Stored as JSON (conventionally `agentic-templates.config.json`). Every field has
//! a default, so `{}` is a valid config and unknown fields are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplatesError};

/// Conventional file name for a persisted [`InstallConfig`].
pub const CONFIG_FILE: &str = "agentic-templates.config.json";

/// File format of installed rule files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFormat {
    /// Copy rules byte-for-byte under their bundle names.
    #[default]
    Md,
    /// Write `<stem>.mdc` with a `description`/`alwaysApply` front matter block.
    Mdc,
}

impl RuleFormat {
    /// Extension of installed rule files, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Md => "md",
            Self::Mdc => "mdc",
        }
    }
}

/// Controls where [`crate::install::Installer`] writes and what it overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Directory (relative to the target) receiving the rule files.
    pub rules_dir: String,
    /// File name of the generated development guide.
    pub guide_file: String,
    /// Replace files that already exist in the target.
    pub overwrite: bool,
    /// Plan the install without touching the disk.
    pub dry_run: bool,
    /// Render and write the development guide.
    pub generate_guide: bool,
    /// Command shown in the guide for re-running the install.
    pub reinstall_command: String,
    /// Format of installed rule files.
    pub rule_format: RuleFormat,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            rules_dir: ".cursorrules".into(),
            guide_file: "CLAUDE.md".into(),
            overwrite: true,
            dry_run: false,
            generate_guide: true,
            reinstall_command: "npx agentic-team-templates".into(),
            rule_format: RuleFormat::Md,
        }
    }
}

impl InstallConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| TemplatesError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })?;
        serde_json::from_str(&contents).map_err(|e| TemplatesError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load a config, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| TemplatesError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_rule_format(mut self, rule_format: RuleFormat) -> Self {
        self.rule_format = rule_format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = InstallConfig {
            rules_dir: ".rules".into(),
            overwrite: false,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(InstallConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "dry_run": true, "unknown": 1 }"#).unwrap();
        let config = InstallConfig::load(&path).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.rules_dir, ".cursorrules");
        assert_eq!(config.guide_file, "CLAUDE.md");
        assert!(config.overwrite);
        assert!(config.generate_guide);
        assert_eq!(config.rule_format, RuleFormat::Md);
    }

    #[test]
    fn test_rule_format_parses_lowercase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "rule_format": "mdc" }"#).unwrap();
        let config = InstallConfig::load(&path).unwrap();
        assert_eq!(config.rule_format, RuleFormat::Mdc);
        assert_eq!(config.rule_format.extension(), "mdc");

        std::fs::write(&path, r#"{ "rule_format": "html" }"#).unwrap();
        assert!(matches!(
            InstallConfig::load(&path),
            Err(TemplatesError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            InstallConfig::load(&missing),
            Err(TemplatesError::ConfigNotFound { .. })
        ));
        assert_eq!(InstallConfig::load_or_default(&missing).unwrap(), InstallConfig::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            InstallConfig::load(&broken),
            Err(TemplatesError::ConfigParse { .. })
        ));
    }
}
