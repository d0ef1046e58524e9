use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::io;

/// Persisted tool settings, merged with per-invocation CLI flags.
///
/// Every field has a default matching the original automation: target
/// `tools`, primary branch `master`, pipeline prefix `sts4`, template
/// `pipeline.yml`, no credentials file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Concourse target alias passed to fly via -t.
    #[serde(default = "default_target")]
    pub target: String,

    /// Branch treated as the main line; no per-branch derivation.
    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,

    /// Pipeline name prefix; feature branches get `<prefix>-<branch>`.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Pipeline template file, relative to the working directory.
    #[serde(default = "default_template")]
    pub template: String,

    /// Credentials file forwarded to fly via -l. Supports ~ expansion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
}

fn default_target() -> String {
    "tools".to_string()
}

fn default_primary_branch() -> String {
    "master".to_string()
}

fn default_prefix() -> String {
    "sts4".to_string()
}

fn default_template() -> String {
    "pipeline.yml".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: default_target(),
            primary_branch: default_primary_branch(),
            prefix: default_prefix(),
            template: default_template(),
            credentials: None,
        }
    }
}

pub const KEYS: [&str; 5] = ["target", "primary_branch", "prefix", "template", "credentials"];

/// Settings file path: `<user config dir>/flypipe/config.json`.
pub fn settings_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| Error::internal_unexpected("Could not determine user config directory"))?;
    Ok(base.join("flypipe").join("config.json"))
}

/// Load settings from the default location; a missing file yields defaults.
pub fn load() -> Result<Settings> {
    load_from(&settings_path()?)
}

/// Load settings from `path`; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = io::read_file(path, &format!("read settings {}", path.display()))?;
    serde_json::from_str(&raw).map_err(|e| Error::config_invalid_json(path.to_string_lossy(), e))
}

/// Persist settings to the default location.
pub fn save(settings: &Settings) -> Result<()> {
    save_to(settings, &settings_path()?)
}

/// Persist settings to `path`, creating parent directories as needed.
pub fn save_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let payload = serde_json::to_string_pretty(settings)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize settings".to_string())))?;
    io::write_file_atomic(path, &payload, &format!("write settings {}", path.display()))
}

impl Settings {
    /// Set a settings key from its string form.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::config_invalid_value(
                key,
                Some(value.to_string()),
                "Value cannot be empty",
            ));
        }

        match key {
            "target" => self.target = trimmed.to_string(),
            "primary_branch" => self.primary_branch = trimmed.to_string(),
            "prefix" => self.prefix = trimmed.to_string(),
            "template" => self.template = trimmed.to_string(),
            "credentials" => self.credentials = Some(trimmed.to_string()),
            _ => {
                return Err(Error::config_unknown_key(
                    key,
                    KEYS.iter().map(|k| k.to_string()).collect(),
                ))
            }
        }

        Ok(())
    }

    /// Reset a settings key to its default (credentials resets to none).
    pub fn unset_key(&mut self, key: &str) -> Result<()> {
        match key {
            "target" => self.target = default_target(),
            "primary_branch" => self.primary_branch = default_primary_branch(),
            "prefix" => self.prefix = default_prefix(),
            "template" => self.template = default_template(),
            "credentials" => self.credentials = None,
            _ => {
                return Err(Error::config_unknown_key(
                    key,
                    KEYS.iter().map(|k| k.to_string()).collect(),
                ))
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.target, "tools");
        assert_eq!(settings.primary_branch, "master");
        assert_eq!(settings.prefix, "sts4");
        assert_eq!(settings.template, "pipeline.yml");
        assert!(settings.credentials.is_none());
    }

    #[test]
    fn settings_round_trip_through_the_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut settings = Settings::default();
        settings.set_key("target", "concourse-prod").unwrap();
        settings.set_key("credentials", "~/credentials.yml").unwrap();
        save_to(&settings, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.credentials.as_deref(), Some("~/credentials.yml"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "target": "ci" }"#).unwrap();

        let settings = load_from(&path).unwrap();
        assert_eq!(settings.target, "ci");
        assert_eq!(settings.prefix, "sts4");
    }

    #[test]
    fn invalid_json_reports_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_from(&path).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
        assert!(err.details["path"].as_str().unwrap().ends_with("config.json"));
    }

    #[test]
    fn unknown_key_is_rejected_with_known_keys() {
        let mut settings = Settings::default();
        let err = settings.set_key("pipeline", "x").unwrap_err();
        assert_eq!(err.code.as_str(), "config.unknown_key");
        assert!(err.details["known"]
            .as_array()
            .unwrap()
            .iter()
            .any(|k| k == "prefix"));
    }

    #[test]
    fn empty_value_is_rejected() {
        let mut settings = Settings::default();
        let err = settings.set_key("target", "   ").unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn unset_restores_defaults() {
        let mut settings = Settings::default();
        settings.set_key("prefix", "other").unwrap();
        settings.set_key("credentials", "~/c.yml").unwrap();

        settings.unset_key("prefix").unwrap();
        settings.unset_key("credentials").unwrap();

        assert_eq!(settings.prefix, "sts4");
        assert!(settings.credentials.is_none());
    }
}
