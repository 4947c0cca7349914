//! Application configuration for docgen.
//!
//! User config lives at `~/.docgen/docgen.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocgenError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docgen";

// ---------------------------------------------------------------------------
// Config structs (matching docgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Source file extension used by the module resolver, without the dot.
    #[serde(default = "default_source_ext")]
    pub source_ext: String,

    /// Section title rendered above the generated documentation.
    #[serde(default = "default_section_title")]
    pub section_title: String,

    /// Suffix appended to the entry file stem to derive the output path.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source_ext: default_source_ext(),
            section_title: default_section_title(),
            output_suffix: default_output_suffix(),
        }
    }
}

fn default_source_ext() -> String {
    "js".into()
}
fn default_section_title() -> String {
    "API".into()
}
fn default_output_suffix() -> String {
    "-api.md".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocgenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docgen/docgen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocgenError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DocgenError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocgenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocgenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocgenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("source_ext"));
        assert!(toml_str.contains("-api.md"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.source_ext, "js");
        assert_eq!(parsed.defaults.section_title, "API");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
source_ext = "mjs"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.source_ext, "mjs");
        assert_eq!(config.defaults.section_title, "API");
        assert_eq!(config.defaults.output_suffix, "-api.md");
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse empty");
        assert_eq!(config.defaults.source_ext, "js");
    }
}
