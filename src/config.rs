//! Build configuration module.
//!
//! Handles loading and validating the optional `config.toml` that lives in the
//! source root next to the documents it describes.
//!
//! ## Config File Location
//!
//! ```text
//! _adoc/
//! ├── config.toml              # Build config (optional)
//! ├── index.adoc
//! ├── gettingstarted/
//! │   └── pipeline.adoc
//! └── v1.0/
//!     └── nn_socket.adoc
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! extension = "adoc"          # Source file extension (without the dot)
//! output_root = ".."          # Output root, relative to the source root
//! fail_on_error = false       # Exit with status 1 when any document failed
//!
//! [converter]
//! program = "asciidoctor"     # AsciiDoc -> HTML converter
//! backend = "html5"           # Converter backend (-b)
//! version_label = "nanomsg"   # version-label attribute for manual pages
//!
//! [vcs]
//! program = "git"             # Queried for the last-commit timestamp
//!
//! [front_matter]
//! layout = "default"          # Layout written into synthesized front matter
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the source root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
///
/// All fields have defaults that reproduce the stock nanomsg documentation
/// build. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Extension of source documents, without the leading dot.
    pub extension: String,
    /// Where output is mirrored to, relative to the source root.
    pub output_root: String,
    /// Turn per-document failures into a non-zero exit status.
    pub fail_on_error: bool,
    /// External converter settings.
    pub converter: ConverterConfig,
    /// Version-control settings.
    pub vcs: VcsConfig,
    /// Synthesized front-matter settings.
    pub front_matter: FrontMatterConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            extension: "adoc".to_string(),
            output_root: "..".to_string(),
            fail_on_error: false,
            converter: ConverterConfig::default(),
            vcs: VcsConfig::default(),
            front_matter: FrontMatterConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("extension", &self.extension),
            ("converter.program", &self.converter.program),
            ("converter.backend", &self.converter.backend),
            ("vcs.program", &self.vcs.program),
            ("front_matter.layout", &self.front_matter.layout),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must not start with '.'".into(),
            ));
        }
        Ok(())
    }
}

/// Converter invocation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Program name or path.
    pub program: String,
    /// Output backend passed as `-b`.
    pub backend: String,
    /// `version-label` attribute for manual pages.
    pub version_label: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "asciidoctor".to_string(),
            backend: "html5".to_string(),
            version_label: "nanomsg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VcsConfig {
    /// Program name or path.
    pub program: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontMatterConfig {
    /// Layout identifier written into synthesized front matter.
    pub layout: String,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            layout: "default".to_string(),
        }
    }
}

/// Load config from `config.toml` in the given source root.
///
/// A missing file yields the defaults. A present file is parsed on top of the
/// defaults, rejecting unknown keys, and validated.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(BuildConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: BuildConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# adoc-pages configuration
# ========================
# Place this file in the source root (default: _adoc/config.toml).
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Extension of source documents, without the leading dot.
extension = "adoc"

# Output root, relative to the source root. Each document is written to
# <output_root>/<relative dir>/<stem>.html.
output_root = ".."

# Exit with status 1 when any document failed to convert.
# Off by default: failures are reported but the run still exits 0.
fail_on_error = false

# ---------------------------------------------------------------------------
# Converter
# ---------------------------------------------------------------------------
[converter]
# Invoked as: <program> [-a version-label=.. -a revnumber=.. -d manpage]
#             -b <backend> -o - -a skip-front-matter <source>
program = "asciidoctor"
backend = "html5"

# version-label attribute for documents under a v<version>/ directory.
version_label = "nanomsg"

# ---------------------------------------------------------------------------
# Version control
# ---------------------------------------------------------------------------
[vcs]
# Queried for each document's last-commit time (SOURCE_DATE_EPOCH).
program = "git"

# ---------------------------------------------------------------------------
# Front matter
# ---------------------------------------------------------------------------
[front_matter]
# Layout written into front matter synthesized for manual pages.
layout = "default"
"##
}
