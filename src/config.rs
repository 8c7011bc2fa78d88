//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/kernrig/kernrig.toml`
//! 3. Local config: `<dir>/.kernrig.toml` (project directory)
//! 4. Environment variables: `KERNRIG_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::ClassMark;

/// Pair generation and export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PairSettings {
    /// Drop pairs repeated across groups (default: keep them)
    pub dedup: bool,
    /// Expand class references into members; false writes class-kerning pairs
    pub expand_classes: bool,
    /// Sort pairs before writing
    pub sort: bool,
    /// Free-text header written above the pair table
    pub header: Option<String>,
}

impl Default for PairSettings {
    fn default() -> Self {
        Self {
            dedup: false,
            expand_classes: true,
            sort: true,
            header: Some(format!(
                "Application: kernrig Version: {}",
                env!("CARGO_PKG_VERSION")
            )),
        }
    }
}

impl PairSettings {
    /// Header to write, with an empty string meaning none.
    pub fn header_text(&self) -> Option<&str> {
        self.header.as_deref().filter(|h| !h.trim().is_empty())
    }
}

/// Raw pair settings for intermediate parsing (None → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPairSettings {
    pub dedup: Option<bool>,
    pub expand_classes: Option<bool>,
    pub sort: Option<bool>,
    pub header: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub class_mark: Option<String>,
    pub glyph_separator: Option<String>,
    pub group_prefix: Option<String>,
    pub pairs: RawPairSettings,
}

/// Unified configuration for kernrig.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Sigil marking a composition label as a class reference (default: "@")
    pub class_mark: String,
    /// Separator between glyphs in literal sequences (default: " ")
    pub glyph_separator: String,
    /// Prefix of project-metadata groups imported as classes (default: "public.kern")
    pub group_prefix: String,
    /// Pair generation settings
    pub pairs: PairSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            class_mark: "@".into(),
            glyph_separator: " ".into(),
            group_prefix: "public.kern".into(),
            pairs: PairSettings::default(),
        }
    }
}

/// Get the XDG config directory for kernrig.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kernrig").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kernrig.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".kernrig.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Class mark as a domain value.
    pub fn class_mark(&self) -> Result<ClassMark, ApplicationError> {
        ClassMark::new(self.class_mark.clone()).map_err(|e| ApplicationError::Config {
            message: format!("class_mark: {}", e),
        })
    }

    /// Merge overlay config onto self (base). Overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            class_mark: overlay
                .class_mark
                .clone()
                .unwrap_or_else(|| self.class_mark.clone()),
            glyph_separator: overlay
                .glyph_separator
                .clone()
                .unwrap_or_else(|| self.glyph_separator.clone()),
            group_prefix: overlay
                .group_prefix
                .clone()
                .unwrap_or_else(|| self.group_prefix.clone()),
            pairs: PairSettings {
                dedup: overlay.pairs.dedup.unwrap_or(self.pairs.dedup),
                expand_classes: overlay
                    .pairs
                    .expand_classes
                    .unwrap_or(self.pairs.expand_classes),
                sort: overlay.pairs.sort.unwrap_or(self.pairs.sort),
                header: overlay
                    .pairs
                    .header
                    .clone()
                    .or_else(|| self.pairs.header.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional project directory holding `.kernrig.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply KERNRIG_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("KERNRIG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("class_mark") {
            settings.class_mark = val;
        }
        if let Ok(val) = config.get_string("glyph_separator") {
            settings.glyph_separator = val;
        }
        if let Ok(val) = config.get_string("group_prefix") {
            settings.group_prefix = val;
        }
        if let Ok(val) = config.get_bool("pairs.dedup") {
            settings.pairs.dedup = val;
        }
        if let Ok(val) = config.get_bool("pairs.expand_classes") {
            settings.pairs.expand_classes = val;
        }
        if let Ok(val) = config.get_bool("pairs.sort") {
            settings.pairs.sort = val;
        }
        if let Ok(val) = config.get_string("pairs.header") {
            settings.pairs.header = Some(val);
        }

        Ok(settings)
    }

    /// Reject settings the domain cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.class_mark()?;
        if self.glyph_separator.is_empty() {
            return Err(ApplicationError::Config {
                message: "glyph_separator must not be empty".into(),
            });
        }
        if self.group_prefix.is_empty() {
            return Err(ApplicationError::Config {
                message: "group_prefix must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# kernrig configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/kernrig/kernrig.toml
#   Local:  <project>/.kernrig.toml
#   Env:    KERNRIG_* environment variables (KERNRIG_PAIRS__DEDUP=true)

# Sigil marking a composition entry as a class reference
# class_mark = "@"

# Separator between glyph names in literal entries
# glyph_separator = " "

# Project-metadata groups imported as classes (prefix + side digit + dot)
# group_prefix = "public.kern"

[pairs]
# Drop pairs produced by more than one group
# dedup = false

# Expand class references into their members (false: write @Class pairs)
# expand_classes = true

# Sort pairs before writing
# sort = true

# Header comment of the pair table ("" for none)
# header = "Application: kernrig"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
