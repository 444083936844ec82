//! Editor configuration loading and parsing.
//!
//! Parses `quill.toml` (or an override path provided by the caller) into
//! the three settings the editing core consumes: `smart_indentation`,
//! `indentation_width`, and `show_line_numbers`, plus the color scheme
//! name that the (external) renderer reads. Unknown fields are ignored
//! (TOML deserialization tolerance) so the file can grow without breaking
//! older binaries, and a missing or malformed file silently falls back to
//! defaults — configuration problems must never prevent editing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "quill.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Copy leading whitespace onto new lines; add one level after `{`.
    #[serde(default = "Config::default_smart_indentation")]
    pub smart_indentation: bool,
    /// Spaces per indent level (Tab key and smart indent).
    #[serde(default = "Config::default_indentation_width")]
    pub indentation_width: usize,
    /// Render a line-number gutter.
    #[serde(default = "Config::default_show_line_numbers")]
    pub show_line_numbers: bool,
    /// Theme name consumed by the renderer; opaque to the core.
    #[serde(default = "Config::default_color_scheme")]
    pub color_scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smart_indentation: Self::default_smart_indentation(),
            indentation_width: Self::default_indentation_width(),
            show_line_numbers: Self::default_show_line_numbers(),
            color_scheme: Self::default_color_scheme(),
        }
    }
}

impl Config {
    const fn default_smart_indentation() -> bool {
        true
    }
    const fn default_indentation_width() -> usize {
        4
    }
    const fn default_show_line_numbers() -> bool {
        true
    }
    fn default_color_scheme() -> String {
        "Obsidian".to_string()
    }

    /// Load configuration from `path`. Total: any failure logs and yields
    /// defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(cfg) => {
                    info!(target: "config", path = %path.display(), "loaded");
                    cfg
                }
                Err(e) => {
                    warn!(target: "config", path = %path.display(), error = %e, "parse_failed_using_defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    /// Serialize the current settings back to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("serialize config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("write config {}", path.display()))?;
        info!(target: "config", path = %path.display(), "saved");
        Ok(())
    }

    /// Create `path` with the documented defaults if it does not exist yet.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        Config::default().save(path)
    }
}

/// Best-effort config path following platform conventions: a local
/// `quill.toml` wins over the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quill").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let cfg = Config::load(Path::new("__nonexistent_hopefully__.toml"));
        assert!(cfg.smart_indentation);
        assert_eq!(cfg.indentation_width, 4);
        assert!(cfg.show_line_numbers);
    }

    #[test]
    fn parses_known_fields_and_ignores_unknown() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            tmp.path(),
            "smart_indentation = false\nindentation_width = 2\nfuture_knob = true\n",
        )
        .unwrap();
        let cfg = Config::load(tmp.path());
        assert!(!cfg.smart_indentation);
        assert_eq!(cfg.indentation_width, 2);
        // Unspecified field keeps its default.
        assert!(cfg.show_line_numbers);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "indentation_width = \"four\"").unwrap();
        assert_eq!(Config::load(tmp.path()), Config::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join(CONFIG_FILE_NAME);
        let cfg = Config {
            smart_indentation: false,
            indentation_width: 8,
            show_line_numbers: false,
            color_scheme: "Paper".into(),
        };
        cfg.save(&path).unwrap();
        assert_eq!(Config::load(&path), cfg);
    }

    #[test]
    fn write_default_if_missing_does_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "indentation_width = 3\n").unwrap();
        Config::write_default_if_missing(&path).unwrap();
        assert_eq!(Config::load(&path).indentation_width, 3);
    }
}
