//! Configuration Settings
//!
//! `docweave.toml` is optional; every field has a default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::render::RenderOptions;

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "docweave.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Template rendering settings
    pub render: RenderOptions,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Options to hand to a `Renderer`
    pub fn render_options(&self) -> RenderOptions {
        self.render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{MalformedTagPolicy, MissingDataPolicy};
    use tempfile::TempDir;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.render_options().missing_data, MissingDataPolicy::Error);
        assert_eq!(settings.render_options().malformed_tags, MalformedTagPolicy::Error);
    }

    #[test]
    fn test_partial_render_table() {
        let settings = Settings::from_toml_str("[render]\nmissing_data = \"empty\"\n").unwrap();
        assert_eq!(settings.render.missing_data, MissingDataPolicy::Empty);
        assert_eq!(settings.render.malformed_tags, MalformedTagPolicy::Error);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(Settings::from_toml_str("[render]\nmissing_data = \"skip\"\n").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[render]\nmalformed_tags = \"copy\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.render.malformed_tags, MalformedTagPolicy::Copy);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[render\n").unwrap();
        assert!(matches!(Settings::load(&bad), Err(RenderError::Config(_))));
        assert!(matches!(
            Settings::load(dir.path().join("missing.toml")),
            Err(RenderError::Io { .. })
        ));
    }
}
