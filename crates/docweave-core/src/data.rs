//! Named data substituted into template tags

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::list::ListEntry;
use crate::table::TableComponent;

/// Data for one render, keyed by tag name within each tag type.
///
/// Loads from JSON or TOML:
///
/// ```toml
/// [text]
/// greeting = "hi"
///
/// [header]
/// intro = "Introduction"
///
/// [image]
/// logo = "assets/logo.png"
///
/// [table.sales]
/// headers = ["Region", "Total"]
/// data = [["North", 12], ["South", 7]]
///
/// [list]
/// steps = ["first", ["first.a", "first.b"], "second"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateData {
    /// Paragraph text for `{{text:name}}`
    pub text: HashMap<String, String>,
    /// Picture paths for `{{img:name}}`
    pub image: HashMap<String, PathBuf>,
    /// Heading text for `{{header_N:name}}`
    pub header: HashMap<String, String>,
    /// Tables for `{{table:name}}`
    pub table: HashMap<String, TableComponent>,
    /// List entries for `{{list:name}}`
    pub list: HashMap<String, Vec<ListEntry>>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.toml` file, or JSON for any other extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_structured(path.as_ref())
    }

    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.text.insert(name.into(), text.into());
        self
    }

    pub fn with_image(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.image.insert(name.into(), path.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.header.insert(name.into(), text.into());
        self
    }

    pub fn with_table(mut self, name: impl Into<String>, table: TableComponent) -> Self {
        self.table.insert(name.into(), table);
        self
    }

    pub fn with_list<I>(mut self, name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ListEntry>,
    {
        self.list
            .insert(name.into(), entries.into_iter().map(Into::into).collect());
        self
    }
}

/// Read a JSON or TOML file into `T`, picking the format by extension
pub(crate) fn load_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let parsed = if is_toml {
        toml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| RenderError::Data {
        path: path.to_path_buf(),
        message,
    })
}
