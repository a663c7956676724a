//! Building a document from components

use std::path::{Path, PathBuf};

use docweave_ooxml::Docx;
use serde::Deserialize;
use tracing::{debug, info};

use crate::component::Component;
use crate::data::load_structured;
use crate::error::{RenderError, Result};
use crate::list::{ListEntry, OrderedList};
use crate::table::{CellValue, TableComponent};

/// An ordered sequence of components, attached in order to a blank document.
///
/// Nothing is validated when components are added; a missing picture file
/// is only reported when the document is built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Doc {
    #[serde(default)]
    components: Vec<Component>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an outline from a `.toml` file, or JSON for any other extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_structured(path.as_ref())
    }

    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn add_header(&mut self, text: impl Into<String>, level: u32) -> &mut Self {
        self.push(Component::Header {
            text: text.into(),
            level,
        })
    }

    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Component::Paragraph { text: text.into() })
    }

    pub fn add_image(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.push(Component::Image { path: path.into() })
    }

    pub fn add_table<H, R, V>(&mut self, headers: H, data: impl IntoIterator<Item = R>) -> &mut Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.push(Component::Table(TableComponent::new(headers, data)))
    }

    pub fn add_ordered_list<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ListEntry>,
    {
        self.push(Component::OrderedList(OrderedList::new(entries)))
    }

    /// Append a prebuilt component
    pub fn push(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Attach every component, in order, to a blank document
    pub fn build(&self) -> Result<Docx> {
        let mut docx = Docx::new();
        for component in &self.components {
            debug!(kind = component.kind(), "Attaching component");
            component.attach(&mut docx)?;
        }
        Ok(docx)
    }

    /// Build and save to `path`, replacing any existing file
    pub fn to_docx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut docx = self.build()?;
        docx.save(path).map_err(|e| RenderError::at_path(path, e))?;
        info!(
            components = self.components.len(),
            path = %path.display(),
            "Built document"
        );
        Ok(())
    }

    /// Build and serialize to `.docx` bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.build()?.to_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_keeps_call_order() {
        let mut doc = Doc::new();
        doc.add_header("Title", 1)
            .add_paragraph("Body")
            .add_ordered_list(["x"])
            .add_table(["a"], vec![vec![1]])
            .add_image("missing.png");

        let kinds: Vec<_> = doc.components().iter().map(Component::kind).collect();
        assert_eq!(
            kinds,
            vec!["header", "paragraph", "ordered_list", "table", "image"]
        );
        assert_eq!(doc.len(), 5);
    }

    #[test]
    fn test_build_order_and_styles() {
        let mut doc = Doc::new();
        doc.add_header("Title", 1)
            .add_paragraph("Body")
            .add_ordered_list(["x", "y"]);

        let docx = doc.build().unwrap();
        let paragraphs: Vec<_> = docx
            .paragraphs()
            .map(|p| (p.text(), p.style_id().map(str::to_string)))
            .collect();
        assert_eq!(
            paragraphs,
            vec![
                ("Title".to_string(), Some("Heading1".to_string())),
                ("Body".to_string(), None),
                ("x".to_string(), Some("ListNumber".to_string())),
                ("y".to_string(), Some("ListNumber".to_string())),
            ]
        );
    }

    #[test]
    fn test_missing_image_fails_at_build() {
        let mut doc = Doc::new();
        doc.add_paragraph("ok").add_image("/nonexistent/pic.png");
        assert!(matches!(doc.build(), Err(RenderError::Io { .. })));
    }

    #[test]
    fn test_empty_doc_builds() {
        let doc = Doc::new();
        assert!(doc.is_empty());
        let bytes = doc.to_bytes().unwrap();
        let docx = Docx::from_bytes(&bytes).unwrap();
        assert_eq!(docx.paragraphs().count(), 0);
    }

    #[test]
    fn test_outline_toml() {
        let doc = Doc::from_toml_str(
            r#"
[[components]]
type = "header"
text = "Report"
level = 0

[[components]]
type = "ordered_list"
items = ["a", ["b"]]
"#,
        )
        .unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.components()[0],
            Component::Header {
                text: "Report".to_string(),
                level: 0
            }
        );
    }

    #[test]
    fn test_to_docx_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.docx");
        std::fs::write(&path, b"stale").unwrap();

        let mut doc = Doc::new();
        doc.add_paragraph("fresh");
        doc.to_docx(&path).unwrap();

        let docx = Docx::open(&path).unwrap();
        assert_eq!(docx.paragraphs().next().unwrap().text(), "fresh");
    }
}
