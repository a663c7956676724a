//! Document components and how each one attaches to a document

use std::path::PathBuf;

use docweave_ooxml::Docx;
use serde::Deserialize;

use crate::error::{RenderError, Result};
use crate::list::{ListEntry, OrderedList};
use crate::table::{CellValue, TableComponent};

/// One renderable unit of document content
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ComponentOutline")]
pub enum Component {
    /// A heading; level 0 is the document title
    Header { text: String, level: u32 },
    /// A plain paragraph
    Paragraph { text: String },
    /// A picture read from disk when attached
    Image { path: PathBuf },
    /// A table with a header row
    Table(TableComponent),
    /// A nested numbered list
    OrderedList(OrderedList),
}

impl Component {
    /// Append this component to a document
    pub fn attach(&self, docx: &mut Docx) -> Result<()> {
        match self {
            Component::Header { text, level } => {
                docx.add_heading(text, *level)?;
            }
            Component::Paragraph { text } => {
                docx.add_paragraph(text, None)?;
            }
            Component::Image { path } => {
                docx.add_picture(path)
                    .map_err(|e| RenderError::at_path(path, e))?;
            }
            Component::Table(table) => table.attach(docx),
            Component::OrderedList(list) => list.attach(docx)?,
        }
        Ok(())
    }

    /// Short name of the component kind, as used in outlines
    pub fn kind(&self) -> &'static str {
        match self {
            Component::Header { .. } => "header",
            Component::Paragraph { .. } => "paragraph",
            Component::Image { .. } => "image",
            Component::Table(_) => "table",
            Component::OrderedList(_) => "ordered_list",
        }
    }
}

/// Outline form of a component, internally tagged by `type`
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ComponentOutline {
    Header {
        text: String,
        #[serde(default = "default_level")]
        level: u32,
    },
    Paragraph {
        text: String,
    },
    Image {
        path: PathBuf,
    },
    Table {
        headers: Vec<String>,
        #[serde(default)]
        data: Vec<Vec<CellValue>>,
    },
    OrderedList {
        items: Vec<ListEntry>,
    },
}

fn default_level() -> u32 {
    1
}

impl From<ComponentOutline> for Component {
    fn from(outline: ComponentOutline) -> Self {
        match outline {
            ComponentOutline::Header { text, level } => Component::Header { text, level },
            ComponentOutline::Paragraph { text } => Component::Paragraph { text },
            ComponentOutline::Image { path } => Component::Image { path },
            ComponentOutline::Table { headers, data } => {
                Component::Table(TableComponent { headers, data })
            }
            ComponentOutline::OrderedList { items } => {
                Component::OrderedList(OrderedList::new(items))
            }
        }
    }
}
