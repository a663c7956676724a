//! docweave-core - Word documents from components and templates
//!
//! Two ways to produce a `.docx`:
//!
//! - build one from an ordered list of components ([`Doc`])
//! - render a template whose paragraphs hold `{{type:name}}` tags
//!   ([`Renderer`])
//!
//! # Example
//!
//! ```
//! use docweave_core::{Doc, ListEntry};
//!
//! let mut doc = Doc::new();
//! doc.add_header("Quarterly Report", 1)
//!     .add_paragraph("Numbers below.")
//!     .add_table(["Region", "Total"], vec![vec!["North", "12"]])
//!     .add_ordered_list(vec![
//!         ListEntry::from("first"),
//!         ListEntry::from(vec![ListEntry::from("first.a")]),
//!     ]);
//!
//! let bytes = doc.to_bytes().unwrap();
//! assert!(bytes.starts_with(b"PK"));
//! ```

pub mod component;
pub mod config;
pub mod copy;
pub mod data;
pub mod doc;
pub mod error;
pub mod list;
pub mod render;
pub mod table;
pub mod tag;

pub use component::Component;
pub use config::Settings;
pub use copy::copy_paragraph;
pub use data::TemplateData;
pub use doc::Doc;
pub use error::{RenderError, Result, TagParseError};
pub use list::{list_style, ListEntry, ListItem, ListNode, OrderedList};
pub use render::{
    render, MalformedTagPolicy, MissingDataPolicy, RenderOptions, RenderReport, Renderer,
};
pub use table::{CellValue, TableComponent};
pub use tag::{parse_tag, Tag, TagKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
