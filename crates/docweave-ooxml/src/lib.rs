//! # docweave-ooxml
//!
//! WordprocessingML (DOCX) reading and writing for docweave.
//!
//! This crate provides functionality to:
//! - Open DOCX files and templates, keeping unmodeled XML intact
//! - Create blank documents with the built-in styles docweave relies on
//! - Append paragraphs, headings, pictures and tables
//! - Read and set run formatting and paragraph alignment
//!
//! ## Example: Building a Document
//!
//! ```no_run
//! use docweave_ooxml::{Alignment, Docx};
//!
//! let mut docx = Docx::new();
//! docx.add_heading("Report", 1)?;
//! let paragraph = docx.add_paragraph("", None)?;
//! paragraph.add_run("Total: ").bold = Some(true);
//! paragraph.add_run("42");
//! paragraph.set_alignment(Some(Alignment::Center));
//! docx.add_paragraph("First", Some("List Number"))?;
//! docx.save("report.docx")?;
//! # Ok::<(), docweave_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod image;
pub mod numbering;
pub mod package;
pub mod relationships;
pub mod styles;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use archive::OoxmlArchive;
pub use document::{
    Alignment, Block, Document, Paragraph, ParagraphChild, RgbColor, Run, Table, TableCell,
    TableRow,
};
pub use error::{OoxmlError, Result};
pub use image::{ImageInfo, Picture};
pub use package::Docx;
pub use relationships::Relationships;
pub use styles::{Style, StyleSheet, StyleType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
