//! docweave CLI - Command-line interface library
//!
//! - Build: assemble a DOCX from a JSON or TOML outline
//! - Render: fill a DOCX template's `{{type:name}}` tags from a data file
//! - Tags: list the tags a template contains
//!
//! # Binary Usage
//!
//! ```bash
//! # Build from an outline
//! docweave build outline.toml -o report.docx
//!
//! # Render a template
//! docweave render template.docx --data data.json -o filled.docx
//!
//! # Inspect a template
//! docweave tags template.docx
//! ```

pub mod app;

pub use app::{build_command, find_tags, render_command, run_cli, tags_command, TagLine};
