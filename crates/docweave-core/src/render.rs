//! Template rendering
//!
//! A source document acts as the template. Each body paragraph is checked
//! for a `{{type:name}}` tag: tagged paragraphs are replaced by content from
//! [`TemplateData`], everything else is copied run by run. Output goes to a
//! destination document whose own paragraphs are cleared first; its tables,
//! section properties, styles and numbering are kept.

use std::collections::HashMap;
use std::path::Path;

use docweave_ooxml::{Docx, Paragraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::copy::copy_paragraph;
use crate::data::TemplateData;
use crate::error::{RenderError, Result};
use crate::list::OrderedList;
use crate::tag::{parse_tag, Tag, TagKind};

/// What to do when a tag names an entry the data does not have
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDataPolicy {
    /// Abort the render
    #[default]
    Error,
    /// Emit an empty paragraph or heading for text and headers; nothing otherwise
    Empty,
}

/// What to do with a `{{...}}` whose body cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedTagPolicy {
    /// Abort the render
    #[default]
    Error,
    /// Copy the paragraph as if it held no tag
    Copy,
}

/// Render behavior, usually read from the `[render]` table of `docweave.toml`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub missing_data: MissingDataPolicy,
    pub malformed_tags: MalformedTagPolicy,
}

/// What a render did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// `{{text:..}}` tags substituted
    pub text: usize,
    /// `{{img:..}}` tags substituted
    pub images: usize,
    /// `{{header_N:..}}` tags substituted
    pub headers: usize,
    /// `{{table:..}}` tags substituted
    pub tables: usize,
    /// `{{list:..}}` tags substituted
    pub lists: usize,
    /// Paragraphs copied from the source
    pub copied: usize,
    /// Tags whose data entry was missing
    pub missing: usize,
}

impl RenderReport {
    /// Total number of substituted tags
    pub fn substituted(&self) -> usize {
        self.text + self.images + self.headers + self.tables + self.lists
    }
}

/// Renders template documents against one set of data
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    data: &'a TemplateData,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(data: &'a TemplateData) -> Self {
        Self {
            data,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Rebuild the body of `dest` from the paragraphs of `source`
    pub fn render(&self, source: &Docx, dest: &mut Docx) -> Result<RenderReport> {
        dest.clear_paragraphs();
        let mut report = RenderReport::default();

        for paragraph in source.paragraphs() {
            let text = paragraph.text();
            let tag = match parse_tag(&text) {
                Ok(tag) => tag,
                Err(err) => match self.options.malformed_tags {
                    MalformedTagPolicy::Error => return Err(err.into()),
                    MalformedTagPolicy::Copy => {
                        warn!(error = %err, "Copying paragraph with malformed tag");
                        None
                    }
                },
            };

            match tag {
                Some(tag) => self.substitute(&tag, paragraph, dest, &mut report)?,
                None => {
                    copy_paragraph(paragraph, dest)?;
                    report.copied += 1;
                }
            }
        }

        info!(
            substituted = report.substituted(),
            copied = report.copied,
            missing = report.missing,
            "Rendered template"
        );
        Ok(report)
    }

    /// Render, then save `dest` to `save_path`, replacing any existing file
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        source: &Docx,
        dest: &mut Docx,
        save_path: P,
    ) -> Result<RenderReport> {
        let save_path = save_path.as_ref();
        let report = self.render(source, dest)?;
        dest.save(save_path)
            .map_err(|e| RenderError::at_path(save_path, e))?;
        debug!(path = %save_path.display(), "Saved rendered document");
        Ok(report)
    }

    fn substitute(
        &self,
        tag: &Tag,
        paragraph: &Paragraph,
        dest: &mut Docx,
        report: &mut RenderReport,
    ) -> Result<()> {
        debug!(tag = %tag, "Substituting tag");
        let data = self.data;

        match &tag.kind {
            TagKind::Text => match self.lookup(&data.text, "text", &tag.name, report)? {
                Some(text) => {
                    dest.add_paragraph(text, None)?;
                    report.text += 1;
                }
                None => {
                    dest.add_paragraph("", None)?;
                }
            },
            TagKind::Image => {
                if let Some(path) = self.lookup(&data.image, "img", &tag.name, report)? {
                    dest.add_picture(path)
                        .map_err(|e| RenderError::at_path(path, e))?;
                    report.images += 1;
                }
            }
            TagKind::Header(level) => {
                match self.lookup(&data.header, "header", &tag.name, report)? {
                    Some(text) => {
                        dest.add_heading(text, *level)?;
                        report.headers += 1;
                    }
                    None => {
                        dest.add_heading("", *level)?;
                    }
                }
            }
            TagKind::Table => {
                if let Some(table) = self.lookup(&data.table, "table", &tag.name, report)? {
                    table.attach(dest);
                    report.tables += 1;
                }
            }
            TagKind::List => {
                if let Some(entries) = self.lookup(&data.list, "list", &tag.name, report)? {
                    OrderedList::new(entries.iter().cloned()).attach(dest)?;
                    report.lists += 1;
                }
            }
            TagKind::Unknown(tag_type) => {
                debug!(tag_type = %tag_type, "Unknown tag type, copying paragraph");
                copy_paragraph(paragraph, dest)?;
                report.copied += 1;
            }
        }
        Ok(())
    }

    /// Look up a data entry, applying the missing-data policy
    fn lookup<'d, T>(
        &self,
        map: &'d HashMap<String, T>,
        kind: &'static str,
        name: &str,
        report: &mut RenderReport,
    ) -> Result<Option<&'d T>> {
        if let Some(value) = map.get(name) {
            return Ok(Some(value));
        }
        match self.options.missing_data {
            MissingDataPolicy::Error => Err(RenderError::MissingData {
                kind,
                name: name.to_string(),
            }),
            MissingDataPolicy::Empty => {
                warn!(kind, name, "No data for tag");
                report.missing += 1;
                Ok(None)
            }
        }
    }
}

/// Render `source` into `dest` with default options and save to `save_path`
pub fn render<P: AsRef<Path>>(
    source: &Docx,
    dest: &mut Docx,
    data: &TemplateData,
    save_path: P,
) -> Result<RenderReport> {
    Renderer::new(data).render_to_file(source, dest, save_path)
}
