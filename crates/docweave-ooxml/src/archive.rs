//! Archive handling for DOCX files
//!
//! A DOCX file is a ZIP archive of XML parts and media. The archive is fully
//! unpacked into memory on open and only written back on [`OoxmlArchive::write_to_file`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{OoxmlError, Result};

/// Path of the main document part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Path of the styles part
pub const STYLES_PART: &str = "word/styles.xml";
/// Path of the numbering part
pub const NUMBERING_PART: &str = "word/numbering.xml";
/// Path of the main document's relationships
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
/// Path of the content types manifest
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Represents an unpacked OOXML package
#[derive(Debug, Clone, Default)]
pub struct OoxmlArchive {
    /// All files in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        Ok(Self { files })
    }

    /// Get a file's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a file's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_PART)
            .ok_or_else(|| OoxmlError::MissingFile(DOCUMENT_PART.to_string()))
    }

    /// Get the styles definition (word/styles.xml)
    pub fn styles_xml(&self) -> Option<&[u8]> {
        self.get(STYLES_PART)
    }

    /// Get the numbering definitions (word/numbering.xml)
    pub fn numbering_xml(&self) -> Option<&[u8]> {
        self.get(NUMBERING_PART)
    }

    /// Get the document relationships (word/_rels/document.xml.rels)
    pub fn document_rels_xml(&self) -> Option<&[u8]> {
        self.get(DOCUMENT_RELS_PART)
    }

    /// Check if a file exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Set or update a file's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a file's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Remove a file from the archive
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Register a default content type for a file extension.
    ///
    /// Does nothing when the extension is already declared.
    pub fn ensure_default_content_type(&mut self, extension: &str, content_type: &str) {
        let marker = format!("Extension=\"{}\"", extension);
        let entry = format!(
            "<Default Extension=\"{}\" ContentType=\"{}\"/>",
            extension, content_type
        );
        self.insert_content_type(&marker, &entry);
    }

    /// Register a content type override for a part name (e.g. `/word/numbering.xml`).
    pub fn ensure_override_content_type(&mut self, part_name: &str, content_type: &str) {
        let marker = format!("PartName=\"{}\"", part_name);
        let entry = format!(
            "<Override PartName=\"{}\" ContentType=\"{}\"/>",
            part_name, content_type
        );
        self.insert_content_type(&marker, &entry);
    }

    fn insert_content_type(&mut self, marker: &str, entry: &str) {
        let Some(content_types) = self.get_string(CONTENT_TYPES_PART) else {
            return;
        };
        if content_types.contains(marker) {
            return;
        }
        let updated = content_types.replacen("</Types>", &format!("{}</Types>", entry), 1);
        self.set_string(CONTENT_TYPES_PART, updated);
    }

    /// Write the archive to a file, replacing any existing file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        // Serialize first so a failure leaves the target untouched
        let mut buffer = std::io::Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        let mut file = File::create(path)?;
        file.write_all(buffer.get_ref())?;
        Ok(())
    }

    /// Write the archive to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        // Content types first, then sorted paths for deterministic output
        let mut paths: Vec<_> = self.files.keys().collect();
        paths.sort_by_key(|p| (p.as_str() != CONTENT_TYPES_PART, p.as_str()));

        for path in paths {
            let contents = &self.files[path];
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }
}
