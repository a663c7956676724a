//! Image support for OOXML documents
//!
//! Pictures are embedded via `<w:drawing>` elements holding an inline
//! (`<wp:inline>`) drawing:
//!
//! ```xml
//! <w:drawing>
//!   <wp:inline>
//!     <wp:extent cx="..." cy="..."/>               <!-- Dimensions in EMUs -->
//!     <wp:docPr id="..." name="..." descr="..."/>
//!     <a:graphic>
//!       <a:graphicData uri="...picture">
//!         <pic:pic>
//!           <pic:blipFill>
//!             <a:blip r:embed="rIdNN"/>            <!-- Relationship ID -->
//!           </pic:blipFill>
//!         </pic:pic>
//!       </a:graphicData>
//!     </a:graphic>
//!   </wp:inline>
//! </w:drawing>
//! ```
//!
//! # Unit Conversions
//!
//! OOXML uses EMUs (English Metric Units) for dimensions:
//! - 914400 EMUs = 1 inch
//! - 9525 EMUs = 1 pixel (at 96 DPI)

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// EMUs per pixel at 96 DPI (9525)
pub const EMU_PER_PIXEL: i64 = 9525;

/// Convert pixels (at 96 DPI) to EMUs
pub fn pixels_to_emu(px: u32) -> i64 {
    px as i64 * EMU_PER_PIXEL
}

/// Format and pixel size of an image file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// File extension used for the media part
    pub extension: &'static str,
    /// MIME type registered in `[Content_Types].xml`
    pub content_type: &'static str,
    /// Width in pixels
    pub width_px: u32,
    /// Height in pixels
    pub height_px: u32,
}

impl ImageInfo {
    /// Detect the format from the file signature and read the pixel size
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        let (extension, content_type) = match format {
            ImageFormat::Png => ("png", "image/png"),
            ImageFormat::Jpeg => ("jpeg", "image/jpeg"),
            ImageFormat::Gif => ("gif", "image/gif"),
            ImageFormat::Bmp => ("bmp", "image/bmp"),
            other => {
                return Err(OoxmlError::Unsupported(format!(
                    "{:?} pictures cannot be embedded",
                    other
                )))
            }
        };
        let (width_px, height_px) =
            ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;

        Ok(Self {
            extension,
            content_type,
            width_px,
            height_px,
        })
    }

    /// Width in EMUs at 96 DPI
    pub fn width_emu(&self) -> i64 {
        pixels_to_emu(self.width_px)
    }

    /// Height in EMUs at 96 DPI
    pub fn height_emu(&self) -> i64 {
        pixels_to_emu(self.height_px)
    }
}

/// An inline picture run
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    /// Drawing ID (`wp:docPr/@id`), unique within the document
    pub id: u32,
    /// Drawing name
    pub name: String,
    /// Relationship ID of the media part (e.g., "rId11")
    pub rel_id: String,
    /// Width in EMUs
    pub width_emu: i64,
    /// Height in EMUs
    pub height_emu: i64,
    raw: Option<String>,
}

impl Picture {
    /// Create a new inline picture
    pub fn new(id: u32, rel_id: impl Into<String>, width_emu: i64, height_emu: i64) -> Self {
        Self {
            id,
            name: format!("Picture {}", id),
            rel_id: rel_id.into(),
            width_emu,
            height_emu,
            raw: None,
        }
    }

    /// Parse a `<w:r>` element holding a drawing
    pub fn parse(run_xml: &str) -> Result<Self> {
        let mut picture = Picture::new(0, String::new(), 0, 0);
        picture.name.clear();
        picture.raw = Some(run_xml.to_string());

        let mut reader = Reader::from_str(run_xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = attr.unescape_value().unwrap_or_default();
                        match (e.local_name().as_ref(), attr.key.as_ref()) {
                            (b"extent", b"cx") => picture.width_emu = value.parse().unwrap_or(0),
                            (b"extent", b"cy") => picture.height_emu = value.parse().unwrap_or(0),
                            (b"docPr", b"id") => picture.id = value.parse().unwrap_or(0),
                            (b"docPr", b"name") => picture.name = value.into_owned(),
                            (b"blip", b"r:embed") => picture.rel_id = value.into_owned(),
                            _ => {}
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(picture)
    }

    pub(crate) fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

/// Highest drawing ID (`wp:docPr/@id`) used anywhere in a part
pub(crate) fn max_drawing_id(xml: &str) -> Result<u32> {
    let mut reader = Reader::from_str(xml);
    let mut max = 0;
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"docPr" => {
                let id = e
                    .attributes()
                    .filter_map(|a| a.ok())
                    .find(|a| a.key.as_ref() == b"id")
                    .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse::<u32>().ok());
                max = max.max(id.unwrap_or(0));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(max)
}
