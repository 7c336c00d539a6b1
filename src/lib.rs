//! # unabbyy
//!
//! ABBYY FineReader XML to hOCR conversion for Rust.
//!
//! This library reads FineReader 6 layout exports (plain or gzipped) and
//! turns a page into a three-column hOCR document: each text block becomes a
//! `left`, `center` or `right` column, bold/italic/small-caps runs keep their
//! styling, and low-confidence characters are flagged for proofreading.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unabbyy::{parse_file, render};
//!
//! fn main() -> unabbyy::Result<()> {
//!     let doc = parse_file("page_0026.xml")?;
//!
//!     let options = render::HocrOptions::default();
//!     let html = render::to_hocr(&doc, &options)?;
//!     println!("{}", html);
//!
//!     Ok(())
//! }
//! ```
//!
//! Book-length exports are read one page at a time with
//! [`parser::PageReader`].

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_abbyy, InputFormat};
pub use error::{Error, Result};
pub use model::{
    Block, BoundingBox, CharParams, Column, Document, FontSize, Formatting, Line, Metadata, Page,
    Paragraph,
};
pub use parser::{AbbyyParser, ErrorMode, PageReader, PageSelection, ParseOptions};
pub use render::{HocrOptions, HocrStats, JsonFormat, RenderResult};

use std::io::Read;
use std::path::Path;

/// Parse a FineReader export (plain or gzipped) into a document.
///
/// # Example
///
/// ```no_run
/// use unabbyy::parse_file;
///
/// let doc = parse_file("page_0026.xml").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = AbbyyParser::open(path)?;
    parser.parse()
}

/// Parse a FineReader export with custom options.
///
/// # Example
///
/// ```no_run
/// use unabbyy::{parse_file_with_options, PageSelection, ParseOptions};
///
/// let options = ParseOptions::new()
///     .lenient()
///     .with_pages(PageSelection::Range(26..=30));
/// let doc = parse_file_with_options("oed01arch_abbyy.gz", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = AbbyyParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse FineReader XML (or its gzip stream) from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = AbbyyParser::from_bytes(data)?;
    parser.parse()
}

/// Parse FineReader XML from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = AbbyyParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse FineReader XML from a string.
pub fn parse_str(xml: &str) -> Result<Document> {
    parse_str_with_options(xml, ParseOptions::default())
}

/// Parse FineReader XML from a string with custom options.
pub fn parse_str_with_options(xml: &str, options: ParseOptions) -> Result<Document> {
    let parser = AbbyyParser::from_str_with_options(xml, options)?;
    parser.parse()
}

/// Parse FineReader XML from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = AbbyyParser::from_reader(reader)?;
    parser.parse()
}

/// Transform a single-page FineReader XML string into hOCR with default
/// options.
///
/// # Example
///
/// ```
/// let xml = r#"<document><page width="1000" height="1400" resolution="300">
///   <block blockType="Text" l="100" t="50" r="400" b="300"><text><par>
///     <line l="100" t="60" r="300" b="95"><formatting fs="12" bold="true">
///       <charParams charConfidence="80" wordFromDictionary="true">Hi</charParams>
///     </formatting></line>
///   </par></text></block>
/// </page></document>"#;
///
/// let html = unabbyy::transform(xml).unwrap();
/// assert!(html.contains(r#"<span style="font-size:120pt"><b>Hi</b></span>"#));
/// ```
pub fn transform(xml: &str) -> Result<String> {
    let doc = parse_str(xml)?;
    render::to_hocr(&doc, &HocrOptions::default())
}

/// Convert a single-page FineReader file to hOCR.
///
/// # Example
///
/// ```no_run
/// let html = unabbyy::to_hocr("page_0026.xml").unwrap();
/// std::fs::write("page_0026.html", html).unwrap();
/// ```
pub fn to_hocr<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_hocr(&doc, &HocrOptions::default())
}

/// Convert a single-page FineReader file to hOCR with custom options.
pub fn to_hocr_with_options<P: AsRef<Path>>(path: P, options: &HocrOptions) -> Result<String> {
    let parse_options = ParseOptions::new().with_error_mode(options.error_mode);
    let doc = parse_file_with_options(path, parse_options)?;
    render::to_hocr(&doc, options)
}

/// Extract plain text from a FineReader file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc)
}

/// Builder for parsing and converting FineReader documents.
///
/// # Example
///
/// ```no_run
/// use unabbyy::{PageSelection, Unabbyy};
///
/// let html = Unabbyy::new()
///     .lenient()
///     .with_pages(PageSelection::Range(26..=26))
///     .with_stylesheet("oed.css")
///     .merge_blocks()
///     .parse("oed01arch_abbyy.gz")?
///     .to_hocr()?;
/// # Ok::<(), unabbyy::Error>(())
/// ```
pub struct Unabbyy {
    parse_options: ParseOptions,
    hocr_options: HocrOptions,
}

impl Unabbyy {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            hocr_options: HocrOptions::default(),
        }
    }

    /// Enable lenient parsing and rendering.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self.hocr_options = self.hocr_options.lenient();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set the stylesheet href of the hOCR head.
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.hocr_options = self.hocr_options.with_stylesheet(href);
        self
    }

    /// Set the hOCR document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.hocr_options = self.hocr_options.with_title(title);
        self
    }

    /// Merge split blocks of the same column before rendering.
    pub fn merge_blocks(mut self) -> Self {
        self.hocr_options = self.hocr_options.with_merge_blocks(true);
        self
    }

    /// Parse a FineReader file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<UnabbyyResult> {
        let parser = AbbyyParser::open_with_options(path, self.parse_options)?;
        let document = parser.parse()?;
        Ok(UnabbyyResult {
            document,
            hocr_options: self.hocr_options,
        })
    }

    /// Parse FineReader XML from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<UnabbyyResult> {
        let parser = AbbyyParser::from_bytes_with_options(data, self.parse_options)?;
        let document = parser.parse()?;
        Ok(UnabbyyResult {
            document,
            hocr_options: self.hocr_options,
        })
    }
}

impl Default for Unabbyy {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a FineReader document.
pub struct UnabbyyResult {
    /// The parsed document
    pub document: Document,
    hocr_options: HocrOptions,
}

impl UnabbyyResult {
    /// Convert to hOCR.
    pub fn to_hocr(&self) -> Result<String> {
        render::to_hocr(&self.document, &self.hocr_options)
    }

    /// Convert one page of a multi-page document to hOCR, by source page
    /// number.
    pub fn page_to_hocr(&self, number: u32) -> Result<String> {
        let page = self
            .document
            .get_page(number)
            .ok_or(Error::PageOutOfRange(number, self.document.page_count()))?;
        render::page_to_hocr(page, &self.hocr_options)
    }

    /// Convert to hOCR and collect statistics.
    pub fn to_hocr_with_stats(&self) -> Result<RenderResult> {
        render::to_hocr_with_stats(&self.document, &self.hocr_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
