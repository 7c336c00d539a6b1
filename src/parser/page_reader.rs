//! Streaming page reader for large FineReader exports.
//!
//! Book-length exports (`*_abbyy.gz`) hold thousands of pages and do not fit
//! comfortably in a DOM. FineReader writes each `<page ...>` start tag and
//! `</page>` end tag at the beginning of its own line, so pages can be cut
//! out line by line and parsed one at a time.
//!
//! # Example
//!
//! ```no_run
//! use unabbyy::parser::{PageReader, PageSelection, ParseOptions};
//!
//! fn main() -> unabbyy::Result<()> {
//!     let options = ParseOptions::new().with_pages(PageSelection::Range(26..=30));
//!     for page in PageReader::open("oed01arch_abbyy.gz", options)? {
//!         let page = page?;
//!         println!("page {}: {} blocks", page.number, page.block_count());
//!     }
//!     Ok(())
//! }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};
use crate::model::Page;

use super::abbyy_parser::parse_page_fragment;
use super::options::{PageSelection, ParseOptions};

/// Iterator over the pages of a FineReader export, one page in memory at a
/// time.
pub struct PageReader<R> {
    reader: R,
    options: ParseOptions,
    page_number: u32,
    done: bool,
}

impl PageReader<Box<dyn BufRead + Send>> {
    /// Open a plain or gzip-compressed export.
    pub fn open<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_read(file, options)
    }

    /// Wrap any reader, decompressing it if it starts with the gzip magic.
    pub fn from_read<R: Read + Send + 'static>(reader: R, options: ParseOptions) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let is_gzip = reader.fill_buf()?.starts_with(&[0x1f, 0x8b]);
        let reader: Box<dyn BufRead + Send> = if is_gzip {
            log::debug!("Reading gzip-compressed input");
            Box::new(BufReader::new(MultiGzDecoder::new(reader)))
        } else {
            Box::new(reader)
        };
        Ok(PageReader::new(reader, options))
    }

    /// Count the pages of an export without parsing them.
    pub fn count_pages<P: AsRef<Path>>(path: P) -> Result<u32> {
        let options = ParseOptions::new().with_pages(PageSelection::Pages(Vec::new()));
        let mut reader = Self::open(path, options)?;
        for page in reader.by_ref() {
            page?;
        }
        Ok(reader.pages_seen())
    }
}

impl<R: BufRead> PageReader<R> {
    /// Create a reader over uncompressed XML lines.
    pub fn new(reader: R, options: ParseOptions) -> Self {
        Self {
            reader,
            options,
            page_number: 0,
            done: false,
        }
    }

    /// Number of pages seen so far (selected or not).
    pub fn pages_seen(&self) -> u32 {
        self.page_number
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Collect the remaining lines of the page opened by `start`.
    fn read_page(&mut self, start: String, keep: bool) -> Result<String> {
        let mut xml = if keep { start.clone() } else { String::new() };
        if closes_on_same_line(&start) {
            return Ok(xml);
        }
        loop {
            let line = self.read_line()?.ok_or_else(|| {
                Error::InvalidStructure(format!("page {} is not closed", self.page_number))
            })?;
            let end = line.trim_start().starts_with("</page");
            if keep {
                xml.push_str(&line);
            }
            if end {
                return Ok(xml);
            }
        }
    }

    fn next_page(&mut self) -> Result<Option<Page>> {
        loop {
            if let Some(last) = self.options.pages.last_page() {
                if self.page_number >= last {
                    return Ok(None);
                }
            }

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if !opens_page(&line) {
                continue;
            }

            self.page_number += 1;
            let number = self.page_number;
            let keep = self.options.pages.includes(number);
            let xml = self.read_page(line, keep)?;
            if !keep {
                log::debug!("Skipping page {}", number);
                continue;
            }
            return parse_page_fragment(&xml, number, &self.options).map(Some);
        }
    }
}

impl<R: BufRead> Iterator for PageReader<R> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_page() {
            Ok(Some(page)) => Some(Ok(page)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn opens_page(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("<page")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
}

fn closes_on_same_line(line: &str) -> bool {
    let line = line.trim();
    if line.ends_with("</page>") {
        return true;
    }
    // `<page .../>` with nothing after the start tag
    line.find('>') == Some(line.len() - 1) && line.ends_with("/>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn export(pages: u32) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<document>\n");
        for i in 1..=pages {
            xml.push_str(&format!(
                "<page width=\"{}\" height=\"100\" resolution=\"300\">\n",
                i * 10
            ));
            xml.push_str("<block blockType=\"Text\" l=\"1\" t=\"1\" r=\"2\" b=\"2\">\n");
            xml.push_str("</block>\n</page>\n");
        }
        xml.push_str("</document>\n");
        xml
    }

    #[test]
    fn test_line_classifiers() {
        assert!(opens_page("<page width=\"1\">\n"));
        assert!(opens_page("  <page>"));
        assert!(!opens_page("<pageElement>"));
        assert!(!opens_page("</page>"));
        assert!(closes_on_same_line("<page width=\"1\"/>\n"));
        assert!(closes_on_same_line("<page width=\"1\"><block/></page>"));
        assert!(!closes_on_same_line("<page width=\"1\">"));
    }

    #[test]
    fn test_reads_all_pages() {
        let reader = PageReader::new(Cursor::new(export(3)), ParseOptions::default());
        let pages: Vec<Page> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].number, 3);
        assert_eq!(pages[2].width, 30);
        assert_eq!(pages[0].block_count(), 1);
    }

    #[test]
    fn test_stops_after_last_selected_page() {
        let options = ParseOptions::new().with_pages(PageSelection::Range(2..=3));
        let mut reader = PageReader::new(Cursor::new(export(10)), options);
        let numbers: Vec<u32> = reader
            .by_ref()
            .map(|p| p.map(|p| p.number))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(reader.pages_seen(), 3);
    }

    #[test]
    fn test_unclosed_page() {
        let xml = "<document>\n<page width=\"1\" height=\"1\" resolution=\"1\">\n<block/>\n";
        let mut reader = PageReader::new(Cursor::new(xml), ParseOptions::default());
        assert!(matches!(
            reader.next(),
            Some(Err(Error::InvalidStructure(_)))
        ));
        assert!(reader.next().is_none());
    }
}
