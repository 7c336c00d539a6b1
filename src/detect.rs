//! Input format detection for FineReader exports.
//!
//! FineReader XML is delivered either as plain XML or gzip-compressed
//! (`*_abbyy.gz` on scanning archives). Detection only looks at the first
//! bytes of the input.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Gzip magic bytes.
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];
/// Number of bytes inspected when looking for the root element.
const SNIFF_LEN: usize = 1024;

/// Compression applied to the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain XML text
    None,
    /// gzip stream wrapping the XML
    Gzip,
}

/// Detected input format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormat {
    /// Compression of the stream
    pub compression: Compression,
    /// Root element name, when it could be seen in the sniffed bytes
    /// (always `None` for compressed input)
    pub root: Option<String>,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.compression {
            Compression::None => write!(f, "FineReader XML")?,
            Compression::Gzip => write!(f, "FineReader XML (gzip)")?,
        }
        if let Some(ref root) = self.root {
            write!(f, " <{}>", root)?;
        }
        Ok(())
    }
}

/// Detect the input format from a file path.
///
/// Only the first kilobyte is read. A prolog that runs past it is not
/// rejected; the parser decides once the whole file is read.
///
/// # Example
/// ```no_run
/// use unabbyy::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("oed01arch_abbyy.gz").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    BufReader::new(file)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut header)?;
    let complete = header.len() < SNIFF_LEN;
    detect_format(&header, complete)
}

/// Detect the input format of a complete document held in memory.
///
/// # Returns
/// * `Ok(InputFormat)` for gzip data or XML whose root is `document` or `page`
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    detect_format(data, true)
}

fn detect_format(data: &[u8], complete: bool) -> Result<InputFormat> {
    if data.starts_with(GZIP_MAGIC) {
        return Ok(InputFormat {
            compression: Compression::Gzip,
            root: None,
        });
    }

    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = String::from_utf8_lossy(data);

    match root_element_name(&text) {
        RootScan::Found(root) if is_abbyy_root(root) => Ok(InputFormat {
            compression: Compression::None,
            root: Some(root.to_string()),
        }),
        RootScan::Truncated if !complete => Ok(InputFormat {
            compression: Compression::None,
            root: None,
        }),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if bytes look like a FineReader export.
pub fn is_abbyy_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check if a file looks like a FineReader export.
pub fn is_abbyy<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

fn is_abbyy_root(name: &str) -> bool {
    let local = name.rsplit(':').next().unwrap_or(name);
    local == "document" || local == "page"
}

enum RootScan<'a> {
    Found(&'a str),
    /// The text ended inside the prolog
    Truncated,
    /// Not XML markup
    Missing,
}

/// Find the first element name, skipping the prolog, comments and doctype.
fn root_element_name(text: &str) -> RootScan<'_> {
    let mut rest = text.trim_start();
    loop {
        let skip = if rest.starts_with("<?") {
            rest.find("?>").map(|i| i + 2)
        } else if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else if rest.starts_with("<!") {
            rest.find('>').map(|i| i + 1)
        } else if let Some(tag) = rest.strip_prefix('<') {
            return match tag.find(|c: char| c.is_whitespace() || c == '>' || c == '/') {
                Some(0) => RootScan::Missing,
                Some(end) => RootScan::Found(&tag[..end]),
                None => RootScan::Truncated,
            };
        } else if rest.is_empty() {
            return RootScan::Truncated;
        } else {
            return RootScan::Missing;
        };

        match skip {
            Some(skip) => rest = rest[skip..].trim_start(),
            None => return RootScan::Truncated,
        }
    }
}
