//! Error types for unabbyy library.

use std::io;
use thiserror::Error;

/// Result type alias for unabbyy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading FineReader XML or writing hOCR.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as FineReader XML.
    #[error("Unknown file format: not a FineReader XML document")]
    UnknownFormat,

    /// The XML itself is not well formed.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The XML is well formed but does not have the FineReader shape.
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// The document contains no `page` element.
    #[error("Malformed input: document has no page")]
    MissingPage,

    /// A single-page transform was given a document with several pages.
    #[error("Malformed input: expected exactly one page, found {0}")]
    MultiplePages(usize),

    /// A required attribute is absent.
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// Element name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
    },

    /// An attribute is present but its value cannot be interpreted.
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        /// Element name
        element: &'static str,
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute text
        value: String,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn missing(element: &'static str, attribute: &'static str) -> Self {
        Error::MissingAttribute { element, attribute }
    }

    pub(crate) fn invalid(
        element: &'static str,
        attribute: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Error::InvalidAttribute {
            element,
            attribute,
            value: value.into(),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Render(err.to_string())
    }
}
