//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// A parsed FineReader export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Attributes of the `document` root element
    pub metadata: Metadata,

    /// Pages in source order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding a single page.
    pub fn from_page(page: Page) -> Self {
        Self {
            metadata: Metadata::default(),
            pages: vec![page],
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by its source number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Attributes of the FineReader `document` element.
///
/// A bare `page` root leaves every field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Schema version (`version`)
    pub version: Option<String>,

    /// Exporter (`producer`)
    pub producer: Option<String>,

    /// Declared page count (`pagesCount`)
    pub pages_count: Option<u32>,
}
