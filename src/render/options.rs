//! Rendering options and configuration.

use crate::parser::ErrorMode;

/// Default stylesheet referenced by the hOCR head.
pub const DEFAULT_STYLESHEET: &str = "3column.css";

/// Default document title.
pub const DEFAULT_TITLE: &str = "OCR Output";

/// Options for rendering hOCR.
#[derive(Debug, Clone)]
pub struct HocrOptions {
    /// Stylesheet href written into the head
    pub stylesheet: String,

    /// Document title
    pub title: String,

    /// Merge stacked blocks of the same column before rendering
    pub merge_blocks: bool,

    /// Collect statistics during rendering
    pub collect_stats: bool,

    /// How a single-page transform treats documents with several pages
    pub error_mode: ErrorMode,
}

impl HocrOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stylesheet href.
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheet = href.into();
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable or disable block merging.
    pub fn with_merge_blocks(mut self, merge: bool) -> Self {
        self.merge_blocks = merge;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Render the first page of multi-page documents instead of failing.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

impl Default for HocrOptions {
    fn default() -> Self {
        Self {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            title: DEFAULT_TITLE.to_string(),
            merge_blocks: false,
            collect_stats: false,
            error_mode: ErrorMode::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hocr_options_builder() {
        let options = HocrOptions::new()
            .with_stylesheet("dict.css")
            .with_title("OED vol. 1")
            .with_merge_blocks(true)
            .lenient();

        assert_eq!(options.stylesheet, "dict.css");
        assert_eq!(options.title, "OED vol. 1");
        assert!(options.merge_blocks);
        assert_eq!(options.error_mode, ErrorMode::Lenient);
    }

    #[test]
    fn test_defaults() {
        let options = HocrOptions::default();
        assert_eq!(options.stylesheet, "3column.css");
        assert!(!options.merge_blocks);
        assert!(!options.collect_stats);
        assert_eq!(options.error_mode, ErrorMode::Strict);
    }
}
