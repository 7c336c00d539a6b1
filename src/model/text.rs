//! Text-level types: paragraphs, lines, formatting runs and characters.

use super::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A paragraph (`par`) inside a block's text container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Lines in source order
    pub lines: Vec<Line>,
}

impl Paragraph {
    /// Create a paragraph from lines.
    pub fn with_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Lines joined with newlines.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the paragraph has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A recognized text line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Line bounding box
    pub bbox: BoundingBox,
    /// Formatting runs in source order
    pub runs: Vec<Formatting>,
}

impl Line {
    /// Create an empty line.
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            runs: Vec::new(),
        }
    }

    /// Add a formatting run.
    pub fn with_run(mut self, run: Formatting) -> Self {
        self.runs.push(run);
        self
    }

    /// Concatenated character text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(Formatting::plain_text).collect()
    }
}

/// Font size exactly as written in the `fs` attribute.
///
/// The hOCR style emits this text followed by a literal `0` (so `12` becomes
/// `120pt` and `10.5` becomes `10.50pt`), which is why the value is never
/// parsed into a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(String);

impl FontSize {
    /// Wrap the raw attribute text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw attribute text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::new("10")
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A run of characters sharing one font (`formatting`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formatting {
    /// Font size (`fs`)
    pub font_size: FontSize,
    /// Bold face
    pub bold: bool,
    /// Italic face
    pub italic: bool,
    /// Small capitals
    pub small_caps: bool,
    /// Superscript
    pub superscript: bool,
    /// Subscript
    pub subscript: bool,
    /// Characters in source order
    pub chars: Vec<CharParams>,
}

impl Formatting {
    /// Create a plain run with the given font size.
    pub fn new(font_size: impl Into<String>) -> Self {
        Self {
            font_size: FontSize::new(font_size),
            ..Default::default()
        }
    }

    /// Set bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set small caps.
    pub fn small_caps(mut self) -> Self {
        self.small_caps = true;
        self
    }

    /// Set superscript.
    pub fn superscript(mut self) -> Self {
        self.superscript = true;
        self
    }

    /// Set subscript.
    pub fn subscript(mut self) -> Self {
        self.subscript = true;
        self
    }

    /// Add a character.
    pub fn with_char(mut self, ch: CharParams) -> Self {
        self.chars.push(ch);
        self
    }

    /// Concatenated character text.
    pub fn plain_text(&self) -> String {
        self.chars.iter().map(|c| c.text.as_str()).collect()
    }
}

/// One recognized character (`charParams`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharParams {
    /// Recognition confidence, 0-100. `None` only when parsed leniently from
    /// input without `charConfidence`.
    pub confidence: Option<i32>,
    /// The word was found in the engine's dictionary
    pub from_dictionary: bool,
    /// Recognized text, whitespace preserved
    pub text: String,
}

impl CharParams {
    /// Create a character with a confidence score.
    pub fn new(text: impl Into<String>, confidence: i32) -> Self {
        Self {
            confidence: Some(confidence),
            from_dictionary: false,
            text: text.into(),
        }
    }

    /// Mark as a dictionary word.
    pub fn from_dictionary(mut self, flag: bool) -> Self {
        self.from_dictionary = flag;
        self
    }
}
