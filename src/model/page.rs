//! Page-level types.

use super::{BoundingBox, Paragraph};
use serde::{Deserialize, Serialize};

/// A single scanned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number in the source file (1-indexed)
    pub number: u32,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Scan resolution in DPI
    pub resolution: u32,

    /// Layout blocks in source order
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new page with the given geometry.
    pub fn new(number: u32, width: u32, height: u32, resolution: u32) -> Self {
        Self {
            number,
            width,
            height,
            resolution,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Whole-page bounding box.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|block| !block.is_empty())
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate over every line on the page in document order.
    pub fn lines(&self) -> impl Iterator<Item = &super::Line> {
        self.blocks
            .iter()
            .flat_map(|b| b.paragraphs.iter())
            .flat_map(|p| p.lines.iter())
    }
}

/// A layout block (`block`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// FineReader block type, e.g. `Text`, `Table`, `Picture`
    pub block_type: String,

    /// Block bounding box
    pub bbox: BoundingBox,

    /// Paragraphs of the block's text container
    pub paragraphs: Vec<Paragraph>,
}

impl Block {
    /// Create an empty block.
    pub fn new(block_type: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            block_type: block_type.into(),
            bbox,
            paragraphs: Vec::new(),
        }
    }

    /// Add a paragraph.
    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    /// Check if the block has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Paragraph texts separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Print column of a three-column page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Left column
    Left,
    /// Center column
    Center,
    /// Right column
    Right,
}

impl Column {
    /// All columns, left to right.
    pub const ALL: [Column; 3] = [Column::Left, Column::Center, Column::Right];

    /// The hOCR element id for this column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Left => "left",
            Column::Center => "center",
            Column::Right => "right",
        }
    }

    /// Position in [`Column::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Column::Left => 0,
            Column::Center => 1,
            Column::Right => 2,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
