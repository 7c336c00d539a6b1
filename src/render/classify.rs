//! Rule tables that pick column ids, style wrappers and confidence classes.
//!
//! Each table is an ordered list of `(predicate, outcome)` pairs; the first
//! matching predicate wins and no match means "no wrapper".

use crate::model::{CharParams, Column, Formatting};

/// Column breakpoints for one page, derived from its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnThresholds {
    /// Blocks starting left of this are in the left column
    pub left: f64,
    /// Blocks starting right of this are in the right column
    pub right: f64,
}

impl ColumnThresholds {
    /// Thresholds at a quarter and 55% of the page width.
    pub fn for_width(width: u32) -> Self {
        let width = width as f64;
        Self {
            left: width / 4.0,
            right: width * 0.55,
        }
    }

    /// Classify a block by its left edge. Values equal to a threshold fall
    /// in the center column.
    pub fn classify(&self, block_left: i32) -> Column {
        let l = block_left as f64;
        if l < self.left {
            Column::Left
        } else if l > self.right {
            Column::Right
        } else {
            Column::Center
        }
    }
}

/// Markup wrapped around the characters of a formatting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleWrap {
    /// `<b><em>`
    BoldItalic,
    /// `<b>`
    Bold,
    /// `<em>`
    Italic,
    /// small-caps span
    SmallCaps,
    /// `<sup>`
    Superscript,
    /// `<sub>`
    Subscript,
}

impl StyleWrap {
    /// Opening tags.
    pub fn open(&self) -> &'static str {
        match self {
            StyleWrap::BoldItalic => "<b><em>",
            StyleWrap::Bold => "<b>",
            StyleWrap::Italic => "<em>",
            StyleWrap::SmallCaps => "<span style=\"font-variant: small-caps;\">",
            StyleWrap::Superscript => "<sup>",
            StyleWrap::Subscript => "<sub>",
        }
    }

    /// Closing tags, in reverse nesting order.
    pub fn close(&self) -> &'static str {
        match self {
            StyleWrap::BoldItalic => "</em></b>",
            StyleWrap::Bold => "</b>",
            StyleWrap::Italic => "</em>",
            StyleWrap::SmallCaps => "</span>",
            StyleWrap::Superscript => "</sup>",
            StyleWrap::Subscript => "</sub>",
        }
    }
}

type StyleRule = (fn(&Formatting) -> bool, StyleWrap);

const STYLE_RULES: &[StyleRule] = &[
    (is_bold_italic, StyleWrap::BoldItalic),
    (is_bold, StyleWrap::Bold),
    (is_italic, StyleWrap::Italic),
    (is_small_caps, StyleWrap::SmallCaps),
    (is_superscript, StyleWrap::Superscript),
    (is_subscript, StyleWrap::Subscript),
];

fn is_bold_italic(run: &Formatting) -> bool {
    run.bold && run.italic
}

fn is_bold(run: &Formatting) -> bool {
    run.bold
}

fn is_italic(run: &Formatting) -> bool {
    run.italic
}

fn is_small_caps(run: &Formatting) -> bool {
    run.small_caps
}

fn is_superscript(run: &Formatting) -> bool {
    run.superscript
}

fn is_subscript(run: &Formatting) -> bool {
    run.subscript
}

/// Pick the single wrapper for a formatting run.
pub fn classify_style(run: &Formatting) -> Option<StyleWrap> {
    first_match(STYLE_RULES, run)
}

/// Low-confidence class of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Confidence below 45
    VeryLow,
    /// Confidence below 50
    Low,
}

impl Confidence {
    /// CSS class of the wrapping span.
    pub fn class_name(&self) -> &'static str {
        match self {
            Confidence::VeryLow => "very_low_confidence",
            Confidence::Low => "low_confidence",
        }
    }
}

/// Characters below this confidence are very low confidence.
pub const VERY_LOW_CONFIDENCE: i32 = 45;
/// Characters below this confidence are low confidence.
pub const LOW_CONFIDENCE: i32 = 50;

type ConfidenceRule = (fn(&CharParams) -> bool, Confidence);

const CONFIDENCE_RULES: &[ConfidenceRule] = &[
    (is_very_low, Confidence::VeryLow),
    (is_low, Confidence::Low),
];

fn below(ch: &CharParams, limit: i32) -> bool {
    !ch.from_dictionary && ch.confidence.is_some_and(|c| c < limit)
}

fn is_very_low(ch: &CharParams) -> bool {
    below(ch, VERY_LOW_CONFIDENCE)
}

fn is_low(ch: &CharParams) -> bool {
    below(ch, LOW_CONFIDENCE)
}

/// Pick the confidence class of a character; dictionary words are never
/// flagged.
pub fn classify_confidence(ch: &CharParams) -> Option<Confidence> {
    first_match(CONFIDENCE_RULES, ch)
}

fn first_match<T, O: Copy>(rules: &[(fn(&T) -> bool, O)], value: &T) -> Option<O> {
    rules
        .iter()
        .find(|(matches, _)| matches(value))
        .map(|(_, outcome)| *outcome)
}
