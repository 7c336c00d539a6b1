//! hOCR rendering for FineReader documents.
//!
//! The renderer walks page → block → par → line → formatting → charParams
//! once, depth first, and writes each element as it is visited. Output order
//! is exactly source order.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::{Error, Result};
use crate::model::{Block, CharParams, Document, Formatting, Line, Page, Paragraph};
use crate::parser::{merge_split_blocks, ErrorMode};

use super::classify::{classify_confidence, classify_style, ColumnThresholds, Confidence};
use super::{HocrOptions, HocrStats, RenderResult};

/// Width the page preview was designed for.
const PREVIEW_WIDTH: f64 = 800.0;

/// hOCR capability declarations written into the head, as `(name, content)`.
const OCR_META: &[(&str, &str)] = &[
    ("ocr-system", "ABBYY-FineReader 6"),
    ("ocr-capabilities", "ocr_line ocr_page"),
    ("ocr-langs", "en"),
    ("ocr-scripts", "Latn"),
    ("ocr-microformats", ""),
];

/// Convert a single-page document to hOCR.
///
/// A document without pages is malformed. With several pages, strict mode
/// fails and lenient mode renders the first one.
pub fn to_hocr(doc: &Document, options: &HocrOptions) -> Result<String> {
    let renderer = HocrRenderer::new(options.clone());
    renderer.render(doc)
}

/// Convert a single-page document to hOCR with statistics.
pub fn to_hocr_with_stats(doc: &Document, options: &HocrOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = HocrRenderer::new(options);
    renderer.render_with_stats(doc)
}

/// Convert one page to hOCR.
pub fn page_to_hocr(page: &Page, options: &HocrOptions) -> Result<String> {
    let renderer = HocrRenderer::new(options.clone());
    renderer.render_page(page)
}

/// hOCR renderer.
pub struct HocrRenderer {
    options: HocrOptions,
    stats: HocrStats,
}

impl HocrRenderer {
    /// Create a new hOCR renderer.
    pub fn new(options: HocrOptions) -> Self {
        Self {
            options,
            stats: HocrStats::new(),
        }
    }

    /// Render the single page of a document.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        let page = self.select_page(doc)?;
        self.render_document(page)
    }

    /// Render the single page of a document with statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let page = self.select_page(doc)?;
        let content = self.render_document(page)?;
        Ok(RenderResult::new(content, self.stats))
    }

    /// Render one page as a complete hOCR document.
    pub fn render_page(mut self, page: &Page) -> Result<String> {
        self.render_document(page)
    }

    /// Render one page and return the statistics as well.
    pub fn render_page_with_stats(mut self, page: &Page) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_document(page)?;
        Ok(RenderResult::new(content, self.stats))
    }

    fn select_page<'d>(&self, doc: &'d Document) -> Result<&'d Page> {
        match doc.pages.as_slice() {
            [] => Err(Error::MissingPage),
            [page] => Ok(page),
            [first, ..] => match self.options.error_mode {
                ErrorMode::Strict => Err(Error::MultiplePages(doc.pages.len())),
                ErrorMode::Lenient => {
                    log::warn!(
                        "Document has {} pages; rendering page {} only",
                        doc.pages.len(),
                        first.number
                    );
                    Ok(first)
                }
            },
        }
    }

    fn render_document(&mut self, page: &Page) -> Result<String> {
        let merged;
        let page = if self.options.merge_blocks {
            merged = merge_split_blocks(page);
            &merged
        } else {
            page
        };

        let mut output = String::new();
        self.write_head(&mut output)?;
        output.push_str("<body>\n");
        self.write_page(&mut output, page)?;
        output.push_str("</body>\n</html>\n");
        Ok(output)
    }

    fn write_head(&self, out: &mut String) -> Result<()> {
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        writeln!(out, "<title>{}</title>", encode_text(&self.options.title))?;
        out.push_str("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n");
        for (name, content) in OCR_META {
            writeln!(out, "<meta name=\"{}\" content=\"{}\">", name, content)?;
        }
        writeln!(
            out,
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">",
            encode_double_quoted_attribute(&self.options.stylesheet)
        )?;
        out.push_str("</head>\n");
        Ok(())
    }

    fn write_page(&mut self, out: &mut String, page: &Page) -> Result<()> {
        if self.options.collect_stats {
            self.stats.add_page();
        }

        // Only logged; nothing in the output depends on the preview scale.
        let scale = PREVIEW_WIDTH / page.width as f64;
        let thresholds = ColumnThresholds::for_width(page.width);
        log::debug!(
            "Page {}: scale {:.4}, column thresholds {:.1} / {:.1}",
            page.number,
            scale,
            thresholds.left,
            thresholds.right
        );

        out.push_str("<div id=\"header\"><a id=\"prev\">Prev</a> <a id=\"next\">Next</a></div>\n");
        writeln!(
            out,
            "<div id=\"container\" class=\"ocr_page\" scan_res=\"{res} {res}\" title=\"{}; \">",
            page.bbox(),
            res = page.resolution
        )?;
        for block in &page.blocks {
            self.write_block(out, block, &thresholds)?;
        }
        out.push_str("</div>\n");
        out.push_str("<div id=\"footer\">footer placeholder</div>\n");
        Ok(())
    }

    fn write_block(
        &mut self,
        out: &mut String,
        block: &Block,
        thresholds: &ColumnThresholds,
    ) -> Result<()> {
        let column = thresholds.classify(block.bbox.left);
        if self.options.collect_stats {
            self.stats.add_block(column);
        }

        writeln!(
            out,
            "<div class=\"ocr_carea column\" id=\"{}\" title=\"blockType: {} {}\">",
            column,
            encode_double_quoted_attribute(&block.block_type),
            block.bbox
        )?;
        for para in &block.paragraphs {
            self.write_paragraph(out, para)?;
        }
        out.push_str("</div>\n");
        Ok(())
    }

    fn write_paragraph(&mut self, out: &mut String, para: &Paragraph) -> Result<()> {
        if self.options.collect_stats {
            self.stats.paragraph_count += 1;
        }
        out.push_str("<p class=\"ocr_par\">");
        for line in &para.lines {
            self.write_line(out, line)?;
        }
        out.push_str("</p>\n");
        Ok(())
    }

    fn write_line(&mut self, out: &mut String, line: &Line) -> Result<()> {
        if self.options.collect_stats {
            self.stats.line_count += 1;
        }
        write!(out, "<span class=\"ocr_line\" title=\"{}\">", line.bbox)?;
        for run in &line.runs {
            self.write_run(out, run)?;
        }
        // the space separates words across line breaks in the flowed text
        out.push_str("</span> ");
        Ok(())
    }

    fn write_run(&mut self, out: &mut String, run: &Formatting) -> Result<()> {
        if self.options.collect_stats {
            self.stats.run_count += 1;
        }

        // `fs` followed by a literal 0: "12" renders as 120pt.
        write!(
            out,
            "<span style=\"font-size:{}0pt\">",
            encode_double_quoted_attribute(run.font_size.as_str())
        )?;
        let wrap = classify_style(run);
        if let Some(wrap) = wrap {
            out.push_str(wrap.open());
        }
        for ch in &run.chars {
            self.write_char(out, ch);
        }
        if let Some(wrap) = wrap {
            out.push_str(wrap.close());
        }
        out.push_str("</span>");
        Ok(())
    }

    fn write_char(&mut self, out: &mut String, ch: &CharParams) {
        let class = classify_confidence(ch);
        if self.options.collect_stats {
            self.stats.char_count += 1;
            match class {
                Some(Confidence::VeryLow) => self.stats.very_low_confidence += 1,
                Some(Confidence::Low) => self.stats.low_confidence += 1,
                None => {}
            }
        }

        match class {
            Some(class) => {
                out.push_str("<span class=\"");
                out.push_str(class.class_name());
                out.push_str("\">");
                out.push_str(&encode_text(&ch.text));
                out.push_str("</span>");
            }
            None => out.push_str(&encode_text(&ch.text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn sample_page(width: u32, blocks: Vec<Block>) -> Page {
        let mut page = Page::new(1, width, 1400, 300);
        for block in blocks {
            page.add_block(block);
        }
        page
    }

    fn text_block(l: i32, run: Formatting) -> Block {
        let line = Line::new(BoundingBox::new(l, 60, l + 200, 95)).with_run(run);
        Block::new("Text", BoundingBox::new(l, 50, l + 300, 300))
            .with_paragraph(Paragraph::with_lines(vec![line]))
    }

    fn render(page: &Page) -> String {
        page_to_hocr(page, &HocrOptions::default()).unwrap()
    }

    #[test]
    fn test_head() {
        let html = render(&sample_page(1000, vec![]));
        assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>\n<title>OCR Output</title>"));
        assert!(html.contains("<meta name=\"ocr-system\" content=\"ABBYY-FineReader 6\">"));
        assert!(html.contains("<meta name=\"ocr-capabilities\" content=\"ocr_line ocr_page\">"));
        assert!(html.contains("<meta name=\"ocr-langs\" content=\"en\">"));
        assert!(html.contains("<meta name=\"ocr-scripts\" content=\"Latn\">"));
        assert!(html.contains("<meta name=\"ocr-microformats\" content=\"\">"));
        assert!(html.contains("href=\"3column.css\""));
    }

    #[test]
    fn test_page_frame() {
        let html = render(&sample_page(1000, vec![]));
        assert!(html.contains(
            "<div id=\"container\" class=\"ocr_page\" scan_res=\"300 300\" title=\"bbox 0 0 1000 1400; \">"
        ));
        let header = html.find("<div id=\"header\">").unwrap();
        let container = html.find("<div id=\"container\"").unwrap();
        let footer = html.find("<div id=\"footer\">footer placeholder</div>").unwrap();
        assert!(header < container && container < footer);
        assert!(html.contains(">Prev</a>"));
        assert!(html.contains(">Next</a>"));
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_end_to_end_single_block() {
        let run = Formatting::new("12")
            .bold()
            .with_char(CharParams::new("Hi", 80).from_dictionary(true));
        let html = render(&sample_page(1000, vec![text_block(100, run)]));

        assert!(html.contains(
            "<div class=\"ocr_carea column\" id=\"left\" title=\"blockType: Text bbox 100 50 400 300\">"
        ));
        assert!(html.contains(
            "<p class=\"ocr_par\"><span class=\"ocr_line\" title=\"bbox 100 60 300 95\">\
             <span style=\"font-size:120pt\"><b>Hi</b></span></span> </p>"
        ));
    }

    #[test]
    fn test_column_ids() {
        let blocks = [0, 250, 551, 1000]
            .iter()
            .map(|&l| text_block(l, Formatting::new("10")))
            .collect();
        let html = render(&sample_page(1000, blocks));
        let ids: Vec<&str> = html
            .match_indices("column\" id=\"")
            .map(|(i, m)| {
                let rest = &html[i + m.len()..];
                &rest[..rest.find('"').unwrap()]
            })
            .collect();
        assert_eq!(ids, vec!["left", "center", "right", "right"]);
    }

    #[test]
    fn test_confidence_spans() {
        let run = Formatting::new("9")
            .with_char(CharParams::new("a", 44))
            .with_char(CharParams::new("b", 47))
            .with_char(CharParams::new("c", 47).from_dictionary(true))
            .with_char(CharParams::new("d", 90));
        let html = render(&sample_page(1000, vec![text_block(0, run)]));
        assert!(html.contains(
            "<span style=\"font-size:90pt\">\
             <span class=\"very_low_confidence\">a</span>\
             <span class=\"low_confidence\">b</span>cd</span>"
        ));
    }

    #[test]
    fn test_style_wrappers() {
        let cases = [
            (Formatting::new("10").bold().italic(), "<b><em>x</em></b>"),
            (Formatting::new("10").bold().small_caps(), "<b>x</b>"),
            (Formatting::new("10").italic(), "<em>x</em>"),
            (
                Formatting::new("10").small_caps(),
                "<span style=\"font-variant: small-caps;\">x</span>",
            ),
            (Formatting::new("10").superscript(), "<sup>x</sup>"),
            (Formatting::new("10").subscript(), "<sub>x</sub>"),
        ];
        for (run, expected) in cases {
            let run = run.with_char(CharParams::new("x", 99));
            let html = render(&sample_page(1000, vec![text_block(0, run)]));
            assert!(
                html.contains(&format!("<span style=\"font-size:100pt\">{}</span>", expected)),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_font_size_concatenation() {
        let run = Formatting::new("10.5").with_char(CharParams::new("x", 99));
        let html = render(&sample_page(1000, vec![text_block(0, run)]));
        assert!(html.contains("font-size:10.50pt"));
    }

    #[test]
    fn test_text_is_escaped() {
        let run = Formatting::new("10")
            .with_char(CharParams::new("<", 99))
            .with_char(CharParams::new("&", 10));
        let mut block = text_block(0, run);
        block.block_type = "Te\"xt".to_string();
        let html = render(&sample_page(1000, vec![block]));
        assert!(html.contains("&lt;<span class=\"very_low_confidence\">&amp;</span>"));
        assert!(html.contains("blockType: Te&quot;xt"));
    }

    #[test]
    fn test_line_separator() {
        let line = |l| {
            Line::new(BoundingBox::new(l, 0, l + 1, 1))
                .with_run(Formatting::new("10").with_char(CharParams::new("w", 99)))
        };
        let block = Block::new("Text", BoundingBox::new(0, 0, 10, 10))
            .with_paragraph(Paragraph::with_lines(vec![line(1), line(2)]));
        let html = render(&sample_page(1000, vec![block]));
        assert!(html.contains("</span></span> <span class=\"ocr_line\" title=\"bbox 2 0 3 1\">"));
        assert!(html.contains("</span></span> </p>"));
    }

    #[test]
    fn test_single_page_contract() {
        let options = HocrOptions::default();
        assert!(matches!(
            to_hocr(&Document::new(), &options),
            Err(Error::MissingPage)
        ));

        let mut doc = Document::new();
        doc.add_page(Page::new(4, 100, 100, 300));
        doc.add_page(Page::new(5, 200, 100, 300));
        assert!(matches!(
            to_hocr(&doc, &options),
            Err(Error::MultiplePages(2))
        ));

        let html = to_hocr(&doc, &options.clone().lenient()).unwrap();
        assert!(html.contains("title=\"bbox 0 0 100 100; \""));
    }

    #[test]
    fn test_stats() {
        let run = Formatting::new("10")
            .with_char(CharParams::new("a", 10))
            .with_char(CharParams::new("b", 48))
            .with_char(CharParams::new("c", 99));
        let page = sample_page(
            1000,
            vec![text_block(0, run.clone()), text_block(900, run)],
        );
        let result = HocrRenderer::new(HocrOptions::default())
            .render_page_with_stats(&page)
            .unwrap();

        let stats = result.stats;
        assert_eq!(stats.page_count, 1);
        assert_eq!(stats.block_count, 2);
        assert_eq!(stats.column_blocks, [1, 0, 1]);
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.char_count, 6);
        assert_eq!(stats.very_low_confidence, 2);
        assert_eq!(stats.low_confidence, 2);
    }

    #[test]
    fn test_merge_blocks_option() {
        let a = text_block(100, Formatting::new("10"));
        let mut b = text_block(110, Formatting::new("10"));
        b.bbox = BoundingBox::new(110, 400, 410, 700);
        let page = sample_page(1000, vec![a, b]);

        let plain = render(&page);
        assert_eq!(plain.matches("ocr_carea").count(), 2);

        let merged = page_to_hocr(&page, &HocrOptions::new().with_merge_blocks(true)).unwrap();
        assert_eq!(merged.matches("ocr_carea").count(), 1);
        assert!(merged.contains("bbox 100 50 410 700"));
    }

    #[test]
    fn test_head_values_are_escaped() {
        let options = HocrOptions::new()
            .with_title("A & B <draft>")
            .with_stylesheet("x.css\" onload=\"y");
        let html = page_to_hocr(&sample_page(1000, vec![]), &options).unwrap();
        assert!(html.contains("<title>A &amp; B &lt;draft&gt;</title>"));
        assert!(html.contains("href=\"x.css&quot; onload=&quot;y\""));
    }
}
