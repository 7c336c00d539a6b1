//! FineReader XML parser using roxmltree.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use flate2::read::MultiGzDecoder;
use roxmltree::Node;

use crate::detect::{detect_format_from_bytes, Compression};
use crate::error::{Error, Result};
use crate::model::{
    Block, BoundingBox, CharParams, Document, FontSize, Formatting, Line, Metadata, Page,
    Paragraph,
};

use super::options::ParseOptions;

/// FineReader document parser.
///
/// Holds the decoded XML text; the element tree is built on each call to
/// [`AbbyyParser::parse`].
pub struct AbbyyParser {
    xml: String,
    options: ParseOptions,
}

impl AbbyyParser {
    /// Open a FineReader XML file (plain or gzip).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a FineReader XML file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening {}", path.display());
        let file = File::open(path)?;
        Self::from_reader_with_options(file, options)
    }

    /// Parse FineReader XML from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse FineReader XML from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        let xml = match format.compression {
            Compression::Gzip => {
                let mut xml = String::new();
                MultiGzDecoder::new(data).read_to_string(&mut xml)?;
                xml
            }
            Compression::None => String::from_utf8(data.to_vec())
                .map_err(|e| Error::Xml(format!("input is not valid UTF-8: {}", e)))?,
        };
        Ok(Self { xml, options })
    }

    /// Parse FineReader XML from a string.
    pub fn from_str_with_options(xml: &str, options: ParseOptions) -> Result<Self> {
        Self::from_bytes_with_options(xml.as_bytes(), options)
    }

    /// Parse FineReader XML from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse FineReader XML from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse the XML into a [`Document`].
    ///
    /// The root may be a `document` element holding pages or a bare `page`.
    /// Pages are numbered by their position in the file and filtered by the
    /// page selection.
    pub fn parse(&self) -> Result<Document> {
        let xml = roxmltree::Document::parse(&self.xml)?;
        let root = xml.root_element();

        let mut document = Document::new();
        match root.tag_name().name() {
            "document" => {
                document.metadata = parse_metadata(root);
                for (index, node) in children_named(root, "page").enumerate() {
                    let number = index as u32 + 1;
                    if self.options.pages.includes(number) {
                        document.add_page(parse_page(node, number, &self.options)?);
                    }
                }
            }
            "page" => {
                if self.options.pages.includes(1) {
                    document.add_page(parse_page(root, 1, &self.options)?);
                }
            }
            other => {
                return Err(Error::InvalidStructure(format!(
                    "unexpected root element <{}>",
                    other
                )))
            }
        }

        log::debug!("Parsed {} page(s)", document.page_count());
        Ok(document)
    }
}

/// Parse one `page` element given as a standalone XML fragment.
///
/// Used by the streaming page reader, which cuts pages out of a large export
/// without building a tree for the whole file.
pub fn parse_page_fragment(xml: &str, number: u32, options: &ParseOptions) -> Result<Page> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    if root.tag_name().name() != "page" {
        return Err(Error::InvalidStructure(format!(
            "expected <page>, found <{}>",
            root.tag_name().name()
        )));
    }
    parse_page(root, number, options)
}

fn parse_metadata(node: Node) -> Metadata {
    Metadata {
        version: node.attribute("version").map(str::to_string),
        producer: node.attribute("producer").map(str::to_string),
        pages_count: node
            .attribute("pagesCount")
            .and_then(|v| v.trim().parse().ok()),
    }
}

fn parse_page(node: Node, number: u32, options: &ParseOptions) -> Result<Page> {
    let mut page = Page::new(
        number,
        number_attr(node, "page", "width")?,
        number_attr(node, "page", "height")?,
        number_attr(node, "page", "resolution")?,
    );

    for block in children_named(node, "block") {
        page.add_block(parse_block(block, options)?);
    }

    log::debug!(
        "Page {}: {}x{} @ {}dpi, {} block(s)",
        page.number,
        page.width,
        page.height,
        page.resolution,
        page.block_count()
    );
    Ok(page)
}

fn parse_block(node: Node, options: &ParseOptions) -> Result<Block> {
    let block_type = required_attr(node, "block", "blockType")?;
    let mut block = Block::new(block_type, parse_bbox(node, "block")?);

    // Only paragraphs of the block's own text container are kept; table
    // cells and picture regions are skipped.
    for text in children_named(node, "text") {
        for par in children_named(text, "par") {
            block.paragraphs.push(parse_paragraph(par, options)?);
        }
    }

    Ok(block)
}

fn parse_paragraph(node: Node, options: &ParseOptions) -> Result<Paragraph> {
    let lines = children_named(node, "line")
        .map(|line| parse_line(line, options))
        .collect::<Result<Vec<_>>>()?;
    Ok(Paragraph::with_lines(lines))
}

fn parse_line(node: Node, options: &ParseOptions) -> Result<Line> {
    let mut line = Line::new(parse_bbox(node, "line")?);
    for run in children_named(node, "formatting") {
        line.runs.push(parse_formatting(run, options)?);
    }
    Ok(line)
}

fn parse_formatting(node: Node, options: &ParseOptions) -> Result<Formatting> {
    let chars = children_named(node, "charParams")
        .map(|ch| parse_char(ch, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(Formatting {
        font_size: FontSize::new(required_attr(node, "formatting", "fs")?.trim()),
        bold: flag_attr(node, "bold"),
        italic: flag_attr(node, "italic"),
        small_caps: flag_attr(node, "smallcaps"),
        superscript: flag_attr(node, "superscript"),
        subscript: flag_attr(node, "subscript"),
        chars,
    })
}

fn parse_char(node: Node, options: &ParseOptions) -> Result<CharParams> {
    let confidence = match number_attr::<i32>(node, "charParams", "charConfidence") {
        Ok(value) => Some(value),
        Err(e) if options.is_lenient() => {
            log::warn!("{}; leaving character unclassified", e);
            None
        }
        Err(e) => return Err(e),
    };

    let text = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();

    Ok(CharParams {
        confidence,
        from_dictionary: flag_attr(node, "wordFromDictionary"),
        text,
    })
}

fn parse_bbox(node: Node, element: &'static str) -> Result<BoundingBox> {
    Ok(BoundingBox::new(
        number_attr(node, element, "l")?,
        number_attr(node, element, "t")?,
        number_attr(node, element, "r")?,
        number_attr(node, element, "b")?,
    ))
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn required_attr<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| Error::missing(element, attribute))
}

fn number_attr<T: FromStr>(
    node: Node,
    element: &'static str,
    attribute: &'static str,
) -> Result<T> {
    let raw = required_attr(node, element, attribute)?;
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid(element, attribute, raw))
}

/// Boolean attributes default to false when absent.
fn flag_attr(node: Node, attribute: &'static str) -> bool {
    matches!(node.attribute(attribute).map(str::trim), Some("true" | "1"))
}
