//! End-to-end tests: FineReader XML in, hOCR out.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use unabbyy::render::{to_hocr, HocrOptions};
use unabbyy::{parse_bytes, parse_file, parse_str, transform, Column, Error, Unabbyy};

const NS: &str = "http://www.abbyy.com/FineReader_xml/FineReader6-schema-v1.xml";

fn char_params(text: &str, confidence: i32, dictionary: bool) -> String {
    format!(
        "<charParams l=\"0\" t=\"0\" r=\"1\" b=\"1\" wordStart=\"true\" \
         wordFromDictionary=\"{}\" charConfidence=\"{}\">{}</charParams>",
        dictionary, confidence, text
    )
}

fn block(l: i32, body: &str) -> String {
    format!(
        "<block blockType=\"Text\" l=\"{l}\" t=\"100\" r=\"{r}\" b=\"900\">\
         <region><rect l=\"{l}\" t=\"100\" r=\"{r}\" b=\"900\"/></region>\
         <text><par align=\"Justified\">{body}</par></text></block>\n",
        l = l,
        r = l + 700,
        body = body
    )
}

fn line(l: i32, runs: &str) -> String {
    format!(
        "<line baseline=\"140\" l=\"{}\" t=\"110\" r=\"{}\" b=\"150\">{}</line>",
        l,
        l + 600,
        runs
    )
}

fn page(width: u32, blocks: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <document xmlns=\"{}\" version=\"1.0\" producer=\"FineReader 6.0\" pagesCount=\"1\">\n\
         <page width=\"{}\" height=\"3300\" resolution=\"400\" originalCoords=\"true\">\n{}</page>\n\
         </document>\n",
        NS,
        width,
        blocks.concat()
    )
}

fn dictionary_page() -> String {
    let headword = format!(
        "<formatting lang=\"EnglishUnitedStates\" ff=\"Times New Roman\" fs=\"9\" bold=\"true\">{}</formatting>\
         <formatting lang=\"EnglishUnitedStates\" ff=\"Times New Roman\" fs=\"8.5\" italic=\"true\">{}</formatting>",
        char_params("A", 99, true),
        char_params("sb.", 47, false)
    );
    let caps = format!(
        "<formatting fs=\"7\" smallcaps=\"1\">{}</formatting>",
        char_params("OE", 30, false)
    );
    page(
        2480,
        &[
            block(150, &line(150, &headword)),
            block(900, &line(900, &caps)),
            block(1700, &line(1700, "")),
        ],
    )
}

#[test]
fn test_dictionary_page_columns() {
    let html = transform(&dictionary_page()).unwrap();

    // 2480 / 4 = 620, 2480 * 0.55 = 1364
    assert!(html.contains("id=\"left\" title=\"blockType: Text bbox 150 100 850 900\""));
    assert!(html.contains("id=\"center\" title=\"blockType: Text bbox 900 100 1600 900\""));
    assert!(html.contains("id=\"right\" title=\"blockType: Text bbox 1700 100 2400 900\""));

    let left = html.find("id=\"left\"").unwrap();
    let center = html.find("id=\"center\"").unwrap();
    let right = html.find("id=\"right\"").unwrap();
    assert!(left < center && center < right);
}

#[test]
fn test_dictionary_page_runs() {
    let html = transform(&dictionary_page()).unwrap();

    assert!(html.contains(
        "<span class=\"ocr_line\" title=\"bbox 150 110 750 150\">\
         <span style=\"font-size:90pt\"><b>A</b></span>\
         <span style=\"font-size:8.50pt\"><em><span class=\"low_confidence\">sb.</span></em></span>\
         </span> </p>"
    ));
    assert!(html.contains(
        "<span style=\"font-size:70pt\"><span style=\"font-variant: small-caps;\">\
         <span class=\"very_low_confidence\">OE</span></span></span>"
    ));
    assert!(html.contains("<span class=\"ocr_line\" title=\"bbox 1700 110 2300 150\"></span> </p>"));
}

#[test]
fn test_page_container() {
    let html = transform(&dictionary_page()).unwrap();
    assert!(html.contains(
        "<div id=\"container\" class=\"ocr_page\" scan_res=\"400 400\" title=\"bbox 0 0 2480 3300; \">"
    ));
    assert_eq!(html.matches("<div class=\"ocr_carea column\"").count(), 3);
    assert_eq!(html.matches("<p class=\"ocr_par\">").count(), 3);
}

#[test]
fn test_deterministic_output() {
    let xml = dictionary_page();
    assert_eq!(transform(&xml).unwrap(), transform(&xml).unwrap());
}

#[test]
fn test_bare_page_root() {
    let xml = format!(
        "<page width=\"1000\" height=\"1000\" resolution=\"300\">{}</page>",
        block(10, &line(10, &format!("<formatting fs=\"10\">{}</formatting>", char_params("x", 99, false))))
    );
    let html = transform(&xml).unwrap();
    assert!(html.contains("id=\"left\""));
    assert!(html.contains("<span style=\"font-size:100pt\">x</span>"));
}

#[test]
fn test_gzip_input_matches_plain() {
    let xml = dictionary_page();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(xml.as_bytes()).unwrap();
    let gz = encoder.finish().unwrap();

    let plain = parse_str(&xml).unwrap();
    let zipped = parse_bytes(&gz).unwrap();
    assert_eq!(plain, zipped);
}

#[test]
fn test_missing_page_attribute() {
    let xml = "<document><page width=\"10\" height=\"10\"></page></document>";
    let err = transform(xml).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingAttribute {
            element: "page",
            attribute: "resolution"
        }
    ));
}

#[test]
fn test_multi_page_document() {
    let xml = "<document>\
        <page width=\"1000\" height=\"10\" resolution=\"300\"></page>\
        <page width=\"2000\" height=\"10\" resolution=\"300\"></page>\
        </document>";

    assert!(matches!(transform(xml), Err(Error::MultiplePages(2))));

    let doc = parse_str(xml).unwrap();
    let html = to_hocr(&doc, &HocrOptions::new().lenient()).unwrap();
    assert!(html.contains("bbox 0 0 1000 10; "));
}

#[test]
fn test_builder_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page_0026.xml");
    std::fs::write(&path, dictionary_page()).unwrap();

    let doc = parse_file(&path).unwrap();
    assert_eq!(doc.metadata.producer.as_deref(), Some("FineReader 6.0"));
    assert_eq!(doc.metadata.pages_count, Some(1));

    let result = Unabbyy::new()
        .with_stylesheet("oed.css")
        .with_title("OED page 26")
        .parse(&path)
        .unwrap();
    let rendered = result.to_hocr_with_stats().unwrap();
    assert!(rendered.content.contains("href=\"oed.css\""));
    assert!(rendered.content.contains("<title>OED page 26</title>"));
    assert_eq!(rendered.stats.blocks_in(Column::Left), 1);
    assert_eq!(rendered.stats.blocks_in(Column::Center), 1);
    assert_eq!(rendered.stats.blocks_in(Column::Right), 1);
    assert_eq!(rendered.stats.char_count, 3);
    assert_eq!(rendered.stats.very_low_confidence, 1);
    assert_eq!(rendered.stats.low_confidence, 1);

    assert_eq!(result.to_text().unwrap(), "Asb.\n\nOE");
}

#[test]
fn test_long_leading_comment() {
    let xml = format!(
        "<?xml version=\"1.0\"?>\n<!-- {} -->\n<page width=\"1000\" height=\"1000\" resolution=\"300\">{}</page>",
        "c".repeat(2000),
        block(10, &line(10, &format!("<formatting fs=\"10\">{}</formatting>", char_params("Hi", 99, true))))
    );
    let html = transform(&xml).unwrap();
    assert!(html.contains("<span style=\"font-size:100pt\">Hi</span>"));
}
