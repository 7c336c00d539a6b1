//! unabbyy CLI - FineReader XML to hOCR conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unabbyy::parser::{ColumnEdges, PageReader};
use unabbyy::render::{self, HocrOptions, HocrStats};
use unabbyy::{parse_file_with_options, JsonFormat, PageSelection, ParseOptions};

const DEFAULT_TEMPLATE: &str = "page_%04d.html";

#[derive(Parser)]
#[command(name = "unabbyy")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert ABBYY FineReader XML to three-column hOCR", long_about = None)]
struct Cli {
    /// Input FineReader XML file (plain or gzip)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single-page document to hOCR
    Hocr {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render the first page of multi-page documents and tolerate
        /// characters without confidence
        #[arg(long)]
        lenient: bool,

        /// Stylesheet href written into the hOCR head
        #[arg(long, env = "UNABBYY_STYLESHEET", default_value = render::DEFAULT_STYLESHEET)]
        stylesheet: String,

        /// Document title
        #[arg(long, default_value = render::DEFAULT_TITLE)]
        title: String,

        /// Merge stacked blocks of the same column
        #[arg(long)]
        merge_blocks: bool,

        /// Print rendering statistics to stderr
        #[arg(long)]
        stats: bool,

        /// Render this page of a multi-page document
        #[arg(long, value_name = "N")]
        page: Option<u32>,
    },

    /// Split a multi-page export into one hOCR file per page
    Convert {
        /// Input FineReader XML file (plain or gzip)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Page range (e.g., "26-500", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output file name template; `%d` or `%0Nd` is the page number
        #[arg(long, default_value = DEFAULT_TEMPLATE)]
        template: String,

        /// Stylesheet href written into each hOCR head
        #[arg(long, env = "UNABBYY_STYLESHEET", default_value = render::DEFAULT_STYLESHEET)]
        stylesheet: String,

        /// Merge stacked blocks of the same column
        #[arg(long)]
        merge_blocks: bool,

        /// Render pages that have characters without confidence
        #[arg(long)]
        lenient: bool,
    },

    /// Extract plain text
    Text {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Dump the parsed OCR tree as JSON
    Json {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show document information
    Info {
        /// Input FineReader XML file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Hocr {
            input,
            output,
            lenient,
            stylesheet,
            title,
            merge_blocks,
            stats,
            page,
        }) => {
            let mut options = HocrOptions::new()
                .with_stylesheet(stylesheet)
                .with_title(title)
                .with_merge_blocks(merge_blocks)
                .with_stats(stats);
            if lenient {
                options = options.lenient();
            }
            cmd_hocr(&input, output.as_deref(), page, &options)
        }
        Some(Commands::Convert {
            input,
            output,
            pages,
            template,
            stylesheet,
            merge_blocks,
            lenient,
        }) => {
            let mut options = HocrOptions::new()
                .with_stylesheet(stylesheet)
                .with_merge_blocks(merge_blocks);
            if lenient {
                options = options.lenient();
            }
            cmd_convert(
                &input,
                output.as_deref(),
                pages.as_deref(),
                &template,
                &options,
            )
        }
        Some(Commands::Text {
            input,
            output,
            pages,
        }) => cmd_text(&input, output.as_deref(), pages.as_deref()),
        Some(Commands::Json {
            input,
            output,
            compact,
            pages,
        }) => cmd_json(&input, output.as_deref(), compact, pages.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: split into pages if input is provided
            if let Some(input) = cli.input {
                cmd_convert(
                    &input,
                    cli.output.as_deref(),
                    None,
                    DEFAULT_TEMPLATE,
                    &HocrOptions::default(),
                )
            } else {
                println!("{}", "Usage: unabbyy <FILE> [OUTPUT]".yellow());
                println!("       unabbyy --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p)?),
        None => Ok(PageSelection::All),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_hocr(
    input: &Path,
    output: Option<&Path>,
    page: Option<u32>,
    options: &HocrOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut parse_options = ParseOptions::new().with_error_mode(options.error_mode);
    if let Some(number) = page {
        parse_options = parse_options.with_pages(PageSelection::Range(number..=number));
    }
    let doc = parse_file_with_options(input, parse_options)?;
    if let Some(number) = page {
        if doc.get_page(number).is_none() {
            let present = PageReader::count_pages(input)?;
            return Err(unabbyy::Error::PageOutOfRange(number, present).into());
        }
    }

    let result = render::to_hocr_with_stats(&doc, options)?;
    if options.collect_stats {
        print_stats(&result.stats);
    }

    write_output(output, &result.content)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    template: &str,
    options: &HocrOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = page_selection(pages)?;

    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_hocr", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let pb = match selected_page_count(&selection) {
        Some(count) => {
            let pb = ProgressBar::new(count);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner().template("{spinner:.green} {pos} {msg}")?,
            );
            pb
        }
    };

    let parse_options = ParseOptions::new()
        .with_error_mode(options.error_mode)
        .with_pages(selection);
    let mut stats = HocrStats::new();
    let mut written = 0u32;

    for page in PageReader::open(input, parse_options)? {
        let page = page?;
        pb.set_message(format!("page {}", page.number));

        let result = render::HocrRenderer::new(options.clone()).render_page_with_stats(&page)?;
        stats.merge(&result.stats);

        let path = output_dir.join(page_file_name(template, page.number));
        fs::write(&path, &result.content)?;
        log::info!("Wrote {}", path.display());

        written += 1;
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} page(s) written to {}",
        "Done!".green().bold(),
        written,
        output_dir.display()
    );
    print_stats(&stats);

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Use lenient mode to keep text of characters without confidence
    let options = ParseOptions::new()
        .lenient()
        .with_pages(page_selection(pages)?);
    let doc = parse_file_with_options(input, options)?;

    let text = render::to_text(&doc)?;
    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    pages: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new().with_pages(page_selection(pages)?);
    let doc = parse_file_with_options(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = unabbyy::detect_format_from_path(input)?;

    // Use lenient mode for info command - we want the layout even if some
    // characters lack confidence values
    let options = ParseOptions::new().lenient();
    let doc = parse_file_with_options(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Pages".bold(), doc.page_count());

    if let Some(ref version) = doc.metadata.version {
        println!("{}: {}", "Version".bold(), version);
    }
    if let Some(ref producer) = doc.metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(count) = doc.metadata.pages_count {
        println!("{}: {}", "Declared pages".bold(), count);
    }

    let mut stats = HocrStats::new();
    for page in &doc.pages {
        let result =
            render::HocrRenderer::new(HocrOptions::default()).render_page_with_stats(page)?;
        stats.merge(&result.stats);
    }

    println!();
    print_stats(&stats);

    println!();
    println!("{}", "Column Edges".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &doc.pages {
        match ColumnEdges::detect(page) {
            Some(edges) => {
                let [left, center, right] = edges.line_distribution(page);
                println!(
                    "{} {}: {} / {} / {}  ({} / {} / {} lines)",
                    "Page".bold(),
                    page.number,
                    edges.left,
                    edges.center,
                    edges.right,
                    left,
                    center,
                    right
                );
            }
            None => println!(
                "{} {}: {}",
                "Page".bold(),
                page.number,
                "no three-column layout".dimmed()
            ),
        }
    }

    Ok(())
}

fn print_stats(stats: &HocrStats) {
    eprintln!("{}", "Content Statistics".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!(
        "{}: {} (left {}, center {}, right {})",
        "Blocks".bold(),
        stats.block_count,
        stats.column_blocks[0],
        stats.column_blocks[1],
        stats.column_blocks[2]
    );
    eprintln!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    eprintln!("{}: {}", "Lines".bold(), stats.line_count);
    eprintln!("{}: {}", "Characters".bold(), stats.char_count);
    eprintln!(
        "{}: {} very low, {} low ({:.1}%)",
        "Flagged".bold(),
        stats.very_low_confidence,
        stats.low_confidence,
        stats.flagged_ratio() * 100.0
    );
}

fn cmd_version() {
    println!("{} {}", "unabbyy".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("ABBYY FineReader XML to hOCR conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unabbyy".dimmed());
    println!("License: MIT");
}

/// Number of pages a selection covers, when bounded.
fn selected_page_count(selection: &PageSelection) -> Option<u64> {
    match selection {
        PageSelection::All => None,
        PageSelection::Range(range) => Some(u64::from(range.end() - range.start()) + 1),
        PageSelection::Pages(pages) => Some(pages.len() as u64),
    }
}

/// Expand the first `%d` / `%0Nd` placeholder of `template` with `number`.
///
/// Templates without a placeholder get the number appended before the
/// extension.
fn page_file_name(template: &str, number: u32) -> String {
    if let Some(start) = template.find('%') {
        let rest = &template[start + 1..];
        if let Some(end) = rest.find('d') {
            let spec = &rest[..end];
            if spec.chars().all(|c| c.is_ascii_digit()) {
                let width: usize = spec.trim_start_matches('0').parse().unwrap_or(0);
                let formatted = if spec.starts_with('0') {
                    format!("{:0width$}", number, width = width)
                } else {
                    format!("{:width$}", number, width = width)
                };
                return format!("{}{}{}", &template[..start], formatted, &rest[end + 1..]);
            }
        }
    }

    match template.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, number, ext),
        None => format!("{}_{}", template, number),
    }
}
