//! rebarex CLI - rebar schedule extraction from engineering PDFs

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rebarex::{
    Association, CircleCodeSet, ExportRow, ExtractOptions, ExtractionResult, Extractor,
    MaterialRecord, TextSource,
};

#[derive(Parser)]
#[command(name = "rebarex")]
#[command(version)]
#[command(about = "Extract rebar material and circle code schedules from engineering PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// OCR rendering resolution in DPI
    #[arg(long, global = true, default_value = "300")]
    dpi: u32,

    /// OCR language code (tesseract -l)
    #[arg(long, global = true, default_value = "eng")]
    lang: String,

    /// Proximity lookahead window, in segments
    #[arg(long, global = true, default_value = "2")]
    lookahead: usize,

    /// Per-page OCR timeout in seconds
    #[arg(long, global = true, default_value = "120")]
    ocr_timeout: u64,

    /// Disable parallel OCR
    #[arg(long, global = true)]
    sequential: bool,

    /// Collapse identical pairs across the whole document
    #[arg(long, global = true)]
    dedup_document: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: Format,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract materials for specific circle codes
    Codes {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Comma-separated circle codes (e.g. "P1,T3")
        #[arg(short, long, value_name = "CODES")]
        codes: String,
    },

    /// Extract every circle code and its materials
    #[command(alias = "all")]
    AllCodes {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract every material, orphans included
    Materials {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show extraction diagnostics for a document
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable listing
    Text,
    /// JSON rows
    Json,
    /// Tab-separated rows
    Tsv,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli);

    match &cli.command {
        Commands::Codes { input, codes } => {
            let requested = CircleCodeSet::parse(codes);
            if requested.is_empty() {
                return Err("no circle codes given".into());
            }
            let result = extract(input, options)?;
            let rows = association_rows(result.filter_by_circle_codes(&requested));
            emit(cli, &result, &rows)?;
        }
        Commands::AllCodes { input } => {
            let result = extract(input, options)?;
            let rows = association_rows(result.all_circle_codes());
            emit(cli, &result, &rows)?;
        }
        Commands::Materials { input } => {
            let result = extract(input, options)?;
            let rows = material_rows(result.all_materials());
            emit(cli, &result, &rows)?;
        }
        Commands::Info { input } => {
            let result = extract(input, options)?;
            print_info(&result);
        }
    }

    Ok(())
}

fn build_options(cli: &Cli) -> ExtractOptions {
    let mut options = ExtractOptions::new()
        .with_dpi(cli.dpi)
        .with_lang(cli.lang.clone())
        .with_lookahead(cli.lookahead)
        .with_ocr_timeout(Duration::from_secs(cli.ocr_timeout));
    if cli.sequential {
        options = options.sequential();
    }
    if cli.dedup_document {
        options = options.document_dedup();
    }
    options
}

fn extract(input: &PathBuf, options: ExtractOptions) -> rebarex::Result<ExtractionResult> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("Extracting {}", input.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let result = Extractor::with_options(options).extract(input);
    spinner.finish_and_clear();

    if let Ok(ref extraction) = result {
        log::info!(
            "processed {} pages in {:.1?}",
            extraction.pages.len(),
            started.elapsed()
        );
    }
    result
}

fn association_rows(associations: Vec<&Association>) -> Vec<ExportRow> {
    associations
        .iter()
        .flat_map(|assoc| ExportRow::from_association(assoc))
        .collect()
}

fn material_rows(records: &[MaterialRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from_record).collect()
}

fn emit(
    cli: &Cli,
    result: &ExtractionResult,
    rows: &[ExportRow],
) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = match cli.format {
        Format::Text => render_text(result, rows),
        Format::Json => serde_json::to_string_pretty(rows)? + "\n",
        Format::Tsv => render_tsv(rows),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)?;
            eprintln!(
                "{} {} rows written to {}",
                "done:".green().bold(),
                rows.len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    if cli.format == Format::Text {
        print_warnings(result);
    }
    Ok(())
}

fn render_text(result: &ExtractionResult, rows: &[ExportRow]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("no matches found\n");
        return out;
    }

    for row in rows {
        let circle = row.circle.as_deref().unwrap_or("-");
        let material = row.material.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{:<8} {:<28} page {}\n",
            circle.bold(),
            material,
            row.page
        ));
    }
    out.push_str(&format!("\n{} rows", rows.len()));
    if result.stats.rejected_tokens > 0 {
        out.push_str(&format!(
            ", {} unparsed tokens (retry with a higher --dpi?)",
            result.stats.rejected_tokens
        ));
    }
    out.push('\n');
    out
}

fn render_tsv(rows: &[ExportRow]) -> String {
    let mut out = String::from("page\tcircle\tmaterial\tquantity\tdiameters\tlength_m\n");
    for row in rows {
        let diameters = row
            .diameters
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("/");
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            row.page,
            row.circle.as_deref().unwrap_or(""),
            row.material.as_deref().unwrap_or(""),
            row.quantity.map(|q| q.to_string()).unwrap_or_default(),
            diameters,
            row.length_m.map(|l| l.to_string()).unwrap_or_default(),
        ));
    }
    out
}

fn print_info(result: &ExtractionResult) {
    println!("{}", "Pages".bold());
    for page in &result.pages {
        let source = match page.source {
            TextSource::Native => "native".green(),
            TextSource::Ocr => "ocr".yellow(),
        };
        println!("  {:>4}  {}", page.number, source);
    }

    println!("\n{}", "Summary".bold());
    println!("  associations:    {}", result.associations.len());
    println!("  materials:       {}", result.materials.len());
    println!("  orphans:         {}", result.orphans().count());
    println!("  native pages:    {}", result.stats.native_pages);
    println!("  ocr pages:       {}", result.stats.ocr_pages);
    println!("  unparsed tokens: {}", result.stats.rejected_tokens);

    let counts = result.count_by_circle();
    if !counts.is_empty() {
        println!("\n{}", "Materials per circle code".bold());
        for (code, count) in counts {
            println!("  {:<8} {}", code.as_str(), count);
        }
    }

    print_warnings(result);
}

fn print_warnings(result: &ExtractionResult) {
    if result.warnings.is_empty() {
        return;
    }
    eprintln!("\n{}", "Warnings".yellow().bold());
    for warning in &result.warnings {
        eprintln!("  page {}: {}", warning.page, warning.reason);
    }
}
