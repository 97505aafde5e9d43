//! Command-line front end for structured PDF extraction.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfstruct::BatchProcessor;

/// Extract structured content (headings, tables, figures, paragraphs)
/// from PDF documents.
#[derive(Parser, Debug)]
#[command(name = "pdfstruct", version, about)]
struct Cli {
    /// PDF files to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for structured JSON records
    #[arg(long, default_value = "outputs/structured", env = "PDFSTRUCT_STRUCTURED_DIR")]
    structured_dir: PathBuf,

    /// Directory for extracted figure images
    #[arg(long, default_value = "outputs/figures", env = "PDFSTRUCT_FIGURES_DIR")]
    figures_dir: PathBuf,

    /// Also write a plain-text sidecar per document
    #[arg(long)]
    text: bool,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let processor = BatchProcessor::new(&cli.structured_dir, &cli.figures_dir)
        .with_plain_text(cli.text);

    let progress = ProgressBar::new(cli.inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let summary = processor.process_with_progress(&cli.inputs, |path| {
        progress.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
        progress.inc(1);
    });
    progress.finish_and_clear();

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("{} {}", "error:".red().bold(), err),
        }
    } else {
        for file in &summary.processed {
            println!(
                "{} {} -> {} ({} pages, {} elements, {} ms)",
                "ok".green().bold(),
                file.source.display(),
                file.structured_path.display(),
                file.pages,
                file.elements,
                file.duration_ms
            );
        }
        for file in &summary.failed {
            println!(
                "{} {}: {}",
                "failed".red().bold(),
                file.source.display(),
                file.error
            );
        }
        println!(
            "{} file(s), {} page(s), {} ms",
            summary.processed.len(),
            summary.total_pages,
            summary.duration_ms
        );
    }

    if summary.is_all_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
