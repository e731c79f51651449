//! sigscan - barcode signature scanner
//!
//! Scans document images for barcodes (replayed from recorded engine output)
//! and reports whether each barcode has a handwritten signature next to it.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sigscan::config;
use sigscan::export::{export_file_name, export_records, write_csv};
use sigscan::replay::ReplayEngine;
use sigscan::scan::{BatchOutcome, BatchScanner, FileKind, ScanInput, ScanResult};
use sigscan::vision::annotate;
use sigscan::RasterBuffer;

/// sigscan - detect signatures next to barcodes on scanned documents
#[derive(Parser, Debug)]
#[command(name = "sigscan")]
#[command(about = "Detect handwritten signatures next to barcodes on scanned documents")]
struct Args {
    /// Image files to scan (PDFs need an external page renderer)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Recorded barcode engine output (JSON keyed by file name)
    #[arg(short, long)]
    detections: PathBuf,

    /// Config file (TOML); defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the Barcode,Signature export here (a directory gets `<first file>_results.csv`)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write annotated copies of scanned images into this directory
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = config::load_or_default(args.config.as_deref())?;
    let engine = ReplayEngine::load(&args.detections)
        .with_context(|| format!("Failed to load detections: {:?}", args.detections))?;

    let mut scanner = BatchScanner::new(Box::new(engine), config.scan_options());
    let inputs: Vec<ScanInput> = args.inputs.iter().map(ScanInput::file).collect();

    // Ctrl-C stops the batch before the next file
    let cancel = scanner.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = scanner.scan_batch(inputs).await;
    if outcome == BatchOutcome::NothingToDo {
        println!("No files to scan");
        return Ok(());
    }
    if outcome.was_cancelled() {
        warn!(
            "Interrupted after {} of {} files",
            outcome.results().len(),
            args.inputs.len()
        );
    }
    let results = outcome.into_results();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_summary(&results);
    }

    if let Some(csv) = &args.csv {
        let path = if csv.is_dir() {
            csv.join(export_file_name(&results))
        } else {
            csv.clone()
        };
        let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        write_csv(&export_records(&results), BufWriter::new(file))?;
        info!("Exported results to {:?}", path);
    }

    if let Some(dir) = &args.annotate {
        std::fs::create_dir_all(dir)?;
        for (input, result) in args.inputs.iter().zip(&results) {
            if let Err(err) = write_annotation(input, result, dir, config.input.max_image_bytes) {
                warn!("Could not annotate {}: {:#}", result.file_name, err);
            }
        }
    }

    Ok(())
}

fn print_summary(results: &[ScanResult]) {
    for result in results {
        if let Some(error) = &result.error {
            println!("{}: error: {}", result.file_name, error);
            continue;
        }

        println!(
            "{}: {} barcodes, signature {}",
            result.file_name,
            result.symbols.len(),
            if result.signature { "detected" } else { "not detected" }
        );
        for symbol in &result.symbols {
            let page = symbol.page.map(|p| format!("p{} ", p)).unwrap_or_default();
            println!(
                "  {}{} ({}) signed={} confidence={:.1}%",
                page,
                symbol.text,
                symbol.format,
                if symbol.is_signed() { "yes" } else { "no" },
                symbol.signature_confidence.unwrap_or(0.0)
            );
        }
    }
}

fn write_annotation(input: &Path, result: &ScanResult, dir: &Path, max_bytes: u64) -> Result<()> {
    if !result.is_ok() || result.file_type != FileKind::Image {
        return Ok(());
    }

    let bytes = std::fs::read(input)?;
    let page = RasterBuffer::decode(&bytes, max_bytes)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    let out = dir.join(format!("{}_annotated.png", stem));

    annotate(&page, &result.symbols)
        .save(&out)
        .with_context(|| format!("Failed to write {:?}", out))?;
    info!("Wrote {:?}", out);
    Ok(())
}
