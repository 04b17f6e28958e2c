// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docscan — local document scanner.
//
// Entry point. Initialises logging, loads the backend services, and runs one
// command against the document list.

mod services;
mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docscan_core::error::Result;
use docscan_core::human_errors::humanize_error;
use docscan_core::{DocId, FilterMode};

use services::app_services::AppServices;

/// Capture photos of paper documents, give them a scanned look, and pull out their text.
#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory (defaults to $DOCSCAN_DATA_DIR or ~/.local/share/docscan)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a photo as a new document
    Import {
        path: PathBuf,
        /// Filter to apply right away
        #[arg(short, long)]
        filter: Option<FilterMode>,
    },
    /// List documents, newest first
    List,
    /// Show one document's details and extracted text
    Show { id: DocId },
    /// Apply a filter: original, lighten, magic, grayscale, bw
    Filter { id: DocId, mode: FilterMode },
    /// Extract text from the processed image
    Ocr { id: DocId },
    /// Delete a document
    Delete { id: DocId },
    /// Write the processed image to a file
    Export { id: DocId, output: PathBuf },
    /// Show or change settings
    Config {
        #[arg(long)]
        jpeg_quality: Option<u8>,
        #[arg(long)]
        default_filter: Option<FilterMode>,
        #[arg(long)]
        ocr_model_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "command failed");
        let human = humanize_error(&err);
        eprintln!("{}\n{}", human.message, human.suggestion);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut svc = AppServices::init(cli.data_dir)?;

    match cli.command {
        Command::Import { path, filter } => {
            let doc = svc.import_file(&path, filter)?;
            println!("{}  {}  [{}]", doc.id, doc.title, doc.filter.label());
        }
        Command::List => {
            if svc.documents().is_empty() {
                println!("No documents yet. Import a photo to start scanning.");
            }
            for doc in svc.documents() {
                let created = doc.created_at.with_timezone(&chrono::Local);
                let text_marker = if doc.extracted_text.is_some() { " (text)" } else { "" };
                println!(
                    "{}  {}  {:<8} {}{}",
                    doc.id,
                    created.format("%Y-%m-%d"),
                    doc.filter.label(),
                    doc.title,
                    text_marker
                );
            }
            println!("{} documents", svc.documents().len());
        }
        Command::Show { id } => {
            let doc = svc.document(&id)?;
            println!("id:       {}", doc.id);
            println!("title:    {}", doc.title);
            println!("created:  {}", doc.created_at.to_rfc3339());
            println!("filter:   {}", doc.filter.label());
            match &doc.extracted_text {
                Some(text) => println!("\n{text}"),
                None => println!("\nNo text extracted yet. Run `docscan ocr {}`.", doc.id),
            }
        }
        Command::Filter { id, mode } => {
            let doc = svc.apply_filter(&id, mode).await?;
            println!("{}  [{}]", doc.id, doc.filter.label());
        }
        Command::Ocr { id } => {
            let text = extract(&mut svc, &id)?;
            println!("{text}");
        }
        Command::Delete { id } => {
            let doc = svc.delete(&id)?;
            println!("Deleted {}", doc.title);
        }
        Command::Export { id, output } => {
            svc.export(&id, &output)?;
            println!("Wrote {}", output.display());
        }
        Command::Config {
            jpeg_quality,
            default_filter,
            ocr_model_dir,
        } => {
            let mut config = svc.config().clone();
            let changed = jpeg_quality.is_some() || default_filter.is_some() || ocr_model_dir.is_some();
            if let Some(quality) = jpeg_quality {
                config.jpeg_quality = quality;
            }
            if let Some(mode) = default_filter {
                config.default_filter = mode;
            }
            if let Some(dir) = ocr_model_dir {
                config.ocr_model_dir = Some(dir);
            }
            if changed {
                svc.save_config(config)?;
            }
            if let Some(dir) = svc.data_dir() {
                println!("# {}", dir.display());
            }
            println!("{}", serde_json::to_string_pretty(svc.config())?);
        }
    }
    Ok(())
}

#[cfg(feature = "ocr")]
fn extract(svc: &mut AppServices, id: &DocId) -> Result<String> {
    use docscan_document::scan::ocr::{OcrConfig, OcrEngine};

    let engine = OcrEngine::new(&OcrConfig::from_app_config(svc.config()))?;
    svc.extract_text(id, &engine)
}

#[cfg(not(feature = "ocr"))]
fn extract(svc: &mut AppServices, id: &DocId) -> Result<String> {
    // Cached text is still available without a recogniser.
    match &svc.document(id)?.extracted_text {
        Some(text) => Ok(text.clone()),
        None => Err(docscan_core::DocscanError::PlatformUnavailable),
    }
}
