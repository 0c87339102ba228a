use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use posture_trainer::acquisition::{AcquisitionSession, OperatorConsole, TerminalConsole};
use posture_trainer::config::AppConfig;
use posture_trainer::dataset::load_or_create;
use posture_trainer::error::{log_dataset_error, DatasetError, ErrorCode};
use posture_trainer::export::{run_export, ExportReport};
use posture_trainer::protocol::FrameReader;
use serde::Serialize;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "posture_cli",
    about = "Collect labeled posture samples and export the classifier training table"
)]
struct Cli {
    /// JSON configuration file (defaults to assets/posture_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read captures from the device stream and append labeled rows
    Acquire {
        /// Device line stream: serial device node or recorded log, `-` for stdin
        #[arg(long)]
        device: PathBuf,
        /// Dataset CSV file (overrides config)
        #[arg(long)]
        dataset: Option<PathBuf>,
        /// Read labels from this file instead of stdin
        #[arg(long)]
        labels: Option<PathBuf>,
    },
    /// Normalize complete training rows and write the lookup table
    Export {
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the export report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print row and label counts of a dataset
    Summary {
        #[arg(long)]
        dataset: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::Acquire {
            device,
            dataset,
            labels,
        } => {
            let dataset = dataset.unwrap_or_else(|| config.dataset.path.clone());
            run_acquire(&config, &device, &dataset, labels.as_deref())
        }
        Commands::Export {
            dataset,
            output,
            json,
        } => {
            let dataset = dataset.unwrap_or_else(|| config.dataset.path.clone());
            let mut export = config.export.clone();
            if let Some(output) = output {
                export.output_path = output;
            }
            match run_export(&dataset, &export) {
                Ok(report) => {
                    emit_export_report(&report, json)?;
                    Ok(ExitCode::from(0))
                }
                Err(err @ DatasetError::Schema { .. }) => {
                    log_dataset_error(&err, "export");
                    eprintln!("[ERROR] {}", err.message());
                    Ok(ExitCode::from(2))
                }
                Err(err) => {
                    Err(err).with_context(|| format!("exporting {}", dataset.display()))
                }
            }
        }
        Commands::Summary { dataset, json } => {
            let dataset = dataset.unwrap_or_else(|| config.dataset.path.clone());
            run_summary(&dataset, json)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn open_lines(path: &Path) -> Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn run_acquire(
    config: &AppConfig,
    device: &Path,
    dataset_path: &Path,
    labels: Option<&Path>,
) -> Result<ExitCode> {
    let device_is_stdin = device == Path::new("-");
    let label_source: Box<dyn BufRead> = match labels {
        Some(path) => open_lines(path)?,
        None if device_is_stdin => {
            bail!("--device - reads the device from stdin; pass --labels for operator input")
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let dataset = load_or_create(dataset_path)
        .with_context(|| format!("loading dataset {}", dataset_path.display()))?;

    let mut reader = FrameReader::new(open_lines(device)?);
    let mut console = TerminalConsole::new(label_source, io::stdout());
    let (label_min, label_max) = config.label_range();
    if config.acquisition.show_instructions {
        console.show_instructions(label_min, label_max);
    }

    let mut session = AcquisitionSession::new(dataset, dataset_path, label_min, label_max);
    let summary = session
        .run(&mut reader, &mut console)
        .context("acquisition session aborted")?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    if summary.unsaved_rows {
        eprintln!(
            "[ERROR] Some rows could not be saved to {}; they were lost when the session ended.",
            dataset_path.display()
        );
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::from(0))
}

fn emit_export_report(report: &ExportReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("[OK] Wrote: {}", report.output_path.display());
    println!(
        "     Samples: {}, Features: {}",
        report.samples, report.features
    );
    println!("     Feature order used: {:?}", report.feature_order);
    Ok(())
}

#[derive(Serialize)]
struct DatasetSummaryPayload<'a> {
    dataset: &'a Path,
    rows: usize,
    complete_rows: usize,
    label_counts: BTreeMap<i64, usize>,
}

fn run_summary(dataset_path: &Path, json: bool) -> Result<ExitCode> {
    let dataset = load_or_create(dataset_path)
        .with_context(|| format!("loading dataset {}", dataset_path.display()))?;
    let payload = DatasetSummaryPayload {
        dataset: dataset_path,
        rows: dataset.len(),
        complete_rows: dataset.complete_rows(),
        label_counts: dataset.label_counts(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "{}: {} rows ({} complete)",
            dataset_path.display(),
            payload.rows,
            payload.complete_rows
        );
        for (label, count) in &payload.label_counts {
            println!("  label {}: {}", label, count);
        }
    }
    Ok(ExitCode::from(0))
}
