//! cdbexport - convert .cdb database files to CSV

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cdbexport::batch::{find_inputs, BatchRunner};
use cdbexport::config::{Config, OutputFormat};
use cdbexport::exporter::CommandExporter;
use cdbexport::flatten::{Flattener, Layout, Preset};
use cdbexport::output::SummaryWriter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Csv,
    Tsv,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Csv => OutputFormat::Csv,
            CliOutputFormat::Tsv => OutputFormat::Tsv,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLayout {
    /// Exporter tables (Table/Column/Cell)
    Columns,
    /// One element per record
    Records,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPreset {
    None,
    /// Cyclists joined with their team, plus age
    Cyclists,
}

impl From<CliPreset> for Preset {
    fn from(p: CliPreset) -> Self {
        match p {
            CliPreset::None => Preset::None,
            CliPreset::Cyclists => Preset::Cyclists,
        }
    }
}

/// Convert game database files (.cdb) to CSV using the external exporter
#[derive(Parser, Debug)]
#[command(name = "cdbexport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the files to convert
    #[arg(default_value = ".")]
    input_dir: PathBuf,

    /// Exporter executable (default: Exporter.exe in the input directory, else on PATH)
    #[arg(short, long)]
    exporter: Option<PathBuf>,

    /// Extension of the files to convert
    #[arg(long, default_value = "cdb")]
    extension: String,

    /// Directory for output files (default: the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory for intermediate XML files (default: system temp directory)
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: CliOutputFormat,

    /// How records are laid out in the exported XML
    #[arg(long, value_enum, default_value = "columns")]
    layout: CliLayout,

    /// For the columns layout: which table to extract (default: first table with rows)
    #[arg(long, conflicts_with = "record_path")]
    table: Option<String>,

    /// For the records layout: element path of the records below the root (e.g. Table/Row)
    #[arg(long)]
    record_path: Option<String>,

    /// Post-processing preset
    #[arg(long, value_enum, default_value = "none")]
    preset: CliPreset,

    /// Keep the intermediate XML files
    #[arg(long)]
    keep_xml: bool,

    /// Convert files in parallel
    #[arg(long)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1), // Some files failed
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "cdbexport=warn",
        1 => "cdbexport=info",
        _ => "cdbexport=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Returns whether every file converted
fn run(cli: Cli) -> Result<bool> {
    let layout = match cli.layout {
        CliLayout::Columns => Layout::Columns { table: cli.table },
        CliLayout::Records => Layout::Records {
            path: cli.record_path,
        },
    };

    let exporter = match cli.exporter {
        Some(path) => path,
        None => Config::default_exporter_for(&cli.input_dir),
    };
    // The exporter runs from its own directory, so relative paths must be resolved first
    let exporter = if exporter.is_file() {
        std::fs::canonicalize(&exporter)
            .with_context(|| format!("Failed to resolve exporter: {}", exporter.display()))?
    } else {
        exporter
    };

    let input_dir = std::fs::canonicalize(&cli.input_dir)
        .with_context(|| format!("Input directory not found: {}", cli.input_dir.display()))?;

    let mut config = Config::new(input_dir)
        .with_exporter(exporter)
        .with_extension(cli.extension)
        .with_output_format(cli.format.into())
        .with_layout(layout)
        .with_preset(cli.preset.into())
        .with_keep_xml(cli.keep_xml)
        .with_parallel(cli.parallel);
    if let Some(dir) = cli.output_dir {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        config = config.with_output_dir(dir);
    }
    if let Some(dir) = cli.work_dir {
        config = config.with_work_dir(dir);
    }
    tracing::debug!(?config, "configuration");

    let mut summary = SummaryWriter::stdout();

    let inputs = find_inputs(&config.input_dir, &config.extension).with_context(|| {
        format!("Failed to scan input directory: {}", config.input_dir.display())
    })?;
    if inputs.is_empty() {
        summary.write_none_found(&config.input_dir, &config.extension)?;
        return Ok(true);
    }
    summary.write_found(inputs.len(), &config.extension)?;

    let today = chrono::Local::now().date_naive();
    let flattener = Flattener::new(config.layout.clone(), config.preset, today);
    let exporter = CommandExporter::new(config.exporter.clone());
    let runner = BatchRunner::new(exporter, flattener, config);

    let report = runner
        .run(&inputs, |outcome| {
            if let Err(e) = summary.write_outcome(outcome) {
                tracing::warn!(error = %e, "failed to write progress");
            }
        })
        .context("Failed to prepare the work directory")?;

    summary.write_complete(&report)?;

    Ok(!report.has_failures())
}
