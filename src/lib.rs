//! Brickmark: fiducial marker reconciliation and crop derivation.
//!
//! Brickmark is the deterministic layer between a part-identification
//! rig's detectors and its classifiers. Given one photograph's piece boxes
//! and fiducial markers it decides which markers are the rig's corner
//! blocks, which two spell out the color being scanned, and which region of
//! the photograph the classifiers should look at.
//!
//! # Modules
//!
//! - [`geom`]: regions, points and the geometry they support
//! - [`marker`]: fiducial observations and per-photograph reconciliation
//! - [`color`]: the two-symbol color codec and color catalogues
//! - [`crop`]: piece-driven and marker-driven crop derivation
//! - [`capture`]: the capture file format
//! - [`collab`]: traits for the external detectors, classifiers and raster
//!   backend, and the predictor that composes them
//! - [`render`]: label geometry for annotated output images
//! - [`config`]: YAML configuration
//! - [`error`]: error types

pub mod capture;
pub mod collab;
pub mod color;
pub mod config;
pub mod crop;
pub mod error;
pub mod geom;
pub mod marker;
pub mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, warn};
use serde::Serialize;

pub use error::BrickmarkError;

use color::{ColorCatalogue, ColorId, ColorReport, CsvColorCatalogue};
use config::Config;
use crop::{CropPlan, CropStrategy, PieceReport};
use geom::Region;
use marker::{MarkerId, MarkerReport};

/// The brickmark CLI application.
#[derive(Parser)]
#[command(name = "brickmark")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace).
    /// RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML config file.
    #[arg(long, global = true, env = "BRICKMARK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Derive the working crop for a capture file.
    Crop(CropArgs),

    /// Check the markers of a capture file.
    Markers(MarkersArgs),

    /// Encode or decode color symbols.
    #[command(subcommand)]
    Color(ColorCommands),

    /// Derive crops for every capture file under a directory.
    Batch(BatchArgs),
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the crop subcommand.
#[derive(clap::Args)]
struct CropArgs {
    /// Capture file.
    input: PathBuf,

    /// Crop strategy.
    #[arg(long, value_enum, default_value_t = CropStrategy::Auto)]
    strategy: CropStrategy,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Arguments for the markers subcommand.
#[derive(clap::Args)]
struct MarkersArgs {
    /// Capture file.
    input: PathBuf,

    /// Report on markers as detected, without merging duplicate corners.
    #[arg(long)]
    raw: bool,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum ColorCommands {
    /// Decode the two symbols of a color card.
    Decode(DecodeArgs),

    /// Print the two symbols for a color id.
    Encode(EncodeArgs),
}

#[derive(clap::Args)]
struct DecodeArgs {
    /// First symbol.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=90))]
    a: u8,

    /// Second symbol.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=90))]
    b: u8,

    /// Colors CSV used to name the decoded color.
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(clap::Args)]
struct EncodeArgs {
    /// Color id.
    #[arg(value_parser = clap::value_parser!(u32).range(0..=2049))]
    id: u32,
}

#[derive(clap::Args)]
struct BatchArgs {
    /// Directory searched recursively for `*.json` capture files.
    dir: PathBuf,

    /// Crop strategy.
    #[arg(long, value_enum, default_value_t = CropStrategy::Auto)]
    strategy: CropStrategy,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

/// Run the brickmark CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BrickmarkError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    debug!("using {:?}", config);

    match cli.command {
        Some(Commands::Crop(args)) => run_crop(args, &config),
        Some(Commands::Markers(args)) => run_markers(args, &config),
        Some(Commands::Color(ColorCommands::Decode(args))) => run_color_decode(args),
        Some(Commands::Color(ColorCommands::Encode(args))) => run_color_encode(args),
        Some(Commands::Batch(args)) => run_batch(args, &config),
        None => {
            println!("brickmark {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Fiducial marker reconciliation and crop derivation.");
            println!();
            println!("Run 'brickmark --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // A second init (e.g. from tests driving `run` twice) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Marker report plus the validity flag, as exposed in JSON output.
#[derive(Serialize)]
struct MarkerOutput<'a> {
    valid: bool,
    #[serde(flatten)]
    report: &'a MarkerReport,
}

#[derive(Serialize)]
struct CropOutput<'a> {
    #[serde(flatten)]
    plan: &'a CropPlan,
    markers: MarkerOutput<'a>,
    pieces: Vec<PieceReport>,
    classification_crop: Option<Region>,
}

/// Execute the crop subcommand.
fn run_crop(args: CropArgs, config: &Config) -> Result<(), BrickmarkError> {
    let capture = capture::read_capture_json(&args.input)?;
    let plan = capture.derive_crop(&config.crop, args.strategy)?;

    let merged = capture
        .markers
        .combine_nearby_corner_markers(capture.frame.width * config.crop.corner_merge);
    let report = merged.report();
    let pieces = capture.piece_regions();
    let piece_reports = crop::piece_reports(&pieces, capture.frame);
    let classification_crop = crop::classification_crop(&pieces, capture.frame);

    match args.output {
        OutputFormat::Json => {
            let output = CropOutput {
                plan: &plan,
                markers: MarkerOutput {
                    valid: merged.valid(),
                    report: &report,
                },
                pieces: piece_reports,
                classification_crop,
            };
            print_json(&output)?;
        }
        OutputFormat::Text => {
            let (x, y, w, h) = plan.region.to_xywh();
            println!("Strategy: {}", plan.strategy);
            println!("Region: x={x:.1} y={y:.1} w={w:.1} h={h:.1}");
            println!("Fingerprint: {}", plan.fingerprint);
            let cut_off = piece_reports.iter().filter(|p| !p.valid).count();
            println!(
                "Pieces: {} ({} touching the frame)",
                piece_reports.len(),
                cut_off
            );
            print!("{}", report);
        }
    }
    Ok(())
}

/// Execute the markers subcommand.
fn run_markers(args: MarkersArgs, config: &Config) -> Result<(), BrickmarkError> {
    let capture = capture::read_capture_json(&args.input)?;
    let markers = if args.raw {
        capture.markers
    } else {
        capture
            .markers
            .combine_nearby_corner_markers(capture.frame.width * config.crop.corner_merge)
    };
    let report = markers.report();

    match args.output {
        OutputFormat::Json => print_json(&MarkerOutput {
            valid: markers.valid(),
            report: &report,
        })?,
        OutputFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(BrickmarkError::MarkersRejected {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the color decode subcommand.
fn run_color_decode(args: DecodeArgs) -> Result<(), BrickmarkError> {
    let id = ColorId::from_symbols(MarkerId(args.a), MarkerId(args.b));

    let report = match &args.catalogue {
        Some(path) => {
            let catalogue = CsvColorCatalogue::read_csv(path)?;
            let color = catalogue
                .color(id)
                .ok_or(BrickmarkError::UnknownColor(id))?;
            Some(ColorReport::new(color, 1.0))
        }
        None => None,
    };

    match (args.output, report) {
        (OutputFormat::Json, Some(report)) => print_json(&report)?,
        (OutputFormat::Json, None) => print_json(&serde_json::json!({ "id": id }))?,
        (OutputFormat::Text, Some(report)) => {
            let suffix = if report.transparent { " (transparent)" } else { "" };
            println!("{} {} {}{}", report.id, report.name, report.hex, suffix)
        }
        (OutputFormat::Text, None) => println!("{}", id),
    }
    Ok(())
}

/// Execute the color encode subcommand.
fn run_color_encode(args: EncodeArgs) -> Result<(), BrickmarkError> {
    let (a, b) = color::encode(ColorId(args.id));
    println!("{} {}", a, b);
    Ok(())
}

#[derive(Serialize)]
struct BatchEntry {
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<CropPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the batch subcommand.
fn run_batch(args: BatchArgs, config: &Config) -> Result<(), BrickmarkError> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(&args.dir).sort_by_file_name() {
        let entry = entry.map_err(|e| BrickmarkError::Io(e.into()))?;
        if entry.file_type().is_file() && is_json(entry.path()) {
            entries.push(crop_one(entry.path(), config, args.strategy));
        }
    }

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    match args.output {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Text => {
            for entry in &entries {
                match (&entry.plan, &entry.error) {
                    (Some(plan), _) => {
                        let (x, y, w, h) = plan.region.to_xywh();
                        println!(
                            "{}\t{}\t{x:.1} {y:.1} {w:.1} {h:.1}\t{}",
                            entry.path.display(),
                            plan.strategy,
                            plan.fingerprint
                        );
                    }
                    (None, Some(error)) => {
                        println!("{}\terror: {}", entry.path.display(), error)
                    }
                    (None, None) => {}
                }
            }
        }
    }

    if failed > 0 {
        return Err(BrickmarkError::BatchFailed {
            failed,
            total: entries.len(),
        });
    }
    Ok(())
}

fn crop_one(path: &Path, config: &Config, strategy: CropStrategy) -> BatchEntry {
    let result = capture::read_capture_json(path)
        .and_then(|capture| capture.derive_crop(&config.crop, strategy));
    match result {
        Ok(plan) => BatchEntry {
            path: path.to_path_buf(),
            plan: Some(plan),
            error: None,
        },
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            BatchEntry {
                path: path.to_path_buf(),
                plan: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), BrickmarkError> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{}", json);
    Ok(())
}
