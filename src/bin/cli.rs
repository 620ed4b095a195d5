//! trail-stitcher CLI
//!
//! Usage:
//!   trail-stitcher <input.json> [--output trail.json] [--config config.json]
//!
//! Reads an ArcGIS web-map document, stitches the eligible trail segments into
//! one ordered line, and writes it as GeoJSON.

use clap::Parser;
use log::{error, info, warn};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use trail_stitcher::{build_trail, to_geojson_string, GpsPoint, Termination, TrailConfig};

#[derive(Parser)]
#[command(name = "trail-stitcher")]
#[command(about = "Stitch unordered trail segments into a single GeoJSON line", long_about = None)]
struct Cli {
    /// Web-map JSON document containing the trail segments
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, default_value = "trail.json")]
    output: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of points in the output line
    #[arg(long)]
    target_points: Option<usize>,

    /// Nearest-endpoint tolerance in degrees
    #[arg(long)]
    tolerance: Option<f64>,

    /// Douglas-Peucker tolerance in degrees, applied before downsampling
    #[arg(long)]
    simplify: Option<f64>,

    /// Feature name written to the output
    #[arg(long)]
    name: Option<String>,

    /// Status attribute value a feature needs to be included
    #[arg(long)]
    status: Option<String>,

    /// Anchor longitude used to pick the starting segment
    #[arg(long, requires = "anchor_lat", allow_hyphen_values = true)]
    anchor_lon: Option<f64>,

    /// Anchor latitude used to pick the starting segment
    #[arg(long, requires = "anchor_lon", allow_hyphen_values = true)]
    anchor_lat: Option<f64>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config file if given, then apply flag overrides.
fn load_config(cli: &Cli) -> trail_stitcher::Result<TrailConfig> {
    let mut config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => TrailConfig::default(),
    };

    if let Some(target) = cli.target_points {
        config.target_points = target;
    }
    if let Some(tolerance) = cli.tolerance {
        config.chain.tolerance = tolerance;
    }
    if let Some(tolerance) = cli.simplify {
        config.simplification_tolerance = Some(tolerance);
    }
    if let Some(name) = &cli.name {
        config.name = name.clone();
    }
    if let Some(status) = &cli.status {
        config.source.eligible_status = status.clone();
    }
    if let (Some(lon), Some(lat)) = (cli.anchor_lon, cli.anchor_lat) {
        config.chain.anchor = GpsPoint::new(lat, lon);
    }

    Ok(config)
}

fn run(cli: &Cli) -> trail_stitcher::Result<()> {
    let config = load_config(cli)?;

    info!("Reading {}", cli.input.display());
    let document = fs::read_to_string(&cli.input)?;

    let build = build_trail(&document, &config)?;

    if let Some(source) = &build.source {
        info!(
            "Official route segments: {} (from {} features)",
            source.segments, source.eligible_features
        );
    }
    info!(
        "Chained segments: {} / {}",
        build.chain.used_segments, build.chain.total_segments
    );
    info!("Total points in chain: {}", build.chain.chain_points);
    if build.chain.termination != Termination::AllConsumed {
        warn!(
            "Trail is partial: {} segments unreachable ({:?})",
            build.chain.unused_segments, build.chain.termination
        );
    }

    let geojson = to_geojson_string(&build.points, &config.name)?;
    fs::write(&cli.output, geojson)?;
    info!("Wrote {} ({} points)", cli.output.display(), build.points.len());

    Ok(())
}
