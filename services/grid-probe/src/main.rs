//! Grid probe.
//!
//! Loads ESRI ASCII grids (one file for a scalar field, two for the u and v
//! components of a vector field) and prints query results as JSON:
//! - point values, nearest and bilinear
//! - value range and extent
//! - cell listings
//! - derived scalar fields (magnitude, directions) of vector fields

mod commands;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use raster_grid::{FieldKind, GridConfig, InterpolationMethod};

#[derive(Parser, Debug)]
#[command(name = "grid-probe")]
#[command(about = "Query raster grids stored as ESRI ASCII files")]
struct Args {
    /// ASCII grid holding the scalar field, or the u component
    #[arg(long, short = 'g', env = "GRID_PROBE_GRID")]
    grid: PathBuf,

    /// ASCII grid holding the v component (turns the input into a vector field)
    #[arg(long)]
    v_grid: Option<PathBuf>,

    /// Factor applied to every value read from the files
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Override GRID_INTERPOLATION (nearest or bilinear)
    #[arg(long)]
    interpolation: Option<String>,

    /// Log level
    #[arg(long, env = "GRID_PROBE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Nearest, bilinear and configured values at a point
    Value {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },
    /// Dimensions, extent and value range
    Info,
    /// List cell centres and values
    Cells {
        /// Take every n-th row and column
        #[arg(long, default_value = "1")]
        stride: usize,
    },
    /// Derive a scalar field from a vector field (magnitude, directionTo, directionFrom)
    Field {
        #[arg(long, default_value = "magnitude")]
        kind: FieldKind,
        /// Optional point to evaluate the derived field at
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
    },
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays valid JSON
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = GridConfig::from_env();
    if let Some(method) = &args.interpolation {
        config.interpolation = InterpolationMethod::from_str(method);
    }
    config
        .validate()
        .map_err(|e| anyhow!("invalid grid configuration: {}", e))?;

    info!(
        grid = %args.grid.display(),
        v_grid = ?args.v_grid,
        interpolation = %config.interpolation,
        "Loading field"
    );
    let field = commands::Field::load(&args.grid, args.v_grid.as_deref(), args.scale, config)?;

    let output = match args.command {
        Command::Value { lon, lat } => commands::value(&field, lon, lat),
        Command::Info => commands::info(&field),
        Command::Cells { stride } => commands::cells(&field, stride)?,
        Command::Field { kind, lon, lat } => {
            commands::derived_field(&field, kind, lon.zip(lat))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
