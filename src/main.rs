use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use marinascan::api::HttpServices;
use marinascan::config::{FileConfig, LoadedConfig, PipelineConfig};

/// Collect marinas within a city boundary from OpenStreetMap and write them to CSV
///
/// Examples:
///   # Saint Petersburg, coordinates and capacities only
///   marinascan
///
///   # Helsinki with nearby amenity counts within 800 m
///   marinascan -c "Helsinki" --enrich -r 800 -o helsinki.csv
///
///   # Just the number of marinas
///   marinascan -c "Split" --count-only -o split_count.csv
#[derive(Parser, Debug)]
#[command(name = "marinascan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches marinascan.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// City name to resolve into a boundary
    #[arg(short = 'c', long)]
    city: Option<String>,

    /// Output CSV path (overwritten)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Amenity search radius in meters
    #[arg(short = 'r', long)]
    radius: Option<f64>,

    /// Count nearby groceries, cultural attractions and hotels per marina
    #[arg(long)]
    enrich: bool,

    /// Only write the number of marinas found
    #[arg(long, conflicts_with = "enrich")]
    count_only: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "marinascan=debug,info"
    } else {
        "marinascan=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    // Both explicit and discovered files are read before the logger so that
    // their `verbose` setting applies
    let loaded = match args.config {
        Some(ref path) => LoadedConfig {
            config: Some(FileConfig::from_path(path)?),
            path: Some(path.clone()),
            skipped: Vec::new(),
        },
        None => FileConfig::load(),
    };
    init_logger(args.verbose || loaded.verbose());
    loaded.log();

    let mut config = loaded
        .config
        .map(PipelineConfig::from_file)
        .unwrap_or_default();
    if let Some(city) = args.city {
        config.place = city;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(radius) = args.radius {
        config.amenity.radius_m = radius;
    }
    config.enrich |= args.enrich;

    tracing::debug!("Configuration: {:?}", config);

    let http = HttpServices::from_config(&config).context("Failed to create HTTP clients")?;

    if args.count_only {
        let spinner = create_spinner(&format!("Counting marinas in {}...", config.place));
        let found = marinascan::count(&config, http.services())
            .with_context(|| format!("Failed to count marinas in {}", config.place))?;
        spinner.finish_with_message(format!(
            "Found {} marinas in {} [{:.1}s]",
            found,
            config.place,
            total_start.elapsed().as_secs_f32()
        ));
    } else {
        let bar = create_spinner(&format!("Querying marinas in {}...", config.place));
        let summary = marinascan::run(&config, http.services(), |done, total| {
            if done == 1 {
                bar.set_style(progress_style());
                bar.set_length(total as u64);
                bar.set_message(if config.enrich {
                    "Probing amenities"
                } else {
                    "Assembling records"
                });
            }
            bar.set_position(done as u64);
        })
        .with_context(|| format!("Failed to collect marinas for {}", config.place))?;
        bar.finish_with_message(format!(
            "Processed {} marinas [{:.1}s]",
            summary.rows,
            total_start.elapsed().as_secs_f32()
        ));
    }

    println!("Output: {}", config.output.display());
    Ok(())
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
