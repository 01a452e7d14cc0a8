mod config;
mod ephemeris;
mod predict;
mod report;
mod tle;
mod web;

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::future::Future;
use std::process::ExitCode;

use crate::config::Config;
use crate::ephemeris::Sgp4Provider;
use crate::predict::{predict_passes, GeometryProvider};
use crate::tle::{TleEntry, TleError};

#[derive(Parser)]
#[command(name = "passcast")]
#[command(about = "ISS pass prediction with visibility classification")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "passcast.yaml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the next passes over the station
    Passes {
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Minimum peak elevation in degrees
        #[arg(short, long)]
        min_elevation: Option<f64>,
        /// Search start (RFC3339), now when omitted
        #[arg(short, long, value_parser = parse_datetime)]
        start: Option<DateTime<Utc>>,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Print times in UTC instead of local time
        #[arg(long)]
        utc: bool,
    },
    /// Satellite and Sun look angles at one instant
    Position {
        #[arg(long, value_parser = parse_datetime)]
        at: Option<DateTime<Utc>>,
    },
    /// Download the configured TLE
    Fetch,
    /// Check the configuration and the TLE file
    Validate,
    /// Start the web API
    Serve,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    List,
    Json,
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC3339 time '{}': {}", s, e))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::from_file(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config {}: {}", cli.config, e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Passes {
            count,
            min_elevation,
            start,
            format,
            utc,
        } => passes(&config, count, min_elevation, start, format, utc),
        Commands::Position { at } => position(&config, at),
        Commands::Fetch => fetch(&config),
        Commands::Validate => validate(&config),
        Commands::Serve => serve(config),
    }
}

fn block_on<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn download(config: &Config) -> Result<TleEntry, String> {
    let url = config
        .tle
        .url
        .as_deref()
        .ok_or_else(|| "no TLE url configured".to_string())?;
    block_on(tle::fetch(url, &config.tle.satellite, &config.tle.file))
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

/// Load the configured TLE, downloading it first when the file is missing
/// and a source is configured.
fn load_tle(config: &Config) -> Result<TleEntry, String> {
    if !config.tle.file.exists() && config.tle.url.is_some() {
        log::warn!(
            "{} not found, downloading {}",
            config.tle.file.display(),
            config.tle.satellite
        );
        return download(config);
    }
    match tle::load_file(&config.tle.file, Some(&config.tle.satellite)) {
        Ok(entry) => Ok(entry),
        Err(e @ TleError::SatelliteNotFound { .. }) => Err(e.to_string()),
        Err(e) => Err(format!("{} ({})", e, config.tle.file.display())),
    }
}

fn provider(config: &Config) -> Result<Sgp4Provider, String> {
    let observer = config.observer().map_err(|e| e.to_string())?;
    let entry = load_tle(config)?;
    log::info!(
        "Using {} (NORAD {}), epoch {}",
        entry.info.name,
        entry.info.norad_id,
        entry.info.epoch
    );
    Ok(Sgp4Provider::new(entry, observer).with_validity(config.tle.validity))
}

fn passes(
    config: &Config,
    count: Option<usize>,
    min_elevation: Option<f64>,
    start: Option<DateTime<Utc>>,
    format: Format,
    utc: bool,
) -> ExitCode {
    let search = match config.search_config(count, min_elevation) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let provider = match provider(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = start.unwrap_or_else(Utc::now);
    let passes = match predict_passes(&provider, start, search) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Prediction failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        Format::Json => match serde_json::to_string_pretty(&passes) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization failed: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Format::Table | Format::List => {
            println!(
                "{} over {} ({:.4}, {:.4})",
                provider.info().name,
                config.station_name(),
                provider.observer().latitude_deg(),
                provider.observer().longitude_deg()
            );
            println!();
            let rendered = match (format, utc) {
                (Format::List, true) => report::render_list(&passes, &Utc),
                (Format::List, false) => report::render_list(&passes, &Local),
                (_, true) => report::render_table(&passes, &Utc),
                (_, false) => report::render_table(&passes, &Local),
            };
            print!("{}", rendered);
        }
    }
    ExitCode::SUCCESS
}

fn position(config: &Config, at: Option<DateTime<Utc>>) -> ExitCode {
    let provider = match provider(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let at = at.unwrap_or_else(Utc::now);
    let sample = match provider.position_at(at) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Propagation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let sun = provider.sun_position_at(at);

    println!("{} at {}", provider.info().name, at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  azimuth {:.1}° ({}), elevation {:.1}°, range {:.0} km",
        sample.azimuth_deg,
        report::azimuth_to_cardinal(sample.azimuth_deg),
        sample.elevation_deg,
        sample.range_km
    );
    println!(
        "  sun azimuth {:.1}°, elevation {:.1}°",
        sun.azimuth_deg, sun.elevation_deg
    );
    ExitCode::SUCCESS
}

fn fetch(config: &Config) -> ExitCode {
    match download(config) {
        Ok(entry) => {
            println!(
                "Saved {} (NORAD {}, epoch {}) to {}",
                entry.info.name,
                entry.info.norad_id,
                entry.info.epoch,
                config.tle.file.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Download failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(config: &Config) -> ExitCode {
    let observer = match config.observer() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Invalid station: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "Station {}: {:.4}, {:.4}, {:.0} m",
        config.station_name(),
        observer.latitude_deg(),
        observer.longitude_deg(),
        observer.altitude_m()
    );

    if let Err(e) = config.search_config(None, None) {
        eprintln!("Invalid search settings: {}", e);
        return ExitCode::FAILURE;
    }

    match tle::load_file(&config.tle.file, Some(&config.tle.satellite)) {
        Ok(entry) => {
            let age = Utc::now() - entry.info.epoch;
            println!(
                "TLE {} (NORAD {}), epoch {} ({} days old)",
                entry.info.name,
                entry.info.norad_id,
                entry.info.epoch,
                age.num_days()
            );
            if age.abs() > config.tle.validity {
                println!("  warning: epoch is outside the validity window, run `fetch`");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("TLE error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn serve(config: Config) -> ExitCode {
    let provider = match provider(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match block_on(web::run_server(config, provider)) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) | Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
