use crate::config::{GridConfig, RunConfig, ServiceConfig};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

/// Generate the AP_Declination magnetic field lookup tables
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding AP_Declination.h, where the tables are written
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Generated source file, relative to --dir
    #[arg(short, long, default_value = "tables.cpp")]
    output: PathBuf,

    /// File that must exist in --dir before anything runs
    #[arg(long, default_value = "AP_Declination.h")]
    marker: String,

    /// Also dump every sample to this CSV file, relative to --dir
    #[arg(long)]
    samples_csv: Option<PathBuf>,

    /// Grid step in degrees
    #[arg(long, default_value_t = 10.0)]
    resolution: f64,

    #[arg(long, default_value_t = -90.0, allow_negative_numbers = true)]
    min_lat: f64,

    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    max_lat: f64,

    #[arg(long, default_value_t = -180.0, allow_negative_numbers = true)]
    min_lon: f64,

    #[arg(long, default_value_t = 180.0, allow_negative_numbers = true)]
    max_lon: f64,

    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Field model name understood by the service
    #[arg(long, default_value = "wmm")]
    model: String,

    /// Model revision
    #[arg(long, default_value = "current")]
    revision: String,

    /// Base URL of the geomagnetic model web service
    #[arg(long)]
    url: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn get_args() -> Result<(RunConfig, u8)> {
    let args = Args::parse();
    let verbose = args.verbose;
    Ok((into_run_config(args)?, verbose))
}

fn into_run_config(args: Args) -> Result<RunConfig> {
    let date = match &args.date {
        Some(text) => parse_date(text)?,
        None => Local::now().date_naive(),
    };

    let mut service = ServiceConfig::new();
    if let Some(url) = args.url {
        service.base_url = url;
    }
    service.model = args.model;
    service.revision = args.revision;

    Ok(RunConfig {
        work_dir: args.dir,
        marker: args.marker,
        output: args.output,
        samples_csv: args.samples_csv,
        grid: GridConfig {
            resolution: args.resolution,
            min_lat: args.min_lat,
            max_lat: args.max_lat,
            min_lon: args.min_lon,
            max_lon: args.max_lon,
        },
        service,
        date,
        show_progress: !args.no_progress,
    })
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("Invalid --date {:?}, expected YYYY-MM-DD", text))
}
