//! Power report for one activity from JSON files.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ridepower_core::cli::render_activity_report;
use ridepower_core::config::load_config;
use ridepower_core::{analyze_activity, ActivityRecord, StreamsBundle};

#[derive(Parser, Debug)]
#[command(
    name = "power-report",
    about = "Power analysis (NP, IF, TSS, zones) of one activity"
)]
struct Args {
    /// Activity summary JSON
    activity: PathBuf,

    /// Stored streams JSON for the activity
    streams: PathBuf,

    /// Current FTP in watts; a recorded FTP in the streams wins
    #[arg(long, default_value_t = 0.0)]
    ftp: f64,

    /// Max heart rate in bpm
    #[arg(long)]
    max_hr: Option<f64>,

    /// Engine config file
    #[arg(long, default_value = "ridepower.json")]
    config: PathBuf,

    /// Print the analysis as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config).context("loading config")?;
    cfg.apply_env_overrides().context("applying environment overrides")?;
    cfg.validate()?;

    let activity: ActivityRecord = read_json(&args.activity)?;
    let streams: StreamsBundle = read_json(&args.streams)?;
    if args.ftp <= 0.0 && streams.recorded_ftp().is_none() {
        log::warn!("no FTP given and none recorded with the activity, IF/TSS will be 0");
    }

    let analysis = analyze_activity(&activity, &streams, args.ftp, args.max_hr);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", render_activity_report(&analysis));
    }
    Ok(())
}
