//! Fill in the SLCSP rate for every zipcode in a request table
//!
//! Usage:
//!   cargo run --release --bin slcsp -- [OPTIONS]
//!
//! Options:
//!   --zips <PATH>          ZIP to rate area table (default: zips.csv)
//!   --plans <PATH>         Coverage plan table (default: plans.csv)
//!   --requests <PATH>      Zipcodes needing a rate (default: slcsp.csv)
//!   --output <PATH>        Output CSV path (default: slcsp-output.csv)
//!   --metal-level <LEVEL>  Plan tier to benchmark (default: Silver)
//!   --log-level <FILTER>   Tracing filter directive (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use slcsp::report::{
    generate_report, ReportConfig, DEFAULT_OUTPUT_FILE, DEFAULT_PLAN_FILE, DEFAULT_REQUEST_FILE,
    DEFAULT_ZIP_FILE,
};
use slcsp::MetalLevel;
use std::path::PathBuf;
use tracing::info;

/// Second-lowest-cost Silver plan report
#[derive(Parser, Debug)]
#[command(name = "slcsp")]
#[command(about = "Compute the second-lowest-cost Silver plan rate for a list of zipcodes")]
struct Args {
    /// ZIP code to rate area CSV
    #[arg(long, default_value = DEFAULT_ZIP_FILE)]
    zips: PathBuf,

    /// Coverage plan CSV
    #[arg(long, default_value = DEFAULT_PLAN_FILE)]
    plans: PathBuf,

    /// Request CSV (zipcode,rate)
    #[arg(long, default_value = DEFAULT_REQUEST_FILE)]
    requests: PathBuf,

    /// Output CSV path
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Metal level to benchmark
    #[arg(long, default_value = "Silver")]
    metal_level: String,

    /// Log filter (e.g. "info", "slcsp=debug")
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ReportConfig {
    fn from(args: Args) -> Self {
        Self {
            zips: args.zips,
            plans: args.plans,
            requests: args.requests,
            output: args.output,
            metal_level: MetalLevel::from(args.metal_level),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    let config = ReportConfig::from(args);
    info!("Generating SLCSP report into {:?}", config.output);

    let summary = generate_report(&config)
        .with_context(|| format!("failed to generate SLCSP report from {:?}", config.requests))?;

    info!(
        "Done: {} of {} zipcodes have a rate",
        summary.resolved,
        summary.total()
    );
    Ok(())
}
