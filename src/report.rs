//! SLCSP report: load the three CSV tables, resolve every request, write the
//! result table.
//!
//! Output is written to `<output>.tmp` and renamed into place once complete, so
//! a failed run never leaves a partial report behind.

use crate::error::SlcspError;
use crate::models::{MetalLevel, PlanRecord, SlcspRequest, ZipRecord};
use crate::plan_index::PlanIndex;
use crate::resolver::{RateResolver, ResolutionSummary};
use crate::zip_index::ZipIndex;
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_ZIP_FILE: &str = "zips.csv";
pub const DEFAULT_PLAN_FILE: &str = "plans.csv";
pub const DEFAULT_REQUEST_FILE: &str = "slcsp.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "slcsp-output.csv";

const OUTPUT_HEADER: [&str; 2] = ["zipcode", "rate"];

/// Input/output locations and the tier to benchmark
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub zips: PathBuf,
    pub plans: PathBuf,
    pub requests: PathBuf,
    pub output: PathBuf,
    pub metal_level: MetalLevel,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            zips: PathBuf::from(DEFAULT_ZIP_FILE),
            plans: PathBuf::from(DEFAULT_PLAN_FILE),
            requests: PathBuf::from(DEFAULT_REQUEST_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            metal_level: MetalLevel::Silver,
        }
    }
}

/// Read every row of a headered CSV file, columns matched by name
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SlcspError> {
    let file = File::open(path).map_err(|e| SlcspError::io(path, e))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|e| SlcspError::csv(path, e))
}

pub fn load_zips(path: &Path) -> Result<ZipIndex, SlcspError> {
    let records: Vec<ZipRecord> = read_records(path)?;
    let index = ZipIndex::build(records);
    info!(
        "successfully loaded zipcode data from file: {:?} ({} records, {} zipcodes)",
        path,
        index.record_count(),
        index.len()
    );
    Ok(index)
}

pub fn load_plans(path: &Path) -> Result<PlanIndex, SlcspError> {
    let records: Vec<PlanRecord> = read_records(path)?;
    let index = PlanIndex::build(records);
    info!(
        "successfully loaded coverage plan data from file: {:?} ({} plans, {} rate areas)",
        path,
        index.record_count(),
        index.len()
    );
    Ok(index)
}

pub fn load_requests(path: &Path) -> Result<Vec<SlcspRequest>, SlcspError> {
    let requests: Vec<SlcspRequest> = read_records(path)?;
    info!(
        "successfully loaded slcsp zipcodes from file: {:?} ({} zipcodes)",
        path,
        requests.len()
    );
    Ok(requests)
}

/// Write `zipcode,rate` rows in request order; unresolved rates are left blank
pub fn write_requests(path: &Path, requests: &[SlcspRequest]) -> Result<(), SlcspError> {
    let tmp_path = temp_path(path);

    if let Err(e) = write_rows(&tmp_path, requests) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(SlcspError::io(path, e));
    }

    info!("successfully wrote slcsp to file {:?}", path);
    Ok(())
}

fn write_rows(path: &Path, requests: &[SlcspRequest]) -> Result<(), SlcspError> {
    let file = File::create(path).map_err(|e| SlcspError::io(path, e))?;
    // Header is written by hand so an empty request list still gets one
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer
        .write_record(OUTPUT_HEADER)
        .map_err(|e| SlcspError::csv(path, e))?;
    for request in requests {
        writer
            .serialize(request)
            .map_err(|e| SlcspError::csv(path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| SlcspError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| SlcspError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load, resolve and write in one pass. Nothing is written unless every input
/// loads cleanly.
pub fn generate_report(config: &ReportConfig) -> Result<ResolutionSummary, SlcspError> {
    let zips = load_zips(&config.zips)?;
    let plans = load_plans(&config.plans)?;
    let mut requests = load_requests(&config.requests)?;

    if !plans.contains_tier(&config.metal_level) {
        warn!(
            "No plans with metal level '{}' in {:?}; every rate will be blank",
            config.metal_level,
            config.plans
        );
    }

    let resolver = RateResolver::new(&zips, &plans).with_tier(config.metal_level.clone());
    let summary = resolver.resolve_all(&mut requests);
    info!("successfully calculated slcsp for zipcodes");

    write_requests(&config.output, &requests)?;

    info!(
        "Report complete: {} zipcodes, {} resolved, {} without zip data, {} ambiguous, {} without {} plans",
        summary.total(),
        summary.resolved,
        summary.no_zip_data,
        summary.ambiguous,
        summary.no_tier_match,
        config.metal_level
    );

    Ok(summary)
}
