//! JSON in, JSON out. Used by the Python binding and the CLI.
//!
//! Request envelopes reject unknown top-level fields; inner provider rows
//! (activity, streams) ignore fields they do not read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_path_to_error as spte;

use crate::analyzer::analyze_activity;
use crate::config::EngineConfig;
use crate::error::InputError;
use crate::pmc::performance_management_chart;
use crate::report::{build_period_report, ReportAthlete, ReportItem};
use crate::types::{ActivityRecord, StreamsBundle};
use crate::zones::compute_power_zones;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeActivityRequest {
    pub activity: ActivityRecord,
    pub streams: StreamsBundle,
    #[serde(default)]
    pub ftp: f64,
    #[serde(default, alias = "maxHR", alias = "max_hr")]
    pub max_heart_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodReportRequest {
    #[serde(default)]
    pub athlete: ReportAthlete,
    #[serde(default)]
    pub items: Vec<ReportItem>,
    /// Reference time; defaults to the current time.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PmcRequest {
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    pub ftp: f64,
    /// Last day of the chart; defaults to today (UTC).
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

pub fn parse_json<T: DeserializeOwned>(json_in: &str, what: &'static str) -> Result<T, InputError> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    let value = spte::deserialize(&mut de).map_err(|e| InputError::Parse {
        what,
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })?;
    de.end().map_err(|e| InputError::Parse {
        what,
        path: ".".to_string(),
        message: e.to_string(),
    })?;
    Ok(value)
}

/// `AnalyzeActivityRequest` JSON → `ActivityPowerAnalysis` JSON.
pub fn analyze_activity_json(json_in: &str) -> Result<String, InputError> {
    let req: AnalyzeActivityRequest = parse_json(json_in, "AnalyzeActivityRequest")?;
    let analysis = analyze_activity(&req.activity, &req.streams, req.ftp, req.max_heart_rate);
    Ok(serde_json::to_string(&analysis)?)
}

/// `PeriodReportRequest` JSON → `PeriodReport` JSON.
pub fn build_period_report_json(json_in: &str, config: &EngineConfig) -> Result<String, InputError> {
    let req: PeriodReportRequest = parse_json(json_in, "PeriodReportRequest")?;
    let now = req.now.unwrap_or_else(Utc::now);
    let report = build_period_report(&req.athlete, &req.items, now, config);
    Ok(serde_json::to_string(&report)?)
}

/// `PmcRequest` JSON → `[PmcPoint]` JSON.
pub fn performance_management_json(json_in: &str, config: &EngineConfig) -> Result<String, InputError> {
    let req: PmcRequest = parse_json(json_in, "PmcRequest")?;
    let end = req.end.unwrap_or_else(|| Utc::now().date_naive());
    let points = performance_management_chart(&req.activities, req.ftp, end, config);
    Ok(serde_json::to_string(&points)?)
}

pub fn power_zones_json(ftp: f64) -> Result<String, InputError> {
    Ok(serde_json::to_string(&compute_power_zones(ftp))?)
}
