//! Power training analysis: Normalized Power, TSS, IF, VI, power and
//! heart-rate zones, athlete load (CTL/ATL/TSB), PMC series and the
//! 42-day period report.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod json_api;
pub mod metrics;
pub mod pmc;
pub mod profile;
pub mod report;
pub mod storage;
pub mod supabase;
pub mod telemetry;
pub mod types;
pub mod zones;

#[cfg(feature = "python")]
mod py;

pub use analyzer::{analyze_activity, effective_thresholds, EffectiveThresholds};
pub use config::{load_config, save_config, EngineConfig};
pub use error::{ConfigError, InputError, StoreError};
pub use json_api::{
    analyze_activity_json, build_period_report_json, performance_management_json, power_zones_json,
};
pub use metrics::{
    intensity_factor, normalized_power, training_stress_score, variability_index,
};
pub use pmc::{
    daily_tss_map, performance_management_chart, performance_management_series, PmcPoint,
};
pub use profile::{build_athlete_profile, ProfileInputs};
pub use report::{build_period_report, PeriodReport, ReportAthlete, ReportItem};
pub use storage::{
    check_streams_availability, InMemoryStreamSource, JsonDirStreamSource, StreamSource,
};
pub use supabase::SupabaseStreamSource;
pub use telemetry::Metrics;
pub use types::{
    ActivityPowerAnalysis, ActivityRecord, AthletePowerProfile, StreamData, StreamType,
    StreamsBundle, TimeSeries, TrainingLoadSummary, ZoneDistribution,
};
pub use zones::{compute_hr_zones, compute_power_zones, HeartRateZone, PowerZone};
