use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::analyzer::analyze_activity;
use crate::config::EngineConfig;
use crate::metrics::round_u32;
use crate::storage::StreamSource;
use crate::telemetry::Metrics;
use crate::types::{ActivityPowerAnalysis, ActivityRecord, AthletePowerProfile};

pub const WEEK_DAYS: i64 = 7;
pub const MONTH_DAYS: i64 = 30;
pub const CHRONIC_DAYS: i64 = 42;

/// TSS summed per calendar day.
pub type DailyTss = BTreeMap<NaiveDate, f64>;

#[derive(Clone)]
pub struct ProfileInputs<'a> {
    pub athlete_id: i64,
    /// Any order; the newest `profile_activity_limit` are used.
    pub activities: &'a [ActivityRecord],
    /// Current FTP; streams with a recorded FTP override it per activity.
    pub ftp: f64,
    pub max_heart_rate: Option<f64>,
    /// Reference time for the 7/30/42-day windows.
    pub now: DateTime<Utc>,
    pub source: &'a dyn StreamSource,
}

/// Sum of daily TSS for days whose midnight lies within `days` of `now`.
pub fn window_sum(daily: &DailyTss, now: DateTime<Utc>, days: i64) -> f64 {
    let cutoff = (now - Duration::days(days)).naive_utc();
    daily
        .iter()
        .filter(|(date, _)| date.and_hms_opt(0, 0, 0).map_or(false, |midnight| midnight >= cutoff))
        .map(|(_, tss)| *tss)
        .sum()
}

pub fn add_daily_tss(daily: &mut DailyTss, analysis: &ActivityPowerAnalysis, day: NaiveDate) {
    *daily.entry(day).or_insert(0.0) += analysis.training_load.tss;
}

/// Athlete training profile from their most recent activities.
///
/// CTL and ATL are fixed-window averages (42-day sum / 42, 7-day sum / 7),
/// not the exponentially weighted PMC values; see [`crate::pmc`] for those.
/// Activities without stored streams, or whose fetch fails, are skipped.
pub fn build_athlete_profile(
    inputs: ProfileInputs<'_>,
    config: &EngineConfig,
    metrics: &Metrics,
) -> AthletePowerProfile {
    let athlete_name = match inputs.source.athlete_name(inputs.athlete_id) {
        Ok(Some(name)) if !name.trim().is_empty() => name.trim().to_string(),
        Ok(_) => format!("Athlete {}", inputs.athlete_id),
        Err(e) => {
            log::warn!("athlete {}: name lookup failed: {e}", inputs.athlete_id);
            format!("Athlete {}", inputs.athlete_id)
        }
    };

    let mut recent: Vec<&ActivityRecord> = inputs.activities.iter().collect();
    recent.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    if recent.len() > config.profile_activity_limit {
        log::debug!(
            "athlete {}: {} activities, analysing newest {}",
            inputs.athlete_id,
            recent.len(),
            config.profile_activity_limit
        );
        recent.truncate(config.profile_activity_limit);
    }

    let mut analyzed = Vec::with_capacity(recent.len());
    let mut daily = DailyTss::new();

    for activity in recent {
        let streams = match inputs.source.fetch_streams(activity.id) {
            Ok(Some(s)) => s,
            Ok(None) => {
                metrics.activities_skipped.inc();
                continue;
            }
            Err(e) => {
                log::warn!("activity {}: stream fetch failed, skipping: {e}", activity.id);
                metrics.stream_fetch_failures.inc();
                continue;
            }
        };

        let analysis = analyze_activity(activity, &streams, inputs.ftp, inputs.max_heart_rate);
        add_daily_tss(&mut daily, &analysis, activity.calendar_day());
        metrics.activities_analyzed.inc();
        analyzed.push(analysis);
    }

    let weekly = window_sum(&daily, inputs.now, WEEK_DAYS);
    let monthly = window_sum(&daily, inputs.now, MONTH_DAYS);
    let chronic = window_sum(&daily, inputs.now, CHRONIC_DAYS);

    let ctl = round_u32(chronic / CHRONIC_DAYS as f64);
    let atl = round_u32(weekly / WEEK_DAYS as f64);

    log::info!(
        "athlete {}: {} activities analysed, ctl={ctl} atl={atl}",
        inputs.athlete_id,
        analyzed.len()
    );

    AthletePowerProfile {
        athlete_id: inputs.athlete_id,
        athlete_name,
        ftp: inputs.ftp,
        max_hr: inputs.max_heart_rate,
        weekly_tss: round_u32(weekly),
        monthly_tss: round_u32(monthly),
        ctl,
        atl,
        tsb: ctl as i32 - atl as i32,
        recent_activities: analyzed,
    }
}
