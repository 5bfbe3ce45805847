//! Performance Management Chart.
//!
//! Exponentially weighted CTL (42-day) and ATL (7-day) over a daily TSS series,
//! computed from activity summaries alone (no streams):
//! `x_today = x_yesterday + (tss_today - x_yesterday) / k`, seeded with `tss / k`.
//!
//! These are the numbers for the fitness/fatigue chart. The athlete profile keeps
//! its own fixed-window CTL/ATL.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::metrics::round_half_up;
use crate::types::ActivityRecord;

pub const CTL_TIME_CONSTANT: f64 = 42.0;
pub const ATL_TIME_CONSTANT: f64 = 7.0;
/// NP is approximated from average power when only the summary is known.
pub const SUMMARY_NP_FACTOR: f64 = 1.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmcPoint {
    pub date: NaiveDate,
    pub tss: f64,
    pub ctl: i64,
    pub atl: i64,
    pub tsb: i64,
}

/// TSS estimated from the activity summary.
///
/// Only power-meter rides count (`device_watts`), so provider-estimated power
/// does not inflate the load.
pub fn estimate_summary_tss(activity: &ActivityRecord, ftp: f64) -> f64 {
    let avg = match activity.average_watts {
        Some(w) if w > 0.0 => w,
        _ => return 0.0,
    };
    if ftp <= 0.0 || activity.device_watts != Some(true) {
        return 0.0;
    }
    let np = avg * SUMMARY_NP_FACTOR;
    let intensity = np / ftp;
    activity.moving_time as f64 * intensity * intensity * 100.0 / 3600.0
}

pub fn daily_tss_map(activities: &[ActivityRecord], ftp: f64) -> BTreeMap<NaiveDate, f64> {
    let mut daily = BTreeMap::new();
    for a in activities {
        *daily.entry(a.calendar_day()).or_insert(0.0) += estimate_summary_tss(a, ftp);
    }
    daily
}

/// One point per calendar day from the first day in `daily` to `end`,
/// keeping only the last `display_days` days.
pub fn performance_management_series(
    daily: &BTreeMap<NaiveDate, f64>,
    end: NaiveDate,
    display_days: i64,
) -> Vec<PmcPoint> {
    let Some(start) = daily.keys().next().copied() else {
        return Vec::new();
    };
    // a window reaching past the calendar start shows the whole series
    let first_shown = end
        .checked_sub_days(Days::new(display_days.max(1) as u64 - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut out = Vec::new();
    let mut ctl = 0.0f64;
    let mut atl = 0.0f64;
    let mut day = start;
    let mut first = true;

    while day <= end {
        let tss = daily.get(&day).copied().unwrap_or(0.0);
        if first {
            ctl = tss / CTL_TIME_CONSTANT;
            atl = tss / ATL_TIME_CONSTANT;
            first = false;
        } else {
            ctl += (tss - ctl) / CTL_TIME_CONSTANT;
            atl += (tss - atl) / ATL_TIME_CONSTANT;
        }

        if day >= first_shown {
            out.push(PmcPoint {
                date: day,
                tss,
                ctl: round_half_up(ctl) as i64,
                atl: round_half_up(atl) as i64,
                tsb: round_half_up(ctl - atl) as i64,
            });
        }

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

/// Chart points from activity summaries up to `end`, windowed by `pmc_display_days`.
pub fn performance_management_chart(
    activities: &[ActivityRecord],
    ftp: f64,
    end: NaiveDate,
    config: &EngineConfig,
) -> Vec<PmcPoint> {
    let daily = daily_tss_map(activities, ftp);
    log::debug!("pmc: {} activities over {} days", activities.len(), daily.len());
    performance_management_series(&daily, end, config.pmc_display_days)
}
