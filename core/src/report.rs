use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::metrics::{
    average_power, intensity_factor, max_power, normalized_power, round_u32, RoundTo,
    training_stress_score,
};
use crate::profile::{window_sum, DailyTss, WEEK_DAYS};
use crate::types::{ActivityRecord, StreamType, StreamsBundle};
use crate::zones::power_zone_percentages;

pub const PERIOD_DAYS: i64 = 42;
pub const TREND_WEEKS: i64 = 6;
pub const RECENT_ACTIVITIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAthlete {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ftp: Option<f64>,
    #[serde(default, rename = "maxHR")]
    pub max_hr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub activity: ActivityRecord,
    pub streams: StreamsBundle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAthleteOut {
    pub name: String,
    pub ftp: f64,
    #[serde(rename = "maxHR")]
    pub max_hr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLine {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub duration: u32,
    pub distance: f64,
    pub np: u32,
    pub tss: f64,
    pub intensity_factor: f64,
    pub avg_power: u32,
    pub max_power: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_activities: usize,
    #[serde(rename = "totalTSS")]
    pub total_tss: u32,
    #[serde(rename = "avgDailyTSS")]
    pub avg_daily_tss: u32,
    pub ctl: u32,
    pub atl: u32,
    pub tsb: i32,
    /// seconds
    pub total_duration: u32,
    /// km
    pub total_distance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTrend {
    pub week: u32,
    pub start_date: NaiveDate,
    pub tss: u32,
    pub hours: f64,
    pub activities: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub date: NaiveDate,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    #[serde(rename = "bestTSSDay")]
    pub best_tss_day: Option<Highlight>,
    pub longest_ride: Option<Highlight>,
    #[serde(rename = "highestIF")]
    pub highest_if: Option<Highlight>,
}

/// Training summary over the last 42 days, input for the coach narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub athlete: ReportAthleteOut,
    pub period: ReportPeriod,
    pub summary: ReportSummary,
    pub weekly_trend: Vec<WeekTrend>,
    /// Whole percent of all power samples, `zone1`..`zone7`.
    pub zone_distribution: BTreeMap<String, u32>,
    pub highlights: Highlights,
    pub recent_activities: Vec<ActivityLine>,
}

fn midnight(date: NaiveDate) -> Option<chrono::NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn summarize_item(item: &ReportItem, ftp: f64) -> Option<ActivityLine> {
    let watts = item.streams.series(StreamType::Watts);
    if watts.is_empty() {
        return None;
    }
    let np = normalized_power(watts);
    let duration = if item.activity.moving_time > 0 {
        item.activity.moving_time
    } else {
        watts.len() as u32
    };
    let a = &item.activity;
    Some(ActivityLine {
        id: a.id,
        date: a.calendar_day(),
        name: if a.name.is_empty() { format!("Activity {}", a.id) } else { a.name.clone() },
        duration,
        distance: a.distance.unwrap_or(0.0),
        np,
        tss: training_stress_score(np as f64, ftp, duration as f64),
        intensity_factor: intensity_factor(np as f64, ftp),
        avg_power: average_power(watts).unwrap_or(0),
        max_power: max_power(watts).unwrap_or(0),
    })
}

fn highlight_by<F>(lines: &[ActivityLine], key: F) -> Option<Highlight>
where
    F: Fn(&ActivityLine) -> f64,
{
    // first maximum wins, like a stable descending sort
    lines
        .iter()
        .rev()
        .max_by_key(|l| OrderedFloat(key(*l)))
        .map(|l| Highlight { date: l.date, name: l.name.clone(), value: key(l) })
}

/// Builds the 42-day report from the activities of the period.
///
/// Uses the athlete's FTP for every activity (default from config when unset).
/// Items without a watts stream are left out.
pub fn build_period_report(
    athlete: &ReportAthlete,
    items: &[ReportItem],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> PeriodReport {
    let ftp = athlete.ftp.filter(|f| *f > 0.0).unwrap_or(config.report_default_ftp);
    let max_hr = athlete.max_hr.filter(|h| *h > 0.0).unwrap_or(config.report_default_max_hr);
    let name = athlete
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Athlete")
        .to_string();

    let lines: Vec<ActivityLine> = items.iter().filter_map(|i| summarize_item(i, ftp)).collect();
    if lines.len() < items.len() {
        log::debug!("period report: {} items without power skipped", items.len() - lines.len());
    }

    let mut daily = DailyTss::new();
    for l in &lines {
        *daily.entry(l.date).or_insert(0.0) += l.tss;
    }
    let total_tss: f64 = daily.values().sum();
    let weekly_tss = window_sum(&daily, now, WEEK_DAYS);
    let total_duration: u32 = lines.iter().map(|l| l.duration).sum();
    let total_distance: f64 = lines.iter().map(|l| l.distance).sum();

    let ctl = round_u32(total_tss / PERIOD_DAYS as f64);
    let atl = round_u32(weekly_tss / WEEK_DAYS as f64);

    let period_start = now - Duration::days(PERIOD_DAYS);
    let weekly_trend = (0..TREND_WEEKS)
        .map(|week| {
            let start = period_start + Duration::days(week * 7);
            let end = start + Duration::days(7);
            let (lo, hi) = (start.naive_utc(), end.naive_utc());
            let in_week: Vec<&ActivityLine> = lines
                .iter()
                .filter(|l| midnight(l.date).map_or(false, |m| m >= lo && m < hi))
                .collect();
            WeekTrend {
                week: (week + 1) as u32,
                start_date: start.date_naive(),
                tss: round_u32(in_week.iter().map(|l| l.tss).sum()),
                hours: (in_week.iter().map(|l| l.duration as f64).sum::<f64>() / 3600.0).round_to(1),
                activities: in_week.len() as u32,
            }
        })
        .collect();

    let all_watts: Vec<f64> = items
        .iter()
        .flat_map(|i| i.streams.series(StreamType::Watts).iter().copied())
        .collect();
    let zone_distribution = power_zone_percentages(&all_watts, ftp).into_iter().collect();

    let highlights = Highlights {
        best_tss_day: highlight_by(&lines, |l| l.tss),
        longest_ride: highlight_by(&lines, |l| l.duration as f64),
        highest_if: highlight_by(&lines, |l| l.intensity_factor),
    };

    log::info!("period report for {name}: {} activities, total TSS {:.1}", lines.len(), total_tss);

    PeriodReport {
        athlete: ReportAthleteOut { name, ftp, max_hr },
        period: ReportPeriod {
            start_date: period_start.date_naive(),
            end_date: now.date_naive(),
            total_days: PERIOD_DAYS,
        },
        summary: ReportSummary {
            total_activities: lines.len(),
            total_tss: round_u32(total_tss),
            avg_daily_tss: round_u32(total_tss / PERIOD_DAYS as f64),
            ctl,
            atl,
            tsb: ctl as i32 - atl as i32,
            total_duration,
            total_distance: round_u32(total_distance / 1000.0),
        },
        weekly_trend,
        zone_distribution,
        highlights,
        recent_activities: lines.into_iter().take(RECENT_ACTIVITIES).collect(),
    }
}
