use crate::metrics::{
    average_power, estimated_kilojoules, intensity_factor, max_power, normalized_power, round_u32,
    training_stress_score, variability_index,
};
use crate::types::{
    ActivityPowerAnalysis, ActivityRecord, StreamType, StreamsBundle, TimeSeries,
    TrainingLoadSummary,
};
use crate::zones::{compute_power_zones, hr_zone_distribution, power_zone_distribution};

/// Thresholds actually used for an analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveThresholds {
    pub ftp: f64,
    pub max_hr: Option<f64>,
}

/// Values recorded with the activity win over the athlete's current settings,
/// so old rides keep the FTP that was valid when they were ridden.
pub fn effective_thresholds(
    streams: &StreamsBundle,
    current_ftp: f64,
    current_max_hr: Option<f64>,
) -> EffectiveThresholds {
    let ftp = streams
        .recorded_ftp()
        .or(Some(current_ftp).filter(|f| *f > 0.0))
        .unwrap_or(0.0);
    let max_hr = streams
        .recorded_max_heartrate()
        .or(current_max_hr.filter(|h| *h > 0.0));
    EffectiveThresholds { ftp, max_hr }
}

fn non_empty(xs: &[f64]) -> Option<Vec<f64>> {
    if xs.is_empty() { None } else { Some(xs.to_vec()) }
}

/// Power analysis of one activity.
///
/// Never fails: missing streams, unset FTP or missing heart rate give zeros or
/// leave the optional parts out.
pub fn analyze_activity(
    activity: &ActivityRecord,
    streams: &StreamsBundle,
    ftp: f64,
    max_heart_rate: Option<f64>,
) -> ActivityPowerAnalysis {
    let thresholds = effective_thresholds(streams, ftp, max_heart_rate);

    if !streams.is_aligned() {
        log::warn!(
            "activity {}: stream channels have different lengths, analysing them independently",
            activity.id
        );
    }
    let unknown = streams.unknown_stream_types();
    if !unknown.is_empty() {
        log::debug!("activity {}: ignoring stream types {:?}", activity.id, unknown);
    }

    let watts = streams.series(StreamType::Watts);
    let heartrate = streams.series(StreamType::HeartRate);

    let np = normalized_power(watts);
    let avg_power = average_power(watts)
        .unwrap_or_else(|| activity.average_watts.map(round_u32).unwrap_or(0));
    let peak_power = max_power(watts)
        .unwrap_or_else(|| activity.max_watts.map(round_u32).unwrap_or(0));
    let duration = activity.moving_time;

    let tss = training_stress_score(np as f64, thresholds.ftp, duration as f64);
    let intensity = intensity_factor(np as f64, thresholds.ftp);
    let vi = variability_index(np as f64, avg_power as f64);
    let kilojoules = activity
        .kilojoules
        .filter(|kj| *kj > 0.0)
        .map(round_u32)
        .unwrap_or_else(|| estimated_kilojoules(avg_power as f64, duration as f64));

    let zones = compute_power_zones(thresholds.ftp);
    let power_zones = power_zone_distribution(watts, &zones);

    let hr_zones = match thresholds.max_hr {
        Some(max_hr) if !heartrate.is_empty() => Some(hr_zone_distribution(heartrate, max_hr)),
        _ => None,
    };

    log::debug!(
        "activity {}: ftp={} np={} tss={} if={} hr_zones={}",
        activity.id,
        thresholds.ftp,
        np,
        tss,
        intensity,
        hr_zones.is_some()
    );

    ActivityPowerAnalysis {
        activity_id: activity.id,
        activity_name: activity.name.clone(),
        date: activity.start_date,
        ftp: thresholds.ftp,
        max_heartrate: thresholds.max_hr,
        strava_zones: streams.strava_zones.clone(),
        training_load: TrainingLoadSummary {
            np,
            avg_power,
            max_power: peak_power,
            intensity_factor: intensity,
            tss,
            variability_index: vi,
            duration,
            kilojoules,
        },
        power_zones,
        hr_zones,
        time_series_data: TimeSeries {
            time: streams.series(StreamType::Time).to_vec(),
            watts: watts.to_vec(),
            heartrate: non_empty(heartrate),
            cadence: non_empty(streams.series(StreamType::Cadence)),
            velocity: non_empty(streams.series(StreamType::Velocity)),
            grade: non_empty(streams.series(StreamType::Grade)),
            altitude: non_empty(streams.series(StreamType::Altitude)),
            temp: non_empty(streams.series(StreamType::Temperature)),
        },
    }
}
