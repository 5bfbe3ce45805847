//! Power and heart-rate zones.
//!
//! Both tables are fixed. Power zones follow the Coggan 7-zone model on % of FTP,
//! heart-rate zones are 5 bands on % of max heart rate.
//!
//! Classification uses inclusive bounds on both ends. When two zones share a
//! bound (the heart-rate table does, e.g. 60 % closes zone 1 and opens zone 2)
//! the lower zone takes the sample, so a sample is never counted twice.
//! Samples falling in a rounding gap between zones are not counted in any zone.

use serde::{Deserialize, Serialize};

use crate::metrics::round_u32;
use crate::types::ZoneDistribution;

/// Upper bound used for the open-ended top power zone.
pub const OPEN_ENDED_WATTS: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDefinition {
    pub zone: u8,
    pub name: &'static str,
    pub min_pct: f64,
    /// `None` = no upper limit.
    pub max_pct: Option<f64>,
    pub color: &'static str,
}

pub const POWER_ZONES: [ZoneDefinition; 7] = [
    ZoneDefinition { zone: 1, name: "Active Recovery", min_pct: 0.0, max_pct: Some(0.55), color: "#9CA3AF" },
    ZoneDefinition { zone: 2, name: "Endurance", min_pct: 0.56, max_pct: Some(0.75), color: "#60A5FA" },
    ZoneDefinition { zone: 3, name: "Tempo", min_pct: 0.76, max_pct: Some(0.90), color: "#34D399" },
    ZoneDefinition { zone: 4, name: "Lactate Threshold", min_pct: 0.91, max_pct: Some(1.05), color: "#FBBF24" },
    ZoneDefinition { zone: 5, name: "VO2max", min_pct: 1.06, max_pct: Some(1.20), color: "#F97316" },
    ZoneDefinition { zone: 6, name: "Anaerobic", min_pct: 1.21, max_pct: Some(1.50), color: "#EF4444" },
    ZoneDefinition { zone: 7, name: "Neuromuscular", min_pct: 1.51, max_pct: None, color: "#A855F7" },
];

pub const HR_ZONES: [ZoneDefinition; 5] = [
    ZoneDefinition { zone: 1, name: "Recovery", min_pct: 0.50, max_pct: Some(0.60), color: "#9CA3AF" },
    ZoneDefinition { zone: 2, name: "Aerobic", min_pct: 0.60, max_pct: Some(0.70), color: "#60A5FA" },
    ZoneDefinition { zone: 3, name: "Tempo", min_pct: 0.70, max_pct: Some(0.80), color: "#34D399" },
    ZoneDefinition { zone: 4, name: "Threshold", min_pct: 0.80, max_pct: Some(0.90), color: "#FBBF24" },
    ZoneDefinition { zone: 5, name: "Anaerobic", min_pct: 0.90, max_pct: Some(1.00), color: "#EF4444" },
];

/// Power zone with absolute bounds for a given FTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerZone {
    pub zone: u8,
    pub name: String,
    pub min_power: u32,
    pub max_power: u32,
    pub color: String,
}

/// Heart-rate zone with absolute bpm bounds for a given max HR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateZone {
    pub zone: u8,
    pub name: String,
    pub min_hr: u32,
    pub max_hr: u32,
    pub color: String,
}

/// Inclusive `[min, max]` bucket fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBucket<'a> {
    pub zone: u8,
    pub name: &'a str,
    pub min: f64,
    pub max: f64,
    pub color: &'a str,
}

/// Absolute bounds of the 7 power zones. Negative FTP is treated as 0.
pub fn compute_power_zones(ftp: f64) -> Vec<PowerZone> {
    let ftp = if ftp.is_finite() { ftp.max(0.0) } else { 0.0 };
    POWER_ZONES
        .iter()
        .map(|z| PowerZone {
            zone: z.zone,
            name: z.name.to_string(),
            min_power: round_u32(ftp * z.min_pct),
            max_power: z.max_pct.map_or(OPEN_ENDED_WATTS, |pct| round_u32(ftp * pct)),
            color: z.color.to_string(),
        })
        .collect()
}

pub fn compute_hr_zones(max_hr: f64) -> Vec<HeartRateZone> {
    let max_hr = if max_hr.is_finite() { max_hr.max(0.0) } else { 0.0 };
    HR_ZONES
        .iter()
        .map(|z| HeartRateZone {
            zone: z.zone,
            name: z.name.to_string(),
            min_hr: round_u32(max_hr * z.min_pct),
            max_hr: round_u32(max_hr * z.max_pct.unwrap_or(1.0)),
            color: z.color.to_string(),
        })
        .collect()
}

fn power_buckets(zones: &[PowerZone]) -> Vec<ZoneBucket<'_>> {
    zones
        .iter()
        .map(|z| ZoneBucket {
            zone: z.zone,
            name: &z.name,
            min: z.min_power as f64,
            max: z.max_power as f64,
            color: &z.color,
        })
        .collect()
}

fn hr_buckets(zones: &[HeartRateZone]) -> Vec<ZoneBucket<'_>> {
    zones
        .iter()
        .map(|z| ZoneBucket {
            zone: z.zone,
            name: &z.name,
            min: z.min_hr as f64,
            max: z.max_hr as f64,
            color: &z.color,
        })
        .collect()
}

/// Index of the first bucket containing `value`.
///
/// A value on a shared bound belongs to the lower zone only. The dashboard's
/// heart-rate breakdown used to count it in both zones; that was dropped.
pub fn classify(value: f64, buckets: &[ZoneBucket<'_>]) -> Option<usize> {
    buckets.iter().position(|b| value >= b.min && value <= b.max)
}

/// Per-bucket (count, sum) over all samples.
pub fn tally(samples: &[f64], buckets: &[ZoneBucket<'_>]) -> Vec<(u32, f64)> {
    let mut acc = vec![(0u32, 0.0f64); buckets.len()];
    for &s in samples {
        if let Some(i) = classify(s, buckets) {
            acc[i].0 += 1;
            acc[i].1 += s;
        }
    }
    acc
}

/// Time in zone for 1 Hz samples. Percentages are of all samples, one decimal.
pub fn zone_distribution(samples: &[f64], buckets: &[ZoneBucket<'_>]) -> Vec<ZoneDistribution> {
    let total = samples.len();
    buckets
        .iter()
        .zip(tally(samples, buckets))
        .map(|(b, (count, sum))| ZoneDistribution {
            zone: b.zone,
            name: b.name.to_string(),
            time_in_zone: count,
            percentage_time: if total > 0 {
                (count as f64 / total as f64 * 1000.0).round() / 10.0
            } else {
                0.0
            },
            average: if count > 0 { round_u32(sum / count as f64) } else { 0 },
            color: b.color.to_string(),
        })
        .collect()
}

pub fn power_zone_distribution(watts: &[f64], zones: &[PowerZone]) -> Vec<ZoneDistribution> {
    zone_distribution(watts, &power_buckets(zones))
}

pub fn hr_zone_distribution(heartrate: &[f64], max_hr: f64) -> Vec<ZoneDistribution> {
    let zones = compute_hr_zones(max_hr);
    zone_distribution(heartrate, &hr_buckets(&zones))
}

/// Whole-percent share of samples per power zone, keyed `zone1`..`zone7`.
pub fn power_zone_percentages(watts: &[f64], ftp: f64) -> Vec<(String, u32)> {
    let zones = compute_power_zones(ftp);
    let buckets = power_buckets(&zones);
    let total = watts.len();
    buckets
        .iter()
        .zip(tally(watts, &buckets))
        .map(|(b, (count, _))| {
            let pct = if total > 0 { round_u32(count as f64 / total as f64 * 100.0) } else { 0 };
            (format!("zone{}", b.zone), pct)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_lower_zone_on_shared_bound() {
        let zones = compute_hr_zones(200.0);
        let buckets = hr_buckets(&zones);
        // 120 bpm closes zone 1 and opens zone 2
        assert_eq!(classify(120.0, &buckets), Some(0));
        assert_eq!(classify(121.0, &buckets), Some(1));
        assert_eq!(classify(90.0, &buckets), None);
    }

    #[test]
    fn rounding_gap_is_unclassified() {
        let zones = compute_power_zones(250.0);
        let buckets = power_buckets(&zones);
        // Z1 ends at 138 W, Z2 starts at 140 W
        assert_eq!(classify(139.0, &buckets), None);
        assert_eq!(classify(138.0, &buckets), Some(0));
    }
}
