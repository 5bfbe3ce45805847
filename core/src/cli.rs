use crate::types::{ActivityPowerAnalysis, AthletePowerProfile, ZoneDistribution};

fn zone_lines(title: &str, zones: &[ZoneDistribution], unit: &str, out: &mut Vec<String>) {
    out.push(format!("{title}:"));
    for z in zones {
        out.push(format!(
            "  Z{} {:<18} {:>6}s {:>5.1}%  avg {} {}",
            z.zone, z.name, z.time_in_zone, z.percentage_time, z.average, unit
        ));
    }
}

/// Plain-text report of one activity analysis.
pub fn render_activity_report(a: &ActivityPowerAnalysis) -> String {
    let t = &a.training_load;
    let mut out = vec![
        format!("--- Power Report: {} ({}) ---", a.activity_name, a.activity_id),
        format!("Date: {}", a.date.format("%Y-%m-%d %H:%M")),
        format!("FTP used: {:.0} W", a.ftp),
        format!("Duration: {} min", t.duration / 60),
        format!("Avg / NP / Max: {} / {} / {} W", t.avg_power, t.np, t.max_power),
        format!("IF {:.2}  VI {:.2}  TSS {:.1}", t.intensity_factor, t.variability_index, t.tss),
        format!("Work: {} kJ", t.kilojoules),
    ];
    zone_lines("Power zones", &a.power_zones, "W", &mut out);
    match (&a.hr_zones, a.max_heartrate) {
        (Some(hr), Some(max_hr)) => {
            out.push(format!("Max HR used: {max_hr:.0} bpm"));
            zone_lines("Heart rate zones", hr, "bpm", &mut out);
        }
        _ => out.push("Heart rate zones: n/a".to_string()),
    }
    out.join("\n")
}

pub fn render_profile_summary(p: &AthletePowerProfile) -> String {
    [
        format!("--- Training Profile: {} ({}) ---", p.athlete_name, p.athlete_id),
        format!("FTP: {:.0} W", p.ftp),
        format!("Weekly TSS: {}  Monthly TSS: {}", p.weekly_tss, p.monthly_tss),
        format!("CTL {}  ATL {}  TSB {}", p.ctl, p.atl, p.tsb),
        format!("Activities analysed: {}", p.recent_activities.len()),
    ]
    .join("\n")
}
