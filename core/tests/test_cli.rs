use chrono::{TimeZone, Utc};
use ridepower_core::cli::{render_activity_report, render_profile_summary};
use ridepower_core::config::EngineConfig;
use ridepower_core::{
    analyze_activity, build_athlete_profile, ActivityRecord, InMemoryStreamSource, Metrics,
    ProfileInputs, StreamType, StreamsBundle,
};

fn analysis(with_hr: bool) -> ridepower_core::ActivityPowerAnalysis {
    let activity = ActivityRecord::new(11, "Hill repeats", Utc.with_ymd_and_hms(2024, 4, 2, 18, 5, 0).unwrap(), 3600);
    let mut streams = StreamsBundle::new(11).with_series(StreamType::Watts, vec![200.0; 60]);
    if with_hr {
        streams = streams.with_series(StreamType::HeartRate, vec![150.0; 60]);
    }
    analyze_activity(&activity, &streams, 200.0, Some(190.0))
}

#[test]
fn activity_report_lists_load_and_zones() {
    let text = render_activity_report(&analysis(true));
    assert!(text.contains("Hill repeats (11)"));
    assert!(text.contains("Date: 2024-04-02 18:05"));
    assert!(text.contains("Avg / NP / Max: 200 / 200 / 200 W"));
    assert!(text.contains("IF 1.00  VI 1.00  TSS 100.0"));
    assert!(text.contains("Max HR used: 190 bpm"));
    assert_eq!(text.lines().filter(|l| l.trim_start().starts_with('Z')).count(), 12);
}

#[test]
fn activity_report_without_heart_rate() {
    let text = render_activity_report(&analysis(false));
    assert!(text.contains("Heart rate zones: n/a"));
}

#[test]
fn profile_summary() {
    let source = InMemoryStreamSource::new();
    let p = build_athlete_profile(
        ProfileInputs {
            athlete_id: 5,
            activities: &[],
            ftp: 260.0,
            max_heart_rate: None,
            now: Utc::now(),
            source: &source,
        },
        &EngineConfig::default(),
        &Metrics::new().unwrap(),
    );
    let text = render_profile_summary(&p);
    assert!(text.contains("Athlete 5 (5)"));
    assert!(text.contains("FTP: 260 W"));
    assert!(text.contains("CTL 0  ATL 0  TSB 0"));
}
