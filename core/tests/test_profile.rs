use chrono::{Duration, TimeZone, Utc};
use ridepower_core::config::EngineConfig;
use ridepower_core::{
    build_athlete_profile, ActivityRecord, InMemoryStreamSource, Metrics, ProfileInputs,
    StoreError, StreamSource, StreamType, StreamsBundle,
};

/// One 1 h ride at 200 W every day at noon, ending on 2024-06-30.
fn daily_rides(days: i64) -> (Vec<ActivityRecord>, InMemoryStreamSource) {
    let last = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
    let mut activities = Vec::new();
    let mut source = InMemoryStreamSource::new();
    for d in 0..days {
        let id = 1000 + d;
        activities.push(ActivityRecord::new(id, "Endurance", last - Duration::days(d), 3600));
        source.insert(StreamsBundle::new(id).with_series(StreamType::Watts, vec![200.0; 60]));
    }
    // oldest first, the profile must sort
    activities.reverse();
    (activities, source)
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

#[test]
fn profile_of_steady_daily_training() {
    let (activities, source) = daily_rides(60);
    let metrics = Metrics::new().unwrap();
    let profile = build_athlete_profile(
        ProfileInputs {
            athlete_id: 7,
            activities: &activities,
            ftp: 200.0,
            max_heart_rate: None,
            now: now(),
            source: &source,
        },
        &EngineConfig::default(),
        &metrics,
    );

    assert_eq!(profile.recent_activities.len(), 50);
    assert_eq!(profile.recent_activities[0].activity_id, 1000);
    assert!(profile.recent_activities.iter().all(|a| a.training_load.tss == 100.0));
    assert_eq!(profile.weekly_tss, 700);
    assert_eq!(profile.monthly_tss, 3000);
    assert_eq!(profile.ctl, 100);
    assert_eq!(profile.atl, 100);
    assert_eq!(profile.tsb, 0);
    assert_eq!(profile.athlete_name, "Athlete 7");
    assert_eq!(metrics.activities_analyzed.get(), 50);
}

#[test]
fn activity_limit_comes_from_config() {
    let (activities, source) = daily_rides(20);
    let cfg = EngineConfig { profile_activity_limit: 5, ..EngineConfig::default() };
    let profile = build_athlete_profile(
        ProfileInputs {
            athlete_id: 7,
            activities: &activities,
            ftp: 200.0,
            max_heart_rate: None,
            now: now(),
            source: &source,
        },
        &cfg,
        &Metrics::new().unwrap(),
    );
    assert_eq!(profile.recent_activities.len(), 5);
    assert_eq!(profile.weekly_tss, 500);
    // 500 / 7 = 71.4
    assert_eq!(profile.atl, 71);
    assert_eq!(profile.ctl, 12);
    assert_eq!(profile.tsb, -59);
}

struct FlakySource {
    inner: InMemoryStreamSource,
    broken: i64,
}

impl StreamSource for FlakySource {
    fn fetch_streams(&self, activity_id: i64) -> Result<Option<StreamsBundle>, StoreError> {
        if activity_id == self.broken {
            return Err(StoreError::Http("503 Service Unavailable".into()));
        }
        self.inner.fetch_streams(activity_id)
    }

    fn athlete_name(&self, _athlete_id: i64) -> Result<Option<String>, StoreError> {
        Err(StoreError::Http("timeout".into()))
    }
}

#[test]
fn failed_and_missing_streams_are_skipped() {
    let (mut activities, source) = daily_rides(3);
    // a ride that never had streams stored
    activities.push(ActivityRecord::new(1, "Commute", now() - Duration::days(1), 1200));
    let flaky = FlakySource { inner: source, broken: 1001 };
    let metrics = Metrics::new().unwrap();

    let profile = build_athlete_profile(
        ProfileInputs {
            athlete_id: 9,
            activities: &activities,
            ftp: 200.0,
            max_heart_rate: Some(185.0),
            now: now(),
            source: &flaky,
        },
        &EngineConfig::default(),
        &metrics,
    );

    let ids: Vec<i64> = profile.recent_activities.iter().map(|a| a.activity_id).collect();
    assert_eq!(ids, vec![1000, 1002]);
    assert_eq!(metrics.activities_analyzed.get(), 2);
    assert_eq!(metrics.activities_skipped.get(), 1);
    assert_eq!(metrics.stream_fetch_failures.get(), 1);
    assert_eq!(profile.weekly_tss, 200);
    assert_eq!(profile.athlete_name, "Athlete 9");
    assert_eq!(profile.max_hr, Some(185.0));
}

#[test]
fn athlete_name_from_source() {
    let mut source = InMemoryStreamSource::new();
    source.insert_athlete(3, "  Ada Rider ");
    let profile = build_athlete_profile(
        ProfileInputs {
            athlete_id: 3,
            activities: &[],
            ftp: 250.0,
            max_heart_rate: None,
            now: now(),
            source: &source,
        },
        &EngineConfig::default(),
        &Metrics::new().unwrap(),
    );
    assert_eq!(profile.athlete_name, "Ada Rider");
    assert!(profile.recent_activities.is_empty());
    assert_eq!((profile.ctl, profile.atl, profile.tsb), (0, 0, 0));
}
