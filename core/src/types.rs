use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stream channels we know how to read from a streams bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
    Watts,
    HeartRate,
    Cadence,
    Velocity,
    Altitude,
    Grade,
    Time,
    Temperature,
}

impl StreamType {
    pub const ALL: [StreamType; 8] = [
        StreamType::Watts,
        StreamType::HeartRate,
        StreamType::Cadence,
        StreamType::Velocity,
        StreamType::Altitude,
        StreamType::Grade,
        StreamType::Time,
        StreamType::Temperature,
    ];

    /// Key used for the channel in stored stream rows.
    pub fn key(self) -> &'static str {
        match self {
            StreamType::Watts => "watts",
            StreamType::HeartRate => "heartrate",
            StreamType::Cadence => "cadence",
            StreamType::Velocity => "velocity_smooth",
            StreamType::Altitude => "altitude",
            StreamType::Grade => "grade_smooth",
            StreamType::Time => "time",
            StreamType::Temperature => "temp",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

/// One recorded channel (e.g. all watts samples of a ride, 1 Hz).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamData {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Stored streams for one activity.
///
/// `ftp` and `max_heartrate` are the thresholds that were in effect when the
/// activity was recorded. They win over the athlete's current settings.
/// `strava_zones` is carried through to the analysis untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamsBundle {
    #[serde(default)]
    pub activity_id: i64,
    #[serde(default)]
    pub streams: Vec<StreamData>,
    #[serde(default)]
    pub ftp: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strava_zones: Option<Value>,
}

impl StreamsBundle {
    pub fn new(activity_id: i64) -> Self {
        Self { activity_id, ..Default::default() }
    }

    /// Samples for a channel, empty if the activity did not record it.
    pub fn series(&self, kind: StreamType) -> &[f64] {
        self.streams
            .iter()
            .find(|s| s.kind == kind.key())
            .map(|s| s.data.as_slice())
            .unwrap_or(&[])
    }

    /// Builder-style setter; replaces an existing channel of the same type.
    pub fn with_series(mut self, kind: StreamType, data: Vec<f64>) -> Self {
        self.streams.retain(|s| s.kind != kind.key());
        self.streams.push(StreamData {
            kind: kind.key().to_string(),
            data,
            ..Default::default()
        });
        self
    }

    pub fn with_recorded_ftp(mut self, ftp: f64) -> Self {
        self.ftp = Some(ftp);
        self
    }

    pub fn with_recorded_max_heartrate(mut self, max_hr: f64) -> Self {
        self.max_heartrate = Some(max_hr);
        self
    }

    /// FTP stored with the activity, if it is usable (> 0).
    pub fn recorded_ftp(&self) -> Option<f64> {
        self.ftp.filter(|f| *f > 0.0)
    }

    pub fn recorded_max_heartrate(&self) -> Option<f64> {
        self.max_heartrate.filter(|h| *h > 0.0)
    }

    /// True when every known, non-empty channel has the same length.
    pub fn is_aligned(&self) -> bool {
        let mut lens = StreamType::ALL
            .into_iter()
            .map(|t| self.series(t).len())
            .filter(|n| *n > 0);
        match lens.next() {
            Some(first) => lens.all(|n| n == first),
            None => true,
        }
    }

    /// Channel types present in the row that this crate does not read.
    pub fn unknown_stream_types(&self) -> Vec<&str> {
        self.streams
            .iter()
            .map(|s| s.kind.as_str())
            .filter(|k| StreamType::from_key(k).is_none())
            .collect()
    }
}

/// Activity summary as synced from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub start_date: DateTime<Utc>,
    /// Wall-clock start time. The provider tags it as UTC even though it is local.
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,
    #[serde(default)]
    pub moving_time: u32,
    #[serde(default)]
    pub average_watts: Option<f64>,
    #[serde(default)]
    pub max_watts: Option<f64>,
    #[serde(default)]
    pub kilojoules: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>, // meter
    #[serde(default)]
    pub device_watts: Option<bool>,
}

impl ActivityRecord {
    pub fn new(id: i64, name: &str, start_date: DateTime<Utc>, moving_time: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            start_date,
            start_date_local: None,
            moving_time,
            average_watts: None,
            max_watts: None,
            kilojoules: None,
            distance: None,
            device_watts: None,
        }
    }

    /// Calendar day used for daily load totals: local day when known, else the UTC day.
    pub fn calendar_day(&self) -> NaiveDate {
        self.start_date_local.unwrap_or(self.start_date).date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLoadSummary {
    pub np: u32,
    pub avg_power: u32,
    pub max_power: u32,
    #[serde(rename = "if")]
    pub intensity_factor: f64,
    pub tss: f64,
    #[serde(rename = "vi")]
    pub variability_index: f64,
    pub duration: u32,
    pub kilojoules: u32,
}

/// Time spent in one power or heart-rate zone.
/// `average` is watts for power zones and bpm for heart-rate zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDistribution {
    pub zone: u8,
    pub name: String,
    pub time_in_zone: u32,
    pub percentage_time: f64,
    pub average: u32,
    pub color: String,
}

/// Raw series handed back for charting. Optional channels are omitted when not recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub watts: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartrate: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPowerAnalysis {
    pub activity_id: i64,
    pub activity_name: String,
    pub date: DateTime<Utc>,
    /// FTP actually used (recorded with the activity, or the current setting).
    pub ftp: f64,
    #[serde(rename = "max_heartrate", default, skip_serializing_if = "Option::is_none")]
    pub max_heartrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strava_zones: Option<Value>,
    pub training_load: TrainingLoadSummary,
    pub power_zones: Vec<ZoneDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr_zones: Option<Vec<ZoneDistribution>>,
    pub time_series_data: TimeSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthletePowerProfile {
    pub athlete_id: i64,
    pub athlete_name: String,
    pub ftp: f64,
    #[serde(rename = "maxHR", default, skip_serializing_if = "Option::is_none")]
    pub max_hr: Option<f64>,
    #[serde(rename = "weeklyTSS")]
    pub weekly_tss: u32,
    #[serde(rename = "monthlyTSS")]
    pub monthly_tss: u32,
    pub ctl: u32,
    pub atl: u32,
    pub tsb: i32,
    pub recent_activities: Vec<ActivityPowerAnalysis>,
}
