use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Counters for the profile/report batch jobs.
///
/// Passed by reference to the functions that update it. The global instance
/// only exists for the Python binding, which has no place to keep one.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub activities_analyzed: IntCounter,
    pub activities_skipped: IntCounter,
    pub stream_fetch_failures: IntCounter,
}

static GLOBAL: Lazy<Metrics> =
    Lazy::new(|| Metrics::new().expect("metric names are static and valid"));

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let activities_analyzed = IntCounter::new(
            "ridepower_activities_analyzed_total",
            "Activities turned into a power analysis",
        )?;
        let activities_skipped = IntCounter::new(
            "ridepower_activities_skipped_total",
            "Activities skipped because no streams were stored",
        )?;
        let stream_fetch_failures = IntCounter::new(
            "ridepower_stream_fetch_failures_total",
            "Stream fetches that failed and were skipped",
        )?;
        registry.register(Box::new(activities_analyzed.clone()))?;
        registry.register(Box::new(activities_skipped.clone()))?;
        registry.register(Box::new(stream_fetch_failures.clone()))?;
        Ok(Self {
            registry,
            activities_analyzed,
            activities_skipped,
            stream_fetch_failures,
        })
    }

    pub fn global() -> &'static Metrics {
        &GLOBAL
    }

    /// Prometheus text exposition of all counters.
    pub fn encode_text(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let m = Metrics::new().unwrap();
        m.activities_analyzed.inc();
        m.stream_fetch_failures.inc_by(2);
        let text = m.encode_text().unwrap();
        assert!(text.contains("ridepower_activities_analyzed_total 1"));
        assert!(text.contains("ridepower_stream_fetch_failures_total 2"));
    }
}
