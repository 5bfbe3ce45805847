use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::types::StreamsBundle;

/// Where stored activity streams come from (hosted table, local files, memory).
///
/// `Ok(None)` means the activity has no stored streams, which is normal.
/// `Err` means the lookup itself failed.
pub trait StreamSource {
    fn fetch_streams(&self, activity_id: i64) -> Result<Option<StreamsBundle>, StoreError>;

    /// Which of `ids` have stored streams.
    fn available_activity_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        let mut out = Vec::new();
        for &id in ids {
            if self.fetch_streams(id)?.is_some() {
                out.push(id);
            }
        }
        Ok(out)
    }

    /// Display name of an athlete, if the source knows it.
    fn athlete_name(&self, _athlete_id: i64) -> Result<Option<String>, StoreError> {
        Ok(None)
    }
}

/// Ids among `ids` with stored streams. Store failures are logged and give an empty list.
pub fn check_streams_availability(source: &dyn StreamSource, ids: &[i64]) -> Vec<i64> {
    if ids.is_empty() {
        return Vec::new();
    }
    match source.available_activity_ids(ids) {
        Ok(found) => found,
        Err(e) => {
            log::error!("stream availability check failed for {} ids: {e}", ids.len());
            Vec::new()
        }
    }
}

/// Streams kept in memory, e.g. rows already fetched by the caller.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStreamSource {
    bundles: HashMap<i64, StreamsBundle>,
    athletes: HashMap<i64, String>,
}

impl InMemoryStreamSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bundle: StreamsBundle) {
        self.bundles.insert(bundle.activity_id, bundle);
    }

    pub fn insert_athlete(&mut self, athlete_id: i64, name: &str) {
        self.athletes.insert(athlete_id, name.to_string());
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl FromIterator<StreamsBundle> for InMemoryStreamSource {
    fn from_iter<I: IntoIterator<Item = StreamsBundle>>(iter: I) -> Self {
        let mut src = Self::new();
        for b in iter {
            src.insert(b);
        }
        src
    }
}

impl StreamSource for InMemoryStreamSource {
    fn fetch_streams(&self, activity_id: i64) -> Result<Option<StreamsBundle>, StoreError> {
        Ok(self.bundles.get(&activity_id).cloned())
    }

    fn available_activity_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        Ok(ids.iter().copied().filter(|id| self.bundles.contains_key(id)).collect())
    }

    fn athlete_name(&self, athlete_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self.athletes.get(&athlete_id).cloned())
    }
}

/// One JSON file per activity: `<dir>/<activity_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStreamSource {
    dir: PathBuf,
}

impl JsonDirStreamSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, activity_id: i64) -> PathBuf {
        self.dir.join(format!("{activity_id}.json"))
    }

    /// Writes the bundle as pretty JSON, creating the directory if needed.
    pub fn save_streams(&self, bundle: &StreamsBundle) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(bundle.activity_id);
        let json = serde_json::to_string_pretty(bundle)?;
        std::fs::write(&path, json)?;
        log::debug!("streams for activity {} saved to {}", bundle.activity_id, path.display());
        Ok(path)
    }
}

impl StreamSource for JsonDirStreamSource {
    fn fetch_streams(&self, activity_id: i64) -> Result<Option<StreamsBundle>, StoreError> {
        let path = self.path_for(activity_id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let mut bundle: StreamsBundle = serde_json::from_str(&contents)?;
        if bundle.activity_id == 0 {
            bundle.activity_id = activity_id;
        }
        Ok(Some(bundle))
    }

    fn available_activity_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        Ok(ids.iter().copied().filter(|id| self.path_for(*id).exists()).collect())
    }
}
