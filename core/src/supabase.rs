// core/src/supabase.rs
use std::time::Duration;

use serde::Deserialize;
use ureq::Agent;

use crate::config::EngineConfig;
use crate::error::{ConfigError, StoreError};
use crate::storage::StreamSource;
use crate::types::StreamsBundle;

#[derive(Debug, Clone, Deserialize)]
struct ActivityIdRow {
    activity_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct AthleteRow {
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
}

/// Reads `strava_streams` and `athletes` through the PostgREST API, blocking (ureq).
pub struct SupabaseStreamSource {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl SupabaseStreamSource {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self, ConfigError> {
        let (url, key) = cfg.supabase_credentials()?;
        Ok(Self::new(url, key, Duration::from_secs(cfg.http_timeout_secs)))
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{table}?{query}", self.base_url)
    }

    fn get_rows<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, StoreError> {
        let resp = self
            .agent
            .get(url)
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Accept", "application/json")
            .call()
            .map_err(|e| StoreError::Http(e.to_string()))?;
        resp.into_json::<Vec<T>>()
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

impl StreamSource for SupabaseStreamSource {
    fn fetch_streams(&self, activity_id: i64) -> Result<Option<StreamsBundle>, StoreError> {
        let url = self.table_url("strava_streams", &format!("activity_id=eq.{activity_id}&select=*&limit=1"));
        let rows: Vec<StreamsBundle> = self.get_rows(&url)?;
        log::debug!("strava_streams activity={activity_id} rows={}", rows.len());
        Ok(rows.into_iter().next())
    }

    fn available_activity_ids(&self, ids: &[i64]) -> Result<Vec<i64>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let list = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
        let url = self.table_url("strava_streams", &format!("activity_id=in.({list})&select=activity_id"));
        let rows: Vec<ActivityIdRow> = self.get_rows(&url)?;
        Ok(rows.into_iter().map(|r| r.activity_id).collect())
    }

    fn athlete_name(&self, athlete_id: i64) -> Result<Option<String>, StoreError> {
        let url = self.table_url("athletes", &format!("id=eq.{athlete_id}&select=firstname,lastname&limit=1"));
        let rows: Vec<AthleteRow> = self.get_rows(&url)?;
        Ok(rows.into_iter().next().and_then(|r| {
            let name = format!(
                "{} {}",
                r.firstname.unwrap_or_default(),
                r.lastname.unwrap_or_default()
            );
            let name = name.trim();
            if name.is_empty() { None } else { Some(name.to_string()) }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_strips_trailing_slash() {
        let src = SupabaseStreamSource::new("https://example.supabase.co/", "key", Duration::from_secs(1));
        assert_eq!(
            src.table_url("strava_streams", "activity_id=eq.7"),
            "https://example.supabase.co/rest/v1/strava_streams?activity_id=eq.7"
        );
    }

    #[test]
    fn from_config_requires_credentials() {
        let cfg = EngineConfig::default();
        assert!(matches!(
            SupabaseStreamSource::from_config(&cfg),
            Err(ConfigError::MissingField("supabase_url"))
        ));
    }
}
