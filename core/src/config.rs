use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_SUPABASE_URL: &str = "RIDEPOWER_SUPABASE_URL";
pub const ENV_SUPABASE_KEY: &str = "RIDEPOWER_SUPABASE_KEY";
pub const ENV_ACTIVITY_LIMIT: &str = "RIDEPOWER_ACTIVITY_LIMIT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Most recent activities analysed for an athlete profile.
    pub profile_activity_limit: usize,
    /// Days of PMC history returned for display.
    pub pmc_display_days: i64,
    /// FTP assumed by the period report when the athlete has none.
    pub report_default_ftp: f64,
    pub report_default_max_hr: f64,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub http_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile_activity_limit: 50,
            pmc_display_days: 90,
            report_default_ftp: 200.0,
            report_default_max_hr: 185.0,
            supabase_url: None,
            supabase_key: None,
            http_timeout_secs: 10,
        }
    }
}

impl EngineConfig {
    /// Overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|k| std::env::var(k).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SUPABASE_URL).filter(|v| !v.trim().is_empty()) {
            self.supabase_url = Some(url.trim().trim_end_matches('/').to_string());
        }
        if let Some(key) = lookup(ENV_SUPABASE_KEY).filter(|v| !v.trim().is_empty()) {
            self.supabase_key = Some(key.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_ACTIVITY_LIMIT) {
            self.profile_activity_limit = raw.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_ACTIVITY_LIMIT,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile_activity_limit == 0 {
            return Err(ConfigError::Invalid("profile_activity_limit must be at least 1"));
        }
        if self.pmc_display_days <= 0 {
            return Err(ConfigError::Invalid("pmc_display_days must be positive"));
        }
        if self.report_default_ftp <= 0.0 || self.report_default_max_hr <= 0.0 {
            return Err(ConfigError::Invalid("report defaults must be positive"));
        }
        Ok(())
    }

    /// Supabase URL and key, both required for the hosted store.
    pub fn supabase_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let url = self
            .supabase_url
            .as_deref()
            .ok_or(ConfigError::MissingField("supabase_url"))?;
        let key = self
            .supabase_key
            .as_deref()
            .ok_or(ConfigError::MissingField("supabase_key"))?;
        Ok((url, key))
    }
}

/// Reads config from JSON. A missing file gives the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("no config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let cfg: EngineConfig = serde_json::from_str(&contents)?;
    cfg.validate()?;
    log::debug!("config loaded from {}", path.display());
    Ok(cfg)
}

/// Writes config as pretty JSON.
pub fn save_config(cfg: &EngineConfig, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json)?;
    Ok(())
}
