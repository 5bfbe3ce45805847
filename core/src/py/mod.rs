// PyO3 binding. Thin wrappers over json_api; all parsing and errors live there.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::config::{load_config, EngineConfig};
use crate::json_api;
use crate::storage::{check_streams_availability, InMemoryStreamSource};
use crate::telemetry::Metrics;

fn config_from(path: Option<&str>) -> PyResult<EngineConfig> {
    let mut cfg = match path {
        Some(p) => load_config(p).map_err(|e| PyValueError::new_err(e.to_string()))?,
        None => EngineConfig::default(),
    };
    cfg.apply_env_overrides()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(cfg)
}

#[pyfunction]
fn analyze_activity_json(json_in: &str) -> PyResult<String> {
    let out = json_api::analyze_activity_json(json_in).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Metrics::global().activities_analyzed.inc();
    Ok(out)
}

#[pyfunction]
#[pyo3(signature = (json_in, config_path=None))]
fn build_period_report_json(json_in: &str, config_path: Option<&str>) -> PyResult<String> {
    let cfg = config_from(config_path)?;
    json_api::build_period_report_json(json_in, &cfg).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
#[pyo3(signature = (json_in, config_path=None))]
fn performance_management_json(json_in: &str, config_path: Option<&str>) -> PyResult<String> {
    let cfg = config_from(config_path)?;
    json_api::performance_management_json(json_in, &cfg).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn power_zones_json(ftp: f64) -> PyResult<String> {
    json_api::power_zones_json(ftp).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Ids (of `ids`) present in a JSON array of stored stream rows.
#[pyfunction]
fn streams_available(rows_json: &str, ids: Vec<i64>) -> PyResult<Vec<i64>> {
    let rows: Vec<crate::StreamsBundle> =
        json_api::parse_json(rows_json, "Vec<StreamsBundle>").map_err(|e| PyValueError::new_err(e.to_string()))?;
    let source: InMemoryStreamSource = rows.into_iter().collect();
    Ok(check_streams_availability(&source, &ids))
}

#[pyfunction]
fn metrics_text() -> PyResult<String> {
    Metrics::global()
        .encode_text()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn ridepower_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_activity_json, m)?)?;
    m.add_function(wrap_pyfunction!(build_period_report_json, m)?)?;
    m.add_function(wrap_pyfunction!(performance_management_json, m)?)?;
    m.add_function(wrap_pyfunction!(power_zones_json, m)?)?;
    m.add_function(wrap_pyfunction!(streams_available, m)?)?;
    m.add_function(wrap_pyfunction!(metrics_text, m)?)?;
    Ok(())
}
