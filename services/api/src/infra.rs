use loan_engine::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read a loan request document from disk.
pub(crate) fn load_request(path: &Path) -> Result<Value, AppError> {
    let raw = fs::read_to_string(path)?;
    let request = serde_json::from_str(&raw)?;
    Ok(request)
}
