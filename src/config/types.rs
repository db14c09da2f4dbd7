use std::time::Duration;

use serde::Deserialize;

use crate::collector::ProfilingKind;
use crate::error::ValidationError;
use crate::sinks::ReportConfig;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub serial: Option<String>,
    pub package: Option<String>,
    pub label: Option<String>,
    pub trials: Option<usize>,
    pub hold: Option<DurationValue>,
    pub kinds: Option<Vec<ProfilingKind>>,
    pub api_level: Option<u64>,
    pub adb_path: Option<String>,
    pub command_timeout: Option<DurationValue>,
    pub poll_interval: Option<DurationValue>,
    pub dedup_polls: Option<bool>,
    pub frame_budget_ms: Option<f64>,
    pub no_color: Option<bool>,
    pub report: Option<ReportConfig>,
}

/// A duration given either as whole seconds or as text such as `"500ms"`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
