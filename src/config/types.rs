use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Contents of `volley.toml` / `volley.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub data: Option<String>,
    pub users: Option<u64>,
    pub ramp_up: Option<DurationValue>,
    pub spawn_rate: Option<u64>,
    pub duration: Option<DurationValue>,
    pub pacing_min: Option<DurationValue>,
    pub pacing_max: Option<DurationValue>,
    pub no_pacing: Option<bool>,
    pub channel_capacity: Option<usize>,
    pub status: Option<u16>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub grace: Option<DurationValue>,
    pub progress_interval: Option<DurationValue>,
    pub output_dir: Option<String>,
    pub scenario: Option<ScenarioConfig>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ScenarioConfig {
    pub steps: Vec<ScenarioStepConfig>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ScenarioStepConfig {
    /// Label reported for this step; defaults to the path.
    pub name: Option<String>,
    pub method: Option<String>,
    pub path: String,
    pub body: Option<String>,
}

/// A duration written either as whole seconds or as text with a unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self, field: &'static str) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ConfigError::InvalidDuration {
                        field,
                        message: "Duration must be > 0.".to_owned(),
                    })
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text)
                .map_err(|message| ConfigError::InvalidDuration { field, message }),
        }
    }
}
