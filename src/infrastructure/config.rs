use crate::application::polling_view::PollSettings;
use serde::Deserialize;
use std::time::Duration;

pub const CONFIG_FILE: &str = "config/dashboard";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub server: ServerSettings,
    pub page: PageSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub history_path: String,
    pub prediction_path: String,
    pub request_timeout_ms: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            history_path: "/api/temperatures/".to_string(),
            prediction_path: "/api/temperature/predict/".to_string(),
            request_timeout_ms: None,
        }
    }
}

impl ApiSettings {
    pub fn history_url(&self) -> String {
        join_url(&self.base_url, &self.history_path)
    }

    pub fn prediction_url(&self) -> String {
        join_url(&self.base_url, &self.prediction_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub max_predictions: Option<usize>,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            max_predictions: None,
        }
    }
}

impl PollingSettings {
    pub fn to_poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.interval_ms.max(1)),
            max_predictions: self.max_predictions,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PageSettings {
    pub title: String,
    pub section_title: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: "Temperature Monitoring Dashboard".to_string(),
            section_title: "Temperature Monitoring".to_string(),
        }
    }
}

/// Built-in defaults overlaid by `config/dashboard.*` when present.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_from(CONFIG_FILE)
}

pub fn load_from(path: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Join a base URL and an endpoint path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
