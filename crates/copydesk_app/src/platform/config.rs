//! Startup configuration: environment first, command line flags on top.

use std::path::PathBuf;
use std::time::Duration;

use copydesk_engine::{ApiSettings, EngineSettings};
use copydesk_logging::{desk_info, desk_warn};

use crate::cli::Cli;

pub const ENV_API_BASE_URL: &str = "COPYDESK_API_BASE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "COPYDESK_POLL_INTERVAL_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "COPYDESK_REQUEST_TIMEOUT_MS";
pub const ENV_EXPORT_DIR: &str = "COPYDESK_EXPORT_DIR";

const DEFAULT_POLL_INTERVAL_MS: u64 = 1200;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` leaves every request failing with the network message.
    pub api_base_url: Option<String>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            export_dir: PathBuf::from("output"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; invalid numbers fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_base_url = lookup(ENV_API_BASE_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        let poll_interval = parse_millis(lookup(ENV_POLL_INTERVAL_MS), DEFAULT_POLL_INTERVAL_MS);
        let request_timeout =
            parse_millis(lookup(ENV_REQUEST_TIMEOUT_MS), DEFAULT_REQUEST_TIMEOUT_MS);
        let export_dir = lookup(ENV_EXPORT_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            api_base_url,
            poll_interval,
            request_timeout,
            export_dir,
        }
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(url) = cli.api_base_url.as_ref().filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url.trim().to_string());
        }
        if let Some(out) = &cli.out {
            self.export_dir = out.clone();
        }
        self
    }

    pub fn engine_settings(&self) -> EngineSettings {
        if self.api_base_url.is_none() {
            desk_warn!(
                "{} is not set; requests to the pipeline service will fail",
                ENV_API_BASE_URL
            );
        }
        desk_info!(
            "pipeline service {:?}, poll every {:?}, timeout {:?}, exports to {:?}",
            self.api_base_url,
            self.poll_interval,
            self.request_timeout,
            self.export_dir
        );
        EngineSettings {
            api: ApiSettings {
                base_url: self.api_base_url.clone().unwrap_or_default(),
                request_timeout: self.request_timeout,
                ..ApiSettings::default()
            },
            poll_interval: self.poll_interval,
            export_dir: self.export_dir.clone(),
        }
    }
}

/// Positive, finite millisecond counts only.
fn parse_millis(raw: Option<String>, default: u64) -> Duration {
    let millis = raw
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
        .map(|value| value.round().max(1.0) as u64)
        .unwrap_or(default);
    Duration::from_millis(millis)
}
