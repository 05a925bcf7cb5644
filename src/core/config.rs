//! Agent configuration.
//!
//! Values are read once at startup from the process environment, optionally
//! overridden from the command line, validated, and then passed around by
//! reference. Nothing mutates a `Config` after it is built.

use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::error::{HostwatchError, Result};

/// Cluster / correlation identifier used to label alerts
pub const ENV_CLUSTER_ID: &str = "CID";
/// Webhook destination for alerts
pub const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";
/// CPU usage percentage above which an alert is sent
pub const ENV_THRESHOLD: &str = "MAX";
/// Seconds to sleep between sampling cycles
pub const ENV_INTERVAL_SECS: &str = "HOSTWATCH_INTERVAL_SECS";
/// Seconds before an outbound webhook request is abandoned
pub const ENV_TIMEOUT_SECS: &str = "HOSTWATCH_TIMEOUT_SECS";

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of raw configuration values.
///
/// Production code reads the process environment; tests hand in a map.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads values from `std::env`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Command line values that take precedence over the environment
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub cluster_id: Option<String>,
    pub webhook_url: Option<String>,
    pub threshold: Option<String>,
    pub interval_secs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cluster_id: String,
    pub webhook_url: Url,
    pub threshold: f64,
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from `env`, letting `overrides` win where set
    pub fn load<E: EnvSource>(env: &E, overrides: &ConfigOverrides) -> Result<Self> {
        let lookup = |over: &Option<String>, key: &str| -> Option<String> {
            over.clone()
                .or_else(|| env.var(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cluster_id = lookup(&overrides.cluster_id, ENV_CLUSTER_ID)
            .ok_or_else(|| missing(ENV_CLUSTER_ID))?;

        let webhook_url = lookup(&overrides.webhook_url, ENV_WEBHOOK_URL)
            .ok_or_else(|| missing(ENV_WEBHOOK_URL))
            .and_then(|raw| parse_webhook_url(&raw))?;

        let threshold = lookup(&overrides.threshold, ENV_THRESHOLD)
            .ok_or_else(|| missing(ENV_THRESHOLD))
            .and_then(|raw| parse_threshold(&raw))?;

        let interval = match lookup(&overrides.interval_secs, ENV_INTERVAL_SECS) {
            Some(raw) => parse_seconds(ENV_INTERVAL_SECS, &raw)?,
            None => DEFAULT_INTERVAL,
        };

        let request_timeout = match lookup(&None, ENV_TIMEOUT_SECS) {
            Some(raw) => parse_seconds(ENV_TIMEOUT_SECS, &raw)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            cluster_id,
            webhook_url,
            threshold,
            interval,
            request_timeout,
        })
    }

    /// Host part of the webhook URL, safe to print in logs
    pub fn webhook_host(&self) -> &str {
        self.webhook_url.host_str().unwrap_or("<unknown>")
    }
}

fn missing(key: &str) -> HostwatchError {
    HostwatchError::config(format!("{} is not set", key))
}

/// Parse the CPU alert threshold. Must be a finite percentage in `0..=100`.
pub fn parse_threshold(raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        HostwatchError::config(format!("{} must be a number, got {:?}", ENV_THRESHOLD, raw))
    })?;

    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(HostwatchError::config(format!(
            "{} must be between 0 and 100, got {}",
            ENV_THRESHOLD, value
        )));
    }

    Ok(value)
}

/// Parse the webhook destination. Only http and https are accepted.
pub fn parse_webhook_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        HostwatchError::config(format!("{} is not a valid URL: {}", ENV_WEBHOOK_URL, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HostwatchError::config(format!(
            "{} must use http or https, got {}",
            ENV_WEBHOOK_URL, other
        ))),
    }
}

fn parse_seconds(key: &str, raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(HostwatchError::config(format!(
            "{} must be a positive number of seconds, got {:?}",
            key, raw
        ))),
    }
}
