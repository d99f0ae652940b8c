//! Client settings and log setup.

use std::path::PathBuf;
use std::time::Duration;

use plagcheck_transport::{ApiBase, BackendTimeouts, resolve_api_base};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::ClientError;

/// Detection service base URL.
pub const API_URL_ENV: &str = "PLAGCHECK_API_URL";
/// Health probe timeout in seconds.
pub const HEALTH_TIMEOUT_ENV: &str = "PLAGCHECK_HEALTH_TIMEOUT_SECS";
/// Detection timeout in seconds.
pub const DETECT_TIMEOUT_ENV: &str = "PLAGCHECK_DETECT_TIMEOUT_SECS";
/// Report download timeout in seconds.
pub const REPORT_TIMEOUT_ENV: &str = "PLAGCHECK_REPORT_TIMEOUT_SECS";
/// Directory where CSV reports are written.
pub const REPORT_DIR_ENV: &str = "PLAGCHECK_REPORT_DIR";
/// Log filter directives; setting it enables logging.
pub const LOG_ENV: &str = "PLAGCHECK_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Detection service base URL.
    pub api_base: ApiBase,
    /// Per-operation bounded waits.
    pub timeouts: BackendTimeouts,
    /// Report output directory.
    pub report_dir: PathBuf,
}

impl ClientSettings {
    /// Reads settings from the process environment. `api_url_flag` wins over
    /// [`API_URL_ENV`].
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidSetting`] when the chosen base URL is
    /// invalid.
    pub fn from_env(api_url_flag: Option<&str>) -> Result<Self, ClientError> {
        Self::from_lookup(api_url_flag, |key| std::env::var(key).ok())
    }

    /// Same as [`ClientSettings::from_env`] with an injectable lookup.
    ///
    /// Unparseable or zero timeouts fall back to their defaults with a
    /// warning.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidSetting`] when the chosen base URL is
    /// invalid.
    pub fn from_lookup(
        api_url_flag: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let env_url = lookup(API_URL_ENV);
        let api_base = resolve_api_base(api_url_flag, env_url.as_deref()).map_err(|error| {
            ClientError::InvalidSetting {
                key: API_URL_ENV,
                reason: error.to_string(),
            }
        })?;

        let defaults = BackendTimeouts::default();
        let timeouts = BackendTimeouts {
            health: seconds(&lookup, HEALTH_TIMEOUT_ENV, defaults.health),
            detection: seconds(&lookup, DETECT_TIMEOUT_ENV, defaults.detection),
            report: seconds(&lookup, REPORT_TIMEOUT_ENV, defaults.report),
            tasks: defaults.tasks,
        };

        let report_dir = lookup(REPORT_DIR_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);

        Ok(Self {
            api_base,
            timeouts,
            report_dir,
        })
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            warn!(
                stage = "config",
                action = "fallback",
                key,
                value = %raw,
                "ignoring invalid timeout"
            );
            default
        }
    }
}

/// Installs the stderr log subscriber when `verbose` is set or
/// [`LOG_ENV`] is present. Returns `false` when logging stays off or a
/// subscriber was already installed.
pub fn init_logging(verbose: bool) -> bool {
    let directives = std::env::var(LOG_ENV).ok();
    if !verbose && directives.is_none() {
        return false;
    }

    let filter = directives
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let settings = ClientSettings::from_lookup(None, lookup_from(&[])).expect("defaults");
        assert_eq!(settings.api_base.as_str(), "http://localhost:8000");
        assert_eq!(settings.timeouts, BackendTimeouts::default());
        assert_eq!(settings.report_dir, PathBuf::from("."));
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let settings = ClientSettings::from_lookup(
            None,
            lookup_from(&[(HEALTH_TIMEOUT_ENV, "soon"), (DETECT_TIMEOUT_ENV, "0")]),
        )
        .expect("settings");
        assert_eq!(settings.timeouts.health, Duration::from_secs(10));
        assert_eq!(settings.timeouts.detection, Duration::from_secs(300));
    }
}
