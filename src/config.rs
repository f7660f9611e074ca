use std::path::PathBuf;

use tracing::warn;

use crate::calendar::CancelPolicy;
use crate::engine::EngineOptions;
use crate::limits::DEFAULT_HORIZON_HOURS;

pub const SNAPSHOT_FILE: &str = "spaces.snap";

/// Process settings, read from `SPACEBOOK_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub metrics_port: Option<u16>,
    pub cancel_policy: CancelPolicy,
    pub horizon_hours: u64,
    /// Write a JSON copy of every space here after loading.
    pub export_json: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            metrics_port: None,
            cancel_policy: CancelPolicy::default(),
            horizon_hours: DEFAULT_HORIZON_HOURS,
            export_json: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Values that fail to parse keep their
    /// default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: lookup("SPACEBOOK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            metrics_port: lookup("SPACEBOOK_METRICS_PORT")
                .and_then(|s| parse_or_warn("SPACEBOOK_METRICS_PORT", &s)),
            cancel_policy: lookup("SPACEBOOK_CANCEL_POLICY")
                .and_then(|s| parse_or_warn("SPACEBOOK_CANCEL_POLICY", &s))
                .unwrap_or(defaults.cancel_policy),
            horizon_hours: lookup("SPACEBOOK_HORIZON_HOURS")
                .and_then(|s| parse_or_warn("SPACEBOOK_HORIZON_HOURS", &s))
                .unwrap_or(defaults.horizon_hours),
            export_json: lookup("SPACEBOOK_EXPORT_JSON")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            cancel_policy: self.cancel_policy,
            horizon_hours: self.horizon_hours,
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        warn!("ignoring unparseable {key}={value:?}");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.snapshot_path(), PathBuf::from("./data/spaces.snap"));
        assert_eq!(config.engine_options(), EngineOptions::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("SPACEBOOK_DATA_DIR", "/var/lib/spacebook"),
            ("SPACEBOOK_METRICS_PORT", "9100"),
            ("SPACEBOOK_CANCEL_POLICY", "Strict"),
            ("SPACEBOOK_HORIZON_HOURS", " 720 "),
            ("SPACEBOOK_EXPORT_JSON", "/tmp/spaces.json"),
        ]);
        assert_eq!(config.snapshot_path(), PathBuf::from("/var/lib/spacebook/spaces.snap"));
        assert_eq!(config.metrics_port, Some(9100));
        assert_eq!(config.export_json, Some(PathBuf::from("/tmp/spaces.json")));

        let options = config.engine_options();
        assert_eq!(options.cancel_policy, CancelPolicy::Strict);
        assert_eq!(options.horizon_hours, 720);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config(&[
            ("SPACEBOOK_METRICS_PORT", "99999"),
            ("SPACEBOOK_CANCEL_POLICY", "sometimes"),
            ("SPACEBOOK_HORIZON_HOURS", "-3"),
            ("SPACEBOOK_EXPORT_JSON", ""),
        ]);
        assert_eq!(config, Config::default());
    }
}
