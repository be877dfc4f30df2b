//! Watcher configuration.
//!
//! Settings come from an optional TOML file overridden by `FLEETWATCH_*`
//! environment variables (e.g. `FLEETWATCH_BASE_URL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Configuration for the fleet watcher.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Base URL of the fleet API.
    pub base_url: String,
    /// Delay in seconds between the end of one poll cycle and the next.
    pub cadence_secs: u64,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Where the bearer token is persisted. Unset means in-memory only.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl WatchConfig {
    /// Load configuration, layering defaults, an optional file, and env vars.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", "http://localhost:8000")?
            .set_default("cadence_secs", 2_u64)?
            .set_default("timeout_secs", 10_u64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        let config = builder
            .add_source(Environment::with_prefix("FLEETWATCH").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_secs(self.cadence_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = WatchConfig::load(None).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.cadence(), Duration::from_secs(2));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.token_file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
base_url = "http://plant.local:8000"
cadence_secs = 5
token_file = "/var/lib/fleetwatch/token"
"#
        )
        .unwrap();

        let config = WatchConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://plant.local:8000");
        assert_eq!(config.cadence(), Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.token_file.as_deref(),
            Some(Path::new("/var/lib/fleetwatch/token"))
        );
    }
}
