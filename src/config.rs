use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use pkgstat_fetch::{DEFAULT_MIRROR, DEFAULT_TIMEOUT};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/pkgstat.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub network: Option<NetworkConfig>,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "NetworkConfig::default_mirror")]
    pub mirror: String,
    /// Seconds
    #[serde(default = "NetworkConfig::default_timeout")]
    pub timeout: u64,
}

impl NetworkConfig {
    pub fn default_mirror() -> String {
        DEFAULT_MIRROR.to_string()
    }

    pub const fn default_timeout() -> u64 {
        DEFAULT_TIMEOUT.as_secs()
    }
}

impl Config {
    /// Read the config file at `path`, or at [`DEFAULT_CONFIG_PATH`] when `None`
    ///
    /// A missing default config file is not an error.
    pub fn read(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        match std::fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if !explicit && e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config file {}", path.display()))
            }
        }
    }

    pub fn mirror(&self) -> &str {
        self.network
            .as_ref()
            .map(|x| x.mirror.as_str())
            .unwrap_or(DEFAULT_MIRROR)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.network
                .as_ref()
                .map(|x| x.timeout)
                .unwrap_or_else(NetworkConfig::default_timeout),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mirror(), DEFAULT_MIRROR);
        assert_eq!(config.timeout(), Duration::from_secs(20));

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mirror(), DEFAULT_MIRROR);
    }

    #[test]
    fn test_partial_network() {
        let config: Config = toml::from_str("[network]\ntimeout = 5\n").unwrap();
        assert_eq!(config.mirror(), DEFAULT_MIRROR);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_full_network() {
        let config: Config = toml::from_str(
            r#"
[network]
mirror = "http://deb.debian.org/debian/dists/bookworm/contrib"
timeout = 60
"#,
        )
        .unwrap();

        assert_eq!(
            config.mirror(),
            "http://deb.debian.org/debian/dists/bookworm/contrib"
        );
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_invalid() {
        assert!(toml::from_str::<Config>("[network]\ntimeout = \"soon\"\n").is_err());
    }

    #[test]
    fn test_read_explicit_missing() {
        let path = std::env::temp_dir().join("pkgstat-test-does-not-exist.toml");
        assert!(Config::read(Some(&path)).is_err());
    }

    #[test]
    fn test_read_file() {
        let path = std::env::temp_dir().join(format!("pkgstat-test-{}.toml", std::process::id()));
        std::fs::write(&path, "[network]\nmirror = \"http://localhost/main\"\n").unwrap();

        let config = Config::read(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.mirror(), "http://localhost/main");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }
}
