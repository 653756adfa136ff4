use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{provider::ProviderId, service::CoordinatePolicy};

pub const DEFAULT_FALLBACK_CITY: &str = "London";

/// Settings for the synthetic provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockSettings {
    /// Artificial delay before a result is yielded.
    pub delay_ms: u64,
    /// Fixed RNG seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self { delay_ms: 1500, seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
    pub path: Option<PathBuf>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_provider = "mock"
/// fallback_city = "London"
/// timeout_secs = 10
/// coordinate_policy = "clamp"
///
/// [mock]
/// delay_ms = 1500
///
/// [fixture]
/// path = "/srv/weather/stations.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Optional default provider id, e.g. "mock" or "fixture".
    pub default_provider: Option<String>,

    /// City searched when geolocation is denied or unsupported.
    pub fallback_city: Option<String>,

    /// Upper bound on a single provider call; none means wait indefinitely.
    pub timeout_secs: Option<u64>,

    pub coordinate_policy: CoordinatePolicy,

    pub mock: MockSettings,

    pub fixture: FixtureSettings,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId, `mock` when unset.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s).with_context(|| {
                "Invalid default provider in config.\n\
                 Hint: run `weather configure` and pick one of the supported providers."
            }),
            None => Ok(ProviderId::Mock),
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn fallback_city(&self) -> &str {
        self.fallback_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_FALLBACK_CITY)
    }

    /// Provider timeout; `0` means none.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn defaults_when_nothing_configured() {
        let cfg = Config::default();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::Mock);
        assert_eq!(cfg.fallback_city(), "London");
        assert_eq!(cfg.timeout(), None);
        assert_eq!(cfg.coordinate_policy, CoordinatePolicy::Reject);
        assert_eq!(cfg.mock.delay_ms, 1500);
    }

    #[test]
    fn invalid_default_provider_is_reported() {
        let cfg = Config { default_provider: Some("nimbus".into()), ..Config::default() };
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("Invalid default provider"));
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::Fixture);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::Fixture);
    }

    #[test]
    fn blank_fallback_city_uses_london() {
        let cfg = Config { fallback_city: Some("  ".into()), ..Config::default() };
        assert_eq!(cfg.fallback_city(), "London");

        let cfg = Config { fallback_city: Some("Lisbon".into()), ..Config::default() };
        assert_eq!(cfg.fallback_city(), "Lisbon");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            timeout_secs = 5
            coordinate_policy = "clamp"

            [mock]
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(cfg.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.coordinate_policy, CoordinatePolicy::Clamp);
        assert_eq!(cfg.mock.seed, Some(7));
        assert_eq!(cfg.mock.delay_ms, 1500);
        assert!(cfg.fixture.path.is_none());
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg: Config = toml::from_str("timeout_secs = 0").unwrap();
        assert_eq!(cfg.timeout_secs, Some(0));
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn save_then_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::Fixture);
        cfg.fixture.path = Some(PathBuf::from("/tmp/stations.json"));
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }
}
