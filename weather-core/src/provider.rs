use crate::{
    Config, Coordinates, LocationQuery, WeatherError, WeatherReport,
    provider::{fixture::FixtureProvider, mock::MockProvider},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod fixture;
pub mod mock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Mock,
    Fixture,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Mock => "mock",
            ProviderId::Fixture => "fixture",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Mock, ProviderId::Fixture]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "mock" => Ok(ProviderId::Mock),
            "fixture" => Ok(ProviderId::Fixture),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: mock, fixture."
            )),
        }
    }
}

/// Source of weather data for a location.
///
/// Implementations must not cache or share state between calls; every
/// successful call hands back a freshly built report.
#[async_trait]
pub trait WeatherDataProvider: Send + Sync + Debug {
    /// Look up weather by city name. A blank name yields [`WeatherError::EmptyQuery`].
    async fn fetch_by_city(&self, name: &str) -> Result<WeatherReport, WeatherError>;

    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError>;

    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherReport, WeatherError> {
        match query {
            LocationQuery::City(name) => self.fetch_by_city(name).await,
            LocationQuery::Coordinates(c) => self.fetch_by_coordinates(*c).await,
        }
    }
}

/// Shared guard for the "blank city" contract.
pub(crate) fn non_empty_city(name: &str) -> Result<&str, WeatherError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::EmptyQuery);
    }
    Ok(trimmed)
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherDataProvider>> {
    let boxed: Box<dyn WeatherDataProvider> = match id {
        ProviderId::Mock => {
            let mut provider =
                MockProvider::new().with_delay(Duration::from_millis(config.mock.delay_ms));
            if let Some(seed) = config.mock.seed {
                provider = provider.with_seed(seed);
            }
            Box::new(provider)
        }
        ProviderId::Fixture => {
            let path = config.fixture.path.as_ref().ok_or_else(|| {
                anyhow::anyhow!(
                    "No fixture file configured for provider '{id}'.\n\
                     Hint: run `weather configure` and enter the path to a fixture JSON file."
                )
            })?;
            Box::new(FixtureProvider::from_path(path)?)
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherDataProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}
