use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    Config, WeatherError,
    config::DEFAULT_FALLBACK_CITY,
    model::{Coordinates, LocationQuery, WeatherReport},
    provider::WeatherDataProvider,
};

/// What to do with coordinates outside [-90, 90] x [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinatePolicy {
    /// Fail with [`WeatherError::InvalidCoordinates`].
    #[default]
    Reject,
    /// Clamp each axis into range.
    Clamp,
    /// Forward untouched and let the provider decide.
    PassThrough,
}

impl CoordinatePolicy {
    pub fn apply(&self, coordinates: Coordinates) -> Result<Coordinates, WeatherError> {
        if coordinates.is_in_range() {
            return Ok(coordinates);
        }

        match self {
            CoordinatePolicy::Reject => Err(WeatherError::InvalidCoordinates {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            }),
            CoordinatePolicy::Clamp => Ok(coordinates.clamped()),
            CoordinatePolicy::PassThrough => Ok(coordinates),
        }
    }
}

/// Result of asking the host for the user's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeolocationOutcome {
    Located(Coordinates),
    Denied,
    Unsupported,
}

/// Validates searches and forwards them to a provider.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherDataProvider>,
    timeout: Option<Duration>,
    coordinate_policy: CoordinatePolicy,
    fallback_city: String,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherDataProvider>) -> Self {
        Self {
            provider,
            timeout: None,
            coordinate_policy: CoordinatePolicy::default(),
            fallback_city: DEFAULT_FALLBACK_CITY.to_string(),
        }
    }

    pub fn from_config(provider: Box<dyn WeatherDataProvider>, config: &Config) -> Self {
        Self::new(provider)
            .with_timeout(config.timeout())
            .with_coordinate_policy(config.coordinate_policy)
            .with_fallback_city(config.fallback_city())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_coordinate_policy(mut self, policy: CoordinatePolicy) -> Self {
        self.coordinate_policy = policy;
        self
    }

    pub fn with_fallback_city(mut self, city: impl Into<String>) -> Self {
        self.fallback_city = city.into();
        self
    }

    pub fn fallback_city(&self) -> &str {
        &self.fallback_city
    }

    /// Search by the raw text the user typed. Blank input never reaches the provider.
    #[instrument(skip(self))]
    pub async fn search_city(&self, input: &str) -> Result<WeatherReport, WeatherError> {
        let city = input.trim();
        if city.is_empty() {
            debug!("rejecting blank city input");
            return Err(WeatherError::EmptyQuery);
        }

        self.run(LocationQuery::City(city.to_string())).await
    }

    #[instrument(skip(self))]
    pub async fn search_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        let coordinates = self.coordinate_policy.apply(coordinates).inspect_err(|err| {
            warn!(error = %err, "coordinates rejected");
        })?;

        self.run(LocationQuery::Coordinates(coordinates)).await
    }

    pub async fn search(&self, query: &LocationQuery) -> Result<WeatherReport, WeatherError> {
        match query {
            LocationQuery::City(name) => self.search_city(name).await,
            LocationQuery::Coordinates(c) => self.search_coordinates(*c).await,
        }
    }

    /// Initial load: the user's position when known, the fallback city otherwise.
    #[instrument(skip(self))]
    pub async fn load_default(
        &self,
        geolocation: GeolocationOutcome,
    ) -> Result<WeatherReport, WeatherError> {
        match geolocation {
            GeolocationOutcome::Located(coordinates) => self.search_coordinates(coordinates).await,
            GeolocationOutcome::Denied | GeolocationOutcome::Unsupported => {
                info!(city = %self.fallback_city, "geolocation unavailable, using fallback city");
                self.search_city(&self.fallback_city).await
            }
        }
    }

    async fn run(&self, query: LocationQuery) -> Result<WeatherReport, WeatherError> {
        debug!(%query, "fetching weather");

        let fetch = self.provider.fetch(&query);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.unwrap_or_else(|_| {
                Err(WeatherError::ProviderUnavailable(format!(
                    "no response within {}ms",
                    limit.as_millis()
                )))
            }),
            None => fetch.await,
        };

        match &result {
            Ok(report) => debug!(
                city = %report.current.city,
                condition = %report.current.condition,
                "weather received"
            ),
            Err(err) => warn!(%query, error = %err, "weather lookup failed"),
        }

        result
    }
}
