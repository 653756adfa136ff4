use std::{fs, path::Path};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::{
    WeatherError,
    model::{
        Coordinates, CurrentWeather, FORECAST_DAYS, ForecastList, WeatherCondition, WeatherReport,
    },
    provider::non_empty_city,
};

use super::WeatherDataProvider;

/// Coordinate match tolerance in degrees, applied to both axes.
const COORDINATE_TOLERANCE: f64 = 0.1;

/// Serves canned reports from a JSON document of stations.
///
/// Raw condition codes in the document are adapted leniently: anything the
/// widget does not know becomes `clear`.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    stations: Vec<FxStation>,
    today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
struct FxDocument {
    stations: Vec<FxStation>,
}

#[derive(Debug, Clone, Deserialize)]
struct FxStation {
    city: String,
    country: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    temperature_c: i32,
    description: String,
    condition: String,
    #[serde(default = "default_visibility")]
    visibility: String,
    humidity_pct: u8,
    wind_speed_kmh: u32,
    feels_like_c: i32,
    #[serde(default)]
    forecast: Vec<FxForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
struct FxForecastDay {
    condition: String,
    temperature_c: i32,
}

fn default_visibility() -> String {
    "10 km".to_string()
}

impl FixtureProvider {
    /// Parse a fixture document. Malformed JSON, or a station whose forecast
    /// is not exactly `FORECAST_DAYS` long, is reported as the provider being
    /// unavailable.
    pub fn from_json(json: &str) -> Result<Self, WeatherError> {
        let doc: FxDocument = serde_json::from_str(json).map_err(|e| {
            WeatherError::ProviderUnavailable(format!("malformed fixture document: {e}"))
        })?;

        if let Some(station) = doc.stations.iter().find(|s| s.forecast.len() != FORECAST_DAYS) {
            return Err(WeatherError::ProviderUnavailable(format!(
                "station '{}' has {} forecast days, expected {FORECAST_DAYS}",
                station.city,
                station.forecast.len()
            )));
        }

        Ok(Self { stations: doc.stations, today: None })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;

        let provider = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse fixture file: {}", path.display()))?;

        debug!(path = %path.display(), stations = provider.stations.len(), "loaded fixture");
        Ok(provider)
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    fn report_for(&self, station: &FxStation) -> WeatherReport {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());

        let current = CurrentWeather {
            city: station.city.clone(),
            country: station.country.clone(),
            temperature_c: station.temperature_c,
            description: station.description.clone(),
            condition: WeatherCondition::from_code_or_default(&station.condition),
            visibility: station.visibility.clone(),
            humidity_pct: station.humidity_pct,
            wind_speed_kmh: station.wind_speed_kmh,
            feels_like_c: station.feels_like_c,
        };

        let forecast = ForecastList::from_days(
            today,
            station
                .forecast
                .iter()
                .map(|d| (WeatherCondition::from_code_or_default(&d.condition), d.temperature_c)),
        );

        WeatherReport { current, forecast, observed_at: Utc::now() }
    }
}

#[async_trait]
impl WeatherDataProvider for FixtureProvider {
    async fn fetch_by_city(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        let city = non_empty_city(name)?.to_lowercase();

        let station = self
            .stations
            .iter()
            .find(|s| s.city.trim().to_lowercase() == city)
            .ok_or_else(|| WeatherError::LocationNotFound(name.trim().to_string()))?;

        Ok(self.report_for(station))
    }

    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        let station = self
            .stations
            .iter()
            .find(|s| match (s.latitude, s.longitude) {
                (Some(lat), Some(lon)) => {
                    (lat - coordinates.latitude).abs() <= COORDINATE_TOLERANCE
                        && (lon - coordinates.longitude).abs() <= COORDINATE_TOLERANCE
                }
                _ => false,
            })
            .ok_or_else(|| WeatherError::LocationNotFound(coordinates.to_string()))?;

        Ok(self.report_for(station))
    }
}
