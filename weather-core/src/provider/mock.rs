use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::{
    WeatherError,
    model::{
        Coordinates, CurrentWeather, FORECAST_DAYS, ForecastList, WeatherCondition, WeatherReport,
    },
    provider::non_empty_city,
};

use super::WeatherDataProvider;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

const COORDINATES_CITY: &str = "Your Location";
const COUNTRY: &str = "Demo";
const VISIBILITY: &str = "10 km";

/// Conditions the current-weather card can show, paired with their description.
const CURRENT_CONDITIONS: &[(WeatherCondition, &str)] = &[
    (WeatherCondition::Clear, "Sunny"),
    (WeatherCondition::PartlyCloudy, "Partly Cloudy"),
    (WeatherCondition::Clouds, "Cloudy"),
    (WeatherCondition::Rain, "Rainy"),
];

const FORECAST_CONDITIONS: &[WeatherCondition] = &[
    WeatherCondition::Clear,
    WeatherCondition::Clouds,
    WeatherCondition::Rain,
    WeatherCondition::PartlyCloudy,
];

/// Synthetic provider: random values within fixed ranges after an artificial delay.
#[derive(Debug)]
pub struct MockProvider {
    delay: Duration,
    rng: Mutex<StdRng>,
    today: Option<NaiveDate>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            rng: Mutex::new(StdRng::from_os_rng()),
            today: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Pin the date used for forecast day labels instead of the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    async fn generate(&self, city: &str) -> WeatherReport {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let (condition, description) =
            CURRENT_CONDITIONS[rng.random_range(0..CURRENT_CONDITIONS.len())];

        let current = CurrentWeather {
            city: city.to_string(),
            country: COUNTRY.to_string(),
            temperature_c: rng.random_range(10..40),
            description: description.to_string(),
            condition,
            visibility: VISIBILITY.to_string(),
            humidity_pct: rng.random_range(30..80),
            wind_speed_kmh: rng.random_range(5..25),
            feels_like_c: rng.random_range(15..50),
        };

        let days: Vec<_> = (0..FORECAST_DAYS)
            .map(|_| {
                let condition = FORECAST_CONDITIONS[rng.random_range(0..FORECAST_CONDITIONS.len())];
                (condition, rng.random_range(15..40))
            })
            .collect();

        WeatherReport {
            current,
            forecast: ForecastList::from_days(today, days),
            observed_at: Utc::now(),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherDataProvider for MockProvider {
    async fn fetch_by_city(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        let city = non_empty_city(name)?;
        debug!(city, delay_ms = self.delay.as_millis() as u64, "generating mock weather");
        Ok(self.generate(city).await)
    }

    async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        // Coordinates are not validated or used here; callers own range checks.
        debug!(%coordinates, "generating mock weather for coordinates");
        Ok(self.generate(COORDINATES_CITY).await)
    }
}
