use std::{fmt, str::FromStr};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of entries in every forecast strip (day 0 = today).
pub const FORECAST_DAYS: usize = 5;

/// A place the user asked about.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn clamped(&self) -> Self {
        Self {
            latitude: self.latitude.clamp(-90.0, 90.0),
            longitude: self.longitude.clamp(-180.0, 180.0),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Closed set of weather states used to pick icons and themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    PartlyCloudy,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Clouds => "clouds",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Thunderstorm => "thunderstorm",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Mist => "mist",
            WeatherCondition::PartlyCloudy => "partly-cloudy",
        }
    }

    pub const fn all() -> &'static [WeatherCondition] {
        &[
            WeatherCondition::Clear,
            WeatherCondition::Clouds,
            WeatherCondition::Rain,
            WeatherCondition::Thunderstorm,
            WeatherCondition::Snow,
            WeatherCondition::Mist,
            WeatherCondition::PartlyCloudy,
        ]
    }

    /// Parse a raw condition code, falling back to `Clear` for anything unknown.
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or(WeatherCondition::Clear)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weather condition '{0}'")]
pub struct UnknownCondition(pub String);

impl FromStr for WeatherCondition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        WeatherCondition::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownCondition(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature_c: i32,
    pub description: String,
    pub condition: WeatherCondition,
    /// Display string, e.g. "10 km".
    pub visibility: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: u32,
    pub feels_like_c: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub day: String,
    pub condition: WeatherCondition,
    pub temperature_c: i32,
}

/// Chronological forecast strip, index 0 is today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastList(Vec<ForecastEntry>);

impl ForecastList {
    /// Build a list from per-day (condition, temperature) pairs, labelling
    /// entry i with the day at offset i from `today`.
    pub fn from_days(
        today: NaiveDate,
        days: impl IntoIterator<Item = (WeatherCondition, i32)>,
    ) -> Self {
        let entries = days
            .into_iter()
            .enumerate()
            .map(|(offset, (condition, temperature_c))| ForecastEntry {
                day: day_label(today, offset),
                condition,
                temperature_c,
            })
            .collect();
        Self(entries)
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastEntry> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ForecastList {
    type Item = &'a ForecastEntry;
    type IntoIter = std::slice::Iter<'a, ForecastEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// "Today", "Tomorrow", then the short weekday name ("Wed", "Thu", ...).
pub fn day_label(today: NaiveDate, offset: usize) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n => {
            let date = today
                .checked_add_days(Days::new(n as u64))
                .unwrap_or(today);
            date.format("%a").to_string()
        }
    }
}

/// Everything one provider call yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: ForecastList,
    pub observed_at: DateTime<Utc>,
}

/// Presentation directives derived from a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub icon_glyph_id: &'static str,
    pub animation_class: &'static str,
    pub background_gradient_id: &'static str,
}
