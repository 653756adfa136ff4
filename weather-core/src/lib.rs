//! Core library for the weather widget.
//!
//! This crate defines:
//! - Shared data contracts (locations, current weather, forecast, view model)
//! - Abstraction over weather data providers, with a synthetic and a fixture-backed one
//! - The presenter mapping conditions to icons, animations and backgrounds
//! - Search orchestration and the view-level search state machine
//! - Configuration handling
//!
//! It is used by `weather-cli`, but carries no terminal or UI concerns itself.

pub mod config;
pub mod error;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod service;
pub mod session;

pub use config::{Config, FixtureSettings, MockSettings};
pub use error::WeatherError;
pub use model::{
    Coordinates, CurrentWeather, ForecastEntry, ForecastList, LocationQuery, ViewModel,
    WeatherCondition, WeatherReport,
};
pub use presenter::{ForecastTile, WeatherPresenter};
pub use provider::{ProviderId, WeatherDataProvider};
pub use service::{CoordinatePolicy, GeolocationOutcome, WeatherService};
pub use session::{DisplayState, SearchSession, SearchState, SearchTicket};
