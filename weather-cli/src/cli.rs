use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use tracing::debug;
use weather_core::{
    Config, Coordinates, GeolocationOutcome, ProviderId, SearchSession, SearchState,
    WeatherError, WeatherReport, WeatherService, provider,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Provider to use instead of the configured default ("mock" or "fixture").
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Give up on the provider after this many seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Print the rendered view as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively edit provider, fallback city and timing settings.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name.
        city: String,
    },

    /// Show weather for a latitude/longitude pair.
    Coords {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,

        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Initial load: use a known position, or fall back to the configured city.
    Locate {
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config),
            Command::Show { ref city } => {
                let service = self.service(&config)?;
                let result = service.search_city(city).await;
                self.display(result)
            }
            Command::Coords { latitude, longitude } => {
                let service = self.service(&config)?;
                let result =
                    service.search_coordinates(Coordinates::new(latitude, longitude)).await;
                self.display(result)
            }
            Command::Locate { lat, lon } => {
                let outcome = match (lat, lon) {
                    (Some(lat), Some(lon)) => {
                        GeolocationOutcome::Located(Coordinates::new(lat, lon))
                    }
                    _ => GeolocationOutcome::Denied,
                };
                let service = self.service(&config)?;
                let result = service.load_default(outcome).await;
                self.display(result)
            }
        }
    }

    fn service(&self, config: &Config) -> anyhow::Result<WeatherService> {
        let id = match self.provider.as_deref() {
            Some(name) => ProviderId::try_from(name)?,
            None => config.default_provider_id()?,
        };
        debug!(provider = %id, "building provider");

        let provider = provider::provider_from_config(id, config)?;
        let mut service = WeatherService::from_config(provider, config);
        if let Some(secs) = self.timeout_secs {
            service = service.with_timeout(timeout_from_secs(secs));
        }
        Ok(service)
    }

    /// Drive one search through the session and print whatever it settles on.
    fn display(&self, result: Result<WeatherReport, WeatherError>) -> anyhow::Result<()> {
        let mut session = SearchSession::new();
        let ticket = session.submit();

        match result {
            Err(err @ WeatherError::EmptyQuery) => session.reject_input(&err),
            other => {
                session.resolve(ticket, other);
            }
        }

        match session.state() {
            SearchState::Displaying(display) if self.json => {
                println!("{}", serde_json::to_string_pretty(display)?);
                Ok(())
            }
            SearchState::Displaying(display) => {
                print!("{}", render::display(display));
                Ok(())
            }
            SearchState::Error(message) => bail!("{message}"),
            SearchState::Idle | SearchState::Loading(_) => bail!("search did not complete"),
        }
    }
}

/// `--timeout-secs 0` turns the timeout off, matching the config file.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    Some(secs).filter(|s| *s > 0).map(Duration::from_secs)
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let current = config.default_provider_id()?;
    let start = ProviderId::all().iter().position(|id| *id == current).unwrap_or(0);

    let id = Select::new("Default provider:", ProviderId::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Provider selection cancelled")?;
    config.set_default_provider(id);

    let city = Text::new("Fallback city when location is unavailable:")
        .with_default(config.fallback_city())
        .prompt()
        .context("Fallback city prompt cancelled")?;
    config.fallback_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let timeout = CustomType::<u64>::new("Provider timeout in seconds (0 = none):")
        .with_default(config.timeout_secs.unwrap_or(0))
        .prompt()
        .context("Timeout prompt cancelled")?;
    config.timeout_secs = Some(timeout).filter(|t| *t > 0);

    match id {
        ProviderId::Mock => {
            config.mock.delay_ms = CustomType::<u64>::new("Artificial delay in milliseconds:")
                .with_default(config.mock.delay_ms)
                .prompt()
                .context("Delay prompt cancelled")?;
        }
        ProviderId::Fixture => {
            let default_path = config
                .fixture
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let path = Text::new("Path to fixture JSON file:")
                .with_default(&default_path)
                .prompt()
                .context("Fixture path prompt cancelled")?;
            config.fixture.path = Some(path.trim().into());
        }
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
