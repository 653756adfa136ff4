//! View-level search lifecycle: Idle -> Loading -> Displaying | Error.
//!
//! Each submitted search gets a ticket. Only the most recently issued ticket
//! may change what is displayed; results for superseded searches are dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    model::{CurrentWeather, ViewModel, WeatherReport},
    presenter::{ForecastTile, WeatherPresenter},
};

/// Identifies one submitted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

/// Everything the view paints for a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    pub current: CurrentWeather,
    pub view: ViewModel,
    pub forecast: Vec<ForecastTile>,
    pub observed_at: DateTime<Utc>,
}

impl DisplayState {
    pub fn from_report(presenter: &WeatherPresenter, report: &WeatherReport) -> Self {
        Self {
            current: report.current.clone(),
            view: presenter.present(&report.current),
            forecast: presenter.present_forecast(&report.forecast),
            observed_at: report.observed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading(SearchTicket),
    Displaying(DisplayState),
    /// User-facing message.
    Error(&'static str),
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    state: SearchState,
    presenter: WeatherPresenter,
    next_ticket: u64,
    latest: Option<SearchTicket>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            state: SearchState::Idle,
            presenter: WeatherPresenter,
            next_ticket: 0,
            latest: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Loading(_))
    }

    /// Start a new search from any state, superseding one still in flight.
    pub fn submit(&mut self) -> SearchTicket {
        let ticket = SearchTicket(self.next_ticket);
        self.next_ticket += 1;

        if let Some(previous) = self.latest.filter(|_| self.is_loading()) {
            debug!(?previous, ?ticket, "superseding in-flight search");
        }

        self.latest = Some(ticket);
        self.state = SearchState::Loading(ticket);
        ticket
    }

    /// Apply a provider result. Returns false when the ticket was superseded
    /// and the result was dropped.
    pub fn resolve(
        &mut self,
        ticket: SearchTicket,
        result: Result<WeatherReport, WeatherError>,
    ) -> bool {
        if self.latest != Some(ticket) || !self.is_loading() {
            debug!(?ticket, latest = ?self.latest, "dropping stale search result");
            return false;
        }

        self.state = match result {
            Ok(report) => {
                SearchState::Displaying(DisplayState::from_report(&self.presenter, &report))
            }
            Err(err) => {
                if err.is_retrieval_failure() {
                    warn!(error = %err, "weather retrieval failed");
                } else {
                    debug!(error = %err, "search rejected");
                }
                SearchState::Error(err.user_message())
            }
        };
        true
    }

    /// Input rejected before any provider call (e.g. blank city).
    pub fn reject_input(&mut self, err: &WeatherError) {
        self.latest = None;
        self.state = SearchState::Error(err.user_message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastList, WeatherCondition};
    use chrono::NaiveDate;

    fn report(city: &str, condition: WeatherCondition) -> WeatherReport {
        WeatherReport {
            current: CurrentWeather {
                city: city.into(),
                country: "Demo".into(),
                temperature_c: 20,
                description: "Rainy".into(),
                condition,
                visibility: "10 km".into(),
                humidity_pct: 60,
                wind_speed_kmh: 9,
                feels_like_c: 21,
            },
            forecast: ForecastList::from_days(
                NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
                [(WeatherCondition::Clear, 22), (WeatherCondition::Rain, 18)],
            ),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn starts_idle() {
        assert_eq!(SearchSession::new().state(), &SearchState::Idle);
    }

    #[test]
    fn success_moves_to_displaying() {
        let mut session = SearchSession::new();
        let ticket = session.submit();
        assert!(session.is_loading());

        assert!(session.resolve(ticket, Ok(report("Paris", WeatherCondition::Rain))));

        let SearchState::Displaying(display) = session.state() else {
            panic!("expected Displaying, got {:?}", session.state());
        };
        assert_eq!(display.current.city, "Paris");
        assert_eq!(display.view.icon_glyph_id, "cloud-rain");
        assert_eq!(display.view.animation_class, "rainy");
        assert_eq!(display.forecast[0].day, "Today");
        assert_eq!(display.forecast[1].icon_glyph_id, "cloud-rain");
    }

    #[test]
    fn failure_moves_to_error_with_single_message() {
        let mut session = SearchSession::new();
        let ticket = session.submit();
        session.resolve(ticket, Err(WeatherError::LocationNotFound("Nowhere".into())));
        assert_eq!(session.state(), &SearchState::Error("Weather data not available"));

        let ticket = session.submit();
        session.resolve(ticket, Err(WeatherError::ProviderUnavailable("down".into())));
        assert_eq!(session.state(), &SearchState::Error("Weather data not available"));
    }

    #[test]
    fn invalid_coordinates_keep_their_own_message() {
        let mut session = SearchSession::new();
        let ticket = session.submit();
        let err = WeatherError::InvalidCoordinates { latitude: 91.0, longitude: 0.0 };
        assert!(!err.is_retrieval_failure());

        assert!(session.resolve(ticket, Err(err)));
        assert_eq!(session.state(), &SearchState::Error("Invalid coordinates"));
    }

    #[test]
    fn empty_input_rejection_moves_to_error() {
        let mut session = SearchSession::new();
        session.reject_input(&WeatherError::EmptyQuery);
        assert_eq!(session.state(), &SearchState::Error("Please enter a city name"));
    }

    #[test]
    fn later_submission_wins_even_if_earlier_resolves_last() {
        let mut session = SearchSession::new();
        let first = session.submit();
        let second = session.submit();

        assert!(session.resolve(second, Ok(report("Rome", WeatherCondition::Clear))));
        assert!(!session.resolve(first, Ok(report("Oslo", WeatherCondition::Snow))));

        let SearchState::Displaying(display) = session.state() else {
            panic!("expected Displaying");
        };
        assert_eq!(display.current.city, "Rome");
    }

    #[test]
    fn stale_result_while_newer_search_loading_is_dropped() {
        let mut session = SearchSession::new();
        let first = session.submit();
        let second = session.submit();

        assert!(!session.resolve(first, Ok(report("Oslo", WeatherCondition::Snow))));
        assert_eq!(session.state(), &SearchState::Loading(second));
    }

    #[test]
    fn displaying_and_error_return_to_loading_on_submit() {
        let mut session = SearchSession::new();
        let t = session.submit();
        session.resolve(t, Ok(report("Paris", WeatherCondition::Clouds)));
        session.submit();
        assert!(session.is_loading());

        session.reject_input(&WeatherError::EmptyQuery);
        let t = session.submit();
        assert_eq!(session.state(), &SearchState::Loading(t));
    }

    #[test]
    fn resolving_twice_is_ignored() {
        let mut session = SearchSession::new();
        let t = session.submit();
        assert!(session.resolve(t, Ok(report("Paris", WeatherCondition::Clear))));
        assert!(!session.resolve(t, Err(WeatherError::ProviderUnavailable("late".into()))));
        assert!(matches!(session.state(), SearchState::Displaying(_)));
    }
}
