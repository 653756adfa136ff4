use thiserror::Error;

/// Failures a weather lookup can end in.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// City input was blank after trimming.
    #[error("City name must not be empty")]
    EmptyQuery,

    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Network failure, timeout or malformed provider data.
    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl WeatherError {
    /// True for the failures the provider itself reports; the view treats
    /// these as a single "unable to retrieve weather" case.
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(
            self,
            WeatherError::LocationNotFound(_) | WeatherError::ProviderUnavailable(_)
        )
    }

    /// Message shown to the user in the error notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::EmptyQuery => "Please enter a city name",
            WeatherError::InvalidCoordinates { .. } => "Invalid coordinates",
            WeatherError::LocationNotFound(_) | WeatherError::ProviderUnavailable(_) => {
                "Weather data not available"
            }
        }
    }
}
