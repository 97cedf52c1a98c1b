//! Typed failures the caller is expected to recover from.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    #[error("Invalid country code '{code}': {reason}")]
    InvalidCountryCode { code: String, reason: &'static str },

    #[error("Location not found: {0}")]
    LocationNotFound(String),
}

impl WeatherError {
    /// Short message suitable for the loading/error line of the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCountryCode { code, .. } => {
                format!("Cannot build a flag for country code '{code}'")
            }
            Self::LocationNotFound(query) => format!("No location matches '{query}'"),
        }
    }
}
