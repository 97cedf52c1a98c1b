//! User-facing location labels: place name followed by its flag.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::WeatherError,
    flag::{self, FlagGlyph, FlagPolicy},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLocation {
    pub place_name: String,
    pub flag: FlagGlyph,
}

impl DisplayLocation {
    /// Rendered label, e.g. `Lisbon 🇵🇹`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DisplayLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.flag.is_empty() {
            f.write_str(&self.place_name)
        } else {
            write!(f, "{} {}", self.place_name, self.flag)
        }
    }
}

/// Build a label with strict country code validation.
pub fn build(place_name: &str, country_code: &str) -> Result<DisplayLocation, WeatherError> {
    build_with(place_name, country_code, FlagPolicy::Strict)
}

pub fn build_with(
    place_name: &str,
    country_code: &str,
    policy: FlagPolicy,
) -> Result<DisplayLocation, WeatherError> {
    let flag = flag::encode_with(country_code, policy)?;

    Ok(DisplayLocation { place_name: place_name.to_string(), flag })
}
