//! WMO weather interpretation codes → symbolic condition tags.
//!
//! See <https://open-meteo.com/en/docs#weathervariables> for the code list.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionTag {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    ThunderstormWithHail,
    Unknown,
}

/// Groups of codes scanned in order; the first group containing a code wins.
pub const CONDITION_TABLE: &[(&[i64], ConditionTag)] = &[
    (&[0], ConditionTag::Clear),
    (&[1], ConditionTag::MainlyClear),
    (&[2], ConditionTag::PartlyCloudy),
    (&[3], ConditionTag::Overcast),
    (&[45, 48], ConditionTag::Fog),
    (&[51, 56, 61, 66, 80], ConditionTag::Drizzle),
    (&[53, 55, 57, 63, 65, 67, 81, 82], ConditionTag::Rain),
    (&[71, 73, 75, 77, 85, 86], ConditionTag::Snow),
    (&[95], ConditionTag::Thunderstorm),
    (&[96, 99], ConditionTag::ThunderstormWithHail),
];

/// Classify any integer. Codes outside the table map to [`ConditionTag::Unknown`].
pub fn classify(code: i64) -> ConditionTag {
    CONDITION_TABLE
        .iter()
        .find(|(codes, _)| codes.contains(&code))
        .map(|(_, tag)| *tag)
        .unwrap_or(ConditionTag::Unknown)
}

impl ConditionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::MainlyClear => "mainly-clear",
            Self::PartlyCloudy => "partly-cloudy",
            Self::Overcast => "overcast",
            Self::Fog => "fog",
            Self::Drizzle => "drizzle",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::ThunderstormWithHail => "thunderstorm-with-hail",
            Self::Unknown => "unknown",
        }
    }

    /// Glyph shown on a day card.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::MainlyClear => "🌤",
            Self::PartlyCloudy => "⛅️",
            Self::Overcast => "☁️",
            Self::Fog => "🌫",
            Self::Drizzle => "🌦",
            Self::Rain => "🌧",
            Self::Snow => "🌨",
            Self::Thunderstorm => "🌩",
            Self::ThunderstormWithHail => "⛈",
            Self::Unknown => "NOT FOUND",
        }
    }

    pub const fn all() -> &'static [ConditionTag] {
        &[
            Self::Clear,
            Self::MainlyClear,
            Self::PartlyCloudy,
            Self::Overcast,
            Self::Fog,
            Self::Drizzle,
            Self::Rain,
            Self::Snow,
            Self::Thunderstorm,
            Self::ThunderstormWithHail,
            Self::Unknown,
        ]
    }
}

impl fmt::Display for ConditionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
