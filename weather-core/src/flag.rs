//! Two-letter ISO country codes → regional-indicator flag glyphs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

/// Distance from an uppercase ASCII letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

/// Rendered flag, e.g. `🇵🇹`. Empty only when produced by [`FlagPolicy::BestEffort`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagGlyph(String);

impl FlagGlyph {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FlagGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with country codes that are not two ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagPolicy {
    /// Reject with [`WeatherError::InvalidCountryCode`].
    #[default]
    Strict,
    /// Keep the first two ASCII letters; fall back to an empty glyph.
    BestEffort,
}

impl FlagPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagPolicy::Strict => "strict",
            FlagPolicy::BestEffort => "best-effort",
        }
    }

    pub const fn all() -> &'static [FlagPolicy] {
        &[FlagPolicy::Strict, FlagPolicy::BestEffort]
    }
}

impl fmt::Display for FlagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FlagPolicy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "strict" => Ok(FlagPolicy::Strict),
            "best-effort" | "besteffort" | "best_effort" => Ok(FlagPolicy::BestEffort),
            _ => Err(anyhow::anyhow!(
                "Unknown flag policy '{value}'. Supported policies: strict, best-effort."
            )),
        }
    }
}

/// Encode a two-letter country code, rejecting anything else.
///
/// Case-insensitive: `"pt"` and `"PT"` both yield `🇵🇹`.
pub fn encode(country_code: &str) -> Result<FlagGlyph, WeatherError> {
    let invalid = |reason| WeatherError::InvalidCountryCode {
        code: country_code.to_string(),
        reason,
    };

    if country_code.chars().count() != 2 {
        return Err(invalid("expected exactly two characters"));
    }
    if !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("expected ASCII letters only"));
    }

    country_code
        .chars()
        .map(|c| {
            char::from_u32(REGIONAL_INDICATOR_OFFSET + u32::from(c.to_ascii_uppercase()))
                .ok_or_else(|| invalid("no regional indicator for character"))
        })
        .collect::<Result<String, _>>()
        .map(FlagGlyph)
}

/// Encode under an explicit policy.
pub fn encode_with(country_code: &str, policy: FlagPolicy) -> Result<FlagGlyph, WeatherError> {
    match policy {
        FlagPolicy::Strict => encode(country_code),
        FlagPolicy::BestEffort => {
            let letters: String = country_code
                .trim()
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .take(2)
                .collect();

            if letters.len() < 2 {
                tracing::warn!(country_code, "country code has fewer than two letters; omitting flag");
                return Ok(FlagGlyph::default());
            }
            if letters != country_code {
                tracing::warn!(country_code, normalized = %letters, "normalized malformed country code");
            }

            encode(&letters)
        }
    }
}
