use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::condition::{self, ConditionTag};

/// Envelope returned by the geocoding search; `results` is absent when nothing matched.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub name: String,
    #[serde(default)]
    pub country_code: String,
}

fn default_timezone() -> String {
    "auto".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailyForecast,
}

/// Parallel daily series, one entry per forecast day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    pub time: Vec<NaiveDate>,
    pub weathercode: Vec<i64>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
}

impl DailyForecast {
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Zip the series into day cards. The first day is today.
    pub fn days(&self) -> Vec<ForecastDay> {
        let lens = [
            self.time.len(),
            self.weathercode.len(),
            self.temperature_2m_max.len(),
            self.temperature_2m_min.len(),
        ];
        if lens.iter().any(|len| *len != lens[0]) {
            tracing::warn!(?lens, "daily forecast series have different lengths; truncating");
        }

        self.time
            .iter()
            .zip(&self.weathercode)
            .zip(self.temperature_2m_max.iter().zip(&self.temperature_2m_min))
            .enumerate()
            .map(|(i, ((date, code), (max, min)))| ForecastDay {
                date: *date,
                code: *code,
                condition: condition::classify(*code),
                max: *max,
                min: *min,
                is_today: i == 0,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub code: i64,
    pub condition: ConditionTag,
    pub max: f64,
    pub min: f64,
    pub is_today: bool,
}

impl ForecastDay {
    /// `Today`, or the short English weekday name.
    pub fn label(&self) -> String {
        if self.is_today {
            "Today".to_string()
        } else {
            self.date.format("%a").to_string()
        }
    }

    pub fn low(&self) -> i64 {
        self.min.floor() as i64
    }

    pub fn high(&self) -> i64 {
        self.max.ceil() as i64
    }
}
