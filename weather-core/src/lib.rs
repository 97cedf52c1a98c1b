//! Core library for the `classy-weather` CLI.
//!
//! This crate defines:
//! - WMO weather code classification and day-card icons
//! - Country flag glyphs and display location labels
//! - Open-Meteo geocoding and forecast clients
//! - Search session snapshots and the lookup orchestrator
//! - Configuration, including the last searched location
//!
//! It is used by `classy-weather-cli`, but can also be reused by other binaries or services.

pub mod condition;
pub mod config;
pub mod error;
pub mod flag;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;

pub use condition::{ConditionTag, classify};
pub use config::Config;
pub use error::WeatherError;
pub use flag::{FlagGlyph, FlagPolicy};
pub use location::DisplayLocation;
pub use model::{DailyForecast, ForecastDay, GeocodeResult};
pub use provider::{ForecastService, GeocodingService, OpenMeteoClient};
pub use session::{Snapshot, WeatherSearch};
