use crate::{Config, model::DailyForecast, model::GeocodeResult};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Resolves free text to the best matching place.
#[async_trait]
pub trait GeocodingService: Send + Sync + Debug {
    async fn geocode(&self, query: &str) -> anyhow::Result<GeocodeResult>;
}

/// Fetches the daily forecast series for a resolved place.
#[async_trait]
pub trait ForecastService: Send + Sync + Debug {
    async fn forecast(&self, place: &GeocodeResult) -> anyhow::Result<DailyForecast>;
}

/// Construct the Open-Meteo client from config, shared for both lookups.
pub fn services_from_config(
    config: &Config,
) -> anyhow::Result<(Arc<dyn GeocodingService>, Arc<dyn ForecastService>)> {
    let client = Arc::new(OpenMeteoClient::from_config(config)?);
    let geocoder: Arc<dyn GeocodingService> = client.clone();
    let forecaster: Arc<dyn ForecastService> = client;

    Ok((geocoder, forecaster))
}
