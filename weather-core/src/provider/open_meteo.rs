use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{
    Config,
    error::WeatherError,
    model::{DailyForecast, ForecastResponse, GeocodeResponse, GeocodeResult},
};

use super::{ForecastService, GeocodingService};

const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";

/// Client for the free Open-Meteo geocoding and forecast APIs. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: &str, forecast_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.geocoding_url, &config.forecast_url, config.timeout())
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)], what: &str) -> Result<String> {
        tracing::debug!(url, ?query, "GET {what}");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl GeocodingService for OpenMeteoClient {
    async fn geocode(&self, query: &str) -> Result<GeocodeResult> {
        let url = format!("{}/v1/search", self.geocoding_url);
        let body = self.get_text(&url, &[("name", query)], "geocoding").await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        let place = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))?;

        tracing::info!(
            query,
            name = %place.name,
            country_code = %place.country_code,
            "geocoded location"
        );
        Ok(place)
    }
}

#[async_trait]
impl ForecastService for OpenMeteoClient {
    async fn forecast(&self, place: &GeocodeResult) -> Result<DailyForecast> {
        let url = format!("{}/v1/forecast", self.forecast_url);
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();

        let body = self
            .get_text(
                &url,
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("timezone", place.timezone.as_str()),
                    ("daily", DAILY_FIELDS),
                ],
                "forecast",
            )
            .await?;

        let parsed: ForecastResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        tracing::info!(name = %place.name, days = parsed.daily.time.len(), "fetched forecast");
        Ok(parsed.daily)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
