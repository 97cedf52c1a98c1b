use classy_weather_core::{DailyForecast, DisplayLocation, ForecastDay, Snapshot};

pub const LOADING: &str = "Loading...";

/// One day card: icon, day name, low and high.
pub fn day(day: &ForecastDay) -> String {
    format!(
        "{} {:<5} {}° — {}°",
        day.condition.icon(),
        day.label(),
        day.low(),
        day.high()
    )
}

pub fn forecast(location: Option<&DisplayLocation>, forecast: &DailyForecast) -> String {
    let mut out = match location {
        Some(location) => format!("Weather {location}"),
        None => "Weather".to_string(),
    };
    for d in forecast.days() {
        out.push('\n');
        out.push_str(&day(&d));
    }
    out
}

/// The forecast block, if the snapshot has one worth showing.
pub fn snapshot(snapshot: &Snapshot) -> Option<String> {
    snapshot
        .forecast
        .as_ref()
        .filter(|f| !f.is_empty())
        .map(|f| forecast(snapshot.display_location.as_ref(), f))
}
