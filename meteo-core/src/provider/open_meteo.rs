use anyhow::{Context, Result, anyhow, ensure};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::ApiConfig,
    error::FetchError,
    model::{Coordinates, CurrentWeather, ForecastDay, SearchResult, WeatherData, round_half_up},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";
const FORECAST_DAYS: &str = "5";
const SEARCH_COUNT: &str = "5";
const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

/// Client for the Open-Meteo forecast and geocoding APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    forecast_base_url: String,
    geocoding_base_url: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(api.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            forecast_base_url: api.forecast_base_url.trim_end_matches('/').to_string(),
            geocoding_base_url: api.geocoding_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn request_forecast(&self, coords: Coordinates) -> Result<OmForecastResponse> {
        let url = format!("{}/forecast", self.forecast_base_url);
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();

        tracing::debug!(%url, %coords, "requesting forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
                ("forecast_days", FORECAST_DAYS),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")
    }

    async fn request_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.geocoding_base_url);

        tracing::debug!(%url, query, "searching cities");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("name", query),
                ("count", SEARCH_COUNT),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmSearchResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        Ok(parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect())
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_forecast(
        &self,
        coords: Coordinates,
        location_label: String,
    ) -> Result<WeatherData, FetchError> {
        self.request_forecast(coords)
            .await
            .and_then(|parsed| normalize(parsed, location_label))
            .map_err(|err| {
                let error = format!("{err:#}");
                tracing::warn!(%error, %coords, "forecast fetch failed");
                FetchError
            })
    }

    async fn search_cities(&self, query: &str) -> Vec<SearchResult> {
        match self.request_search(query).await {
            Ok(results) => results,
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(%error, query, "city search failed");
                Vec::new()
            }
        }
    }
}

/// Reshapes a forecast response into [`WeatherData`].
///
/// Temperatures and wind speed are rounded half-up; humidity and weather
/// codes pass through, a null code included. The parallel daily arrays are zipped by index and must
/// all have the same length.
pub(crate) fn normalize(data: OmForecastResponse, location_label: String) -> Result<WeatherData> {
    let current = CurrentWeather {
        temperature: round_half_up(data.current.temperature_2m),
        weather_code: data.current.weather_code,
        wind_speed: round_half_up(data.current.wind_speed_10m),
        humidity: data.current.relative_humidity_2m,
        location: location_label,
        country: String::new(),
    };

    let daily = data.daily;
    let days = daily.time.len();
    ensure!(
        daily.temperature_2m_max.len() == days
            && daily.temperature_2m_min.len() == days
            && daily.weather_code.len() == days,
        "Open-Meteo daily arrays differ in length (time: {}, max: {}, min: {}, codes: {})",
        days,
        daily.temperature_2m_max.len(),
        daily.temperature_2m_min.len(),
        daily.weather_code.len(),
    );

    let forecast = daily
        .time
        .iter()
        .zip(&daily.temperature_2m_max)
        .zip(&daily.temperature_2m_min)
        .zip(&daily.weather_code)
        .map(|(((date, &max), &min), &code)| -> Result<ForecastDay> {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Invalid forecast date '{date}'"))?;
            Ok(ForecastDay {
                date,
                max_temp: round_half_up(max),
                min_temp: round_half_up(min),
                weather_code: code,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WeatherData { current, forecast })
}

#[derive(Debug, Deserialize)]
pub(crate) struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: i32,
    weather_code: Option<i32>,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OmForecastResponse {
    current: OmCurrent,
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    id: i64,
    name: String,
    #[serde(default)]
    country: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    results: Option<Vec<OmPlace>>,
}

impl From<OmPlace> for SearchResult {
    fn from(place: OmPlace) -> Self {
        SearchResult {
            id: place.id,
            name: place.name,
            country: place.country,
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OmForecastResponse {
        serde_json::from_str(json).expect("fixture must parse")
    }

    const LONDON: &str = r#"{
        "latitude": 51.5,
        "longitude": -0.12,
        "timezone": "Europe/London",
        "current": {
            "time": "2023-12-01T12:00",
            "temperature_2m": 15.5,
            "relative_humidity_2m": 65,
            "weather_code": 1,
            "wind_speed_10m": 12.3
        },
        "daily": {
            "time": ["2023-12-01"],
            "weather_code": [1],
            "temperature_2m_max": [16.7],
            "temperature_2m_min": [8.3]
        }
    }"#;

    #[test]
    fn normalizes_current_location_scenario() {
        let data = normalize(parse(LONDON), "Current Location".into()).expect("normalize");

        assert_eq!(
            data.current,
            CurrentWeather {
                temperature: 16,
                weather_code: Some(1),
                wind_speed: 12,
                humidity: 65,
                location: "Current Location".into(),
                country: String::new(),
            }
        );
        assert_eq!(
            data.forecast,
            vec![ForecastDay {
                date: NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date"),
                max_temp: 17,
                min_temp: 8,
                weather_code: Some(1),
            }]
        );
    }

    #[test]
    fn zips_daily_arrays_in_order() {
        let json = r#"{
            "current": {
                "temperature_2m": 10.0,
                "relative_humidity_2m": 80,
                "weather_code": 3,
                "wind_speed_10m": 4.5
            },
            "daily": {
                "time": ["2023-12-01", "2023-12-02"],
                "weather_code": [61, 3],
                "temperature_2m_max": [16.7, 14.2],
                "temperature_2m_min": [8.3, 7.1]
            }
        }"#;

        let data = normalize(parse(json), "Leeds, United Kingdom".into()).expect("normalize");

        assert_eq!(data.current.wind_speed, 5);
        assert_eq!(data.current.location, "Leeds, United Kingdom");
        assert_eq!(data.current.country, "");
        assert_eq!(data.forecast.len(), 2);

        let max: Vec<_> = data.forecast.iter().map(|d| d.max_temp).collect();
        let min: Vec<_> = data.forecast.iter().map(|d| d.min_temp).collect();
        let codes: Vec<_> = data.forecast.iter().map(|d| d.weather_code).collect();
        assert_eq!(max, vec![17, 14]);
        assert_eq!(min, vec![8, 7]);
        assert_eq!(codes, vec![Some(61), Some(3)]);

        let dates: Vec<_> = data.forecast.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2023-12-01", "2023-12-02"]);
    }

    #[test]
    fn empty_daily_arrays_give_empty_forecast() {
        let json = r#"{
            "current": {
                "temperature_2m": -2.5,
                "relative_humidity_2m": 90,
                "weather_code": 71,
                "wind_speed_10m": 0.4
            },
            "daily": {
                "time": [],
                "weather_code": [],
                "temperature_2m_max": [],
                "temperature_2m_min": []
            }
        }"#;

        let data = normalize(parse(json), "Current Location".into()).expect("normalize");

        assert_eq!(data.current.temperature, -2);
        assert_eq!(data.current.wind_speed, 0);
        assert_eq!(data.current.weather_code, Some(71));
        assert!(data.forecast.is_empty());
    }

    #[test]
    fn null_weather_codes_pass_through_as_missing() {
        let json = r#"{
            "current": {
                "temperature_2m": 12.0,
                "relative_humidity_2m": 70,
                "weather_code": null,
                "wind_speed_10m": 3.0
            },
            "daily": {
                "time": ["2023-12-01", "2023-12-02"],
                "weather_code": [null, 2],
                "temperature_2m_max": [13.0, 14.0],
                "temperature_2m_min": [6.0, 7.0]
            }
        }"#;

        let data = normalize(parse(json), "Current Location".into()).expect("normalize");

        assert_eq!(data.current.weather_code, None);
        let codes: Vec<_> = data.forecast.iter().map(|d| d.weather_code).collect();
        assert_eq!(codes, vec![None, Some(2)]);
    }

    #[test]
    fn mismatched_daily_arrays_are_rejected() {
        let json = r#"{
            "current": {
                "temperature_2m": 1.0,
                "relative_humidity_2m": 50,
                "weather_code": 0,
                "wind_speed_10m": 1.0
            },
            "daily": {
                "time": ["2023-12-01", "2023-12-02"],
                "weather_code": [0],
                "temperature_2m_max": [1.0, 2.0],
                "temperature_2m_min": [0.0, 1.0]
            }
        }"#;

        let err = normalize(parse(json), "x".into()).unwrap_err();
        assert!(err.to_string().contains("differ in length"));
    }

    #[test]
    fn invalid_dates_are_rejected() {
        let json = r#"{
            "current": {
                "temperature_2m": 1.0,
                "relative_humidity_2m": 50,
                "weather_code": 0,
                "wind_speed_10m": 1.0
            },
            "daily": {
                "time": ["tomorrow"],
                "weather_code": [0],
                "temperature_2m_max": [1.0],
                "temperature_2m_min": [0.0]
            }
        }"#;

        let err = normalize(parse(json), "x".into()).unwrap_err();
        assert!(err.to_string().contains("Invalid forecast date"));
    }

    #[test]
    fn search_response_without_results_is_empty() {
        let parsed: OmSearchResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).expect("parse");
        assert!(parsed.results.is_none());
    }

    #[test]
    fn place_without_country_gets_empty_country() {
        let place: OmPlace = serde_json::from_str(
            r#"{"id": 1, "name": "Null Island", "latitude": 0.0, "longitude": 0.0}"#,
        )
        .expect("parse");

        let result = SearchResult::from(place);
        assert_eq!(result.country, "");
        assert_eq!(result.label(), "Null Island, ");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
