use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Location label used when weather is fetched for the device position.
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// A position in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: i32,
    /// `None` when the provider sent no code.
    pub weather_code: Option<i32>,
    pub wind_speed: i32,
    pub humidity: i32,
    pub location: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp: i32,
    pub min_temp: i32,
    pub weather_code: Option<i32>,
}

/// Current conditions paired with the chronological forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherData {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

/// A candidate city returned by the geocoding search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SearchResult {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// `"{name}, {country}"`, the label weather for this city is shown under.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Rounds half-way values towards positive infinity, so `15.5 -> 16` and
/// `-2.5 -> -2`.
pub fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_matches_standard_rounding() {
        assert_eq!(round_half_up(15.5), 16);
        assert_eq!(round_half_up(16.7), 17);
        assert_eq!(round_half_up(14.2), 14);
        assert_eq!(round_half_up(8.3), 8);
        assert_eq!(round_half_up(7.1), 7);
        assert_eq!(round_half_up(12.3), 12);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn round_half_up_on_negative_halves() {
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(-0.4), 0);
    }

    #[test]
    fn round_half_up_just_below_half() {
        assert_eq!(round_half_up(0.499_999_999_999_999_94), 0);
    }

    #[test]
    fn search_result_label_and_coordinates() {
        let london = SearchResult {
            id: 2643743,
            name: "London".into(),
            country: "United Kingdom".into(),
            latitude: 51.50853,
            longitude: -0.12574,
        };

        assert_eq!(london.label(), "London, United Kingdom");
        assert_eq!(london.coordinates(), Coordinates::new(51.50853, -0.12574));
    }
}
