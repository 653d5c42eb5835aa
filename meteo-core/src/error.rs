//! Errors crossing the library boundary, and the user-facing text they map to.

use thiserror::Error;

/// Any failure to obtain weather data.
///
/// Transport, status and parse failures all collapse into this one value;
/// callers only need something to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to fetch weather data")]
pub struct FetchError;

/// Why the device position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Unknown(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Unsupported => {
                "Geolocation is not supported by your browser. Please search for a city."
            }
            LocationError::PermissionDenied => {
                "Location access was denied. Please enable location services or search for a city."
            }
            LocationError::PositionUnavailable => {
                "Location information is unavailable. Please search for a city."
            }
            LocationError::Timeout => "Location request timed out. Please search for a city.",
            LocationError::Unknown(_) => "Unable to get your location. Please search for a city.",
        }
    }
}

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your internet connection.";
pub const TIMEOUT_ERROR_MESSAGE: &str = "Request timed out. Please try again.";
pub const CONNECTIVITY_ERROR_MESSAGE: &str =
    "Unable to connect to weather service. Please try again later.";
pub const GENERIC_ERROR_MESSAGE: &str = "Failed to load weather data. Please try again.";

/// Buckets a fetch failure by the words in its message.
///
/// This is a substring heuristic with no structured error code behind it;
/// a change in upstream wording moves a failure to a different bucket.
pub fn classify_fetch_error(message: &str) -> &'static str {
    let message = message.to_lowercase();

    if message.contains("network") || message.contains("offline") {
        NETWORK_ERROR_MESSAGE
    } else if message.contains("timeout") {
        TIMEOUT_ERROR_MESSAGE
    } else if message.contains("failed to fetch") {
        CONNECTIVITY_ERROR_MESSAGE
    } else {
        GENERIC_ERROR_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_network_and_offline() {
        assert_eq!(classify_fetch_error("Network unreachable"), NETWORK_ERROR_MESSAGE);
        assert_eq!(classify_fetch_error("browser is OFFLINE"), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn classify_timeout() {
        assert_eq!(classify_fetch_error("Gateway Timeout"), TIMEOUT_ERROR_MESSAGE);
    }

    #[test]
    fn network_wins_over_timeout() {
        assert_eq!(classify_fetch_error("network timeout"), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn classify_failed_to_fetch() {
        assert_eq!(classify_fetch_error("TypeError: Failed to fetch"), CONNECTIVITY_ERROR_MESSAGE);
    }

    #[test]
    fn fetch_error_lands_in_connectivity_bucket() {
        assert_eq!(classify_fetch_error(&FetchError.to_string()), CONNECTIVITY_ERROR_MESSAGE);
    }

    #[test]
    fn classify_anything_else_as_generic() {
        assert_eq!(classify_fetch_error("boom"), GENERIC_ERROR_MESSAGE);
        assert_eq!(classify_fetch_error(""), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn location_messages_are_distinct() {
        let errors = [
            LocationError::Unsupported,
            LocationError::PermissionDenied,
            LocationError::PositionUnavailable,
            LocationError::Timeout,
            LocationError::Unknown("x".into()),
        ];

        let mut messages: Vec<_> = errors.iter().map(LocationError::user_message).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
        assert_eq!(
            LocationError::Timeout.user_message(),
            "Location request timed out. Please search for a city."
        );
    }
}
