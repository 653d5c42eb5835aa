//! Device position lookup.
//!
//! A [`Geolocator`] is whatever capability the host offers for finding the
//! current position. [`LocationResolver`] wraps one with a fixed timeout and
//! reports a missing capability as [`LocationError::Unsupported`].

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{config::LocationConfig, error::LocationError, model::Coordinates};

pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// A position granted ahead of time, e.g. through the config file or
/// command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
    permitted: bool,
}

impl FixedGeolocator {
    pub fn new(position: Coordinates) -> Self {
        Self {
            position: Some(position),
            permitted: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            position: None,
            permitted: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            position: None,
            permitted: true,
        }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.permitted {
            return Err(LocationError::PermissionDenied);
        }
        self.position.ok_or(LocationError::PositionUnavailable)
    }
}

/// Single-shot position lookup. Never retries.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geolocator: Option<Arc<dyn Geolocator>>,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(geolocator: Option<Arc<dyn Geolocator>>, timeout: Duration) -> Self {
        Self {
            geolocator,
            timeout,
        }
    }

    /// A resolver with no position source; every lookup is `Unsupported`.
    pub fn unsupported() -> Self {
        Self::new(None, DEFAULT_LOCATION_TIMEOUT)
    }

    /// Picks the position source described by the `[location]` config section.
    pub fn from_config(cfg: &LocationConfig) -> Self {
        let geolocator: Option<Arc<dyn Geolocator>> = if !cfg.enabled {
            Some(Arc::new(FixedGeolocator::denied()))
        } else if let Some(coords) = cfg.coordinates() {
            Some(Arc::new(FixedGeolocator::new(coords)))
        } else if cfg.has_any_coordinate() {
            Some(Arc::new(FixedGeolocator::unavailable()))
        } else {
            None
        };

        Self::new(geolocator, cfg.timeout())
    }

    pub fn is_supported(&self) -> bool {
        self.geolocator.is_some()
    }

    pub async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let Some(geolocator) = &self.geolocator else {
            return Err(LocationError::Unsupported);
        };

        match tokio::time::timeout(self.timeout, geolocator.current_position()).await {
            Ok(Ok(coords)) => {
                tracing::info!(%coords, "resolved current position");
                Ok(coords)
            }
            Ok(Err(err)) => {
                tracing::info!(error = %err, "position lookup failed");
                Err(err)
            }
            Err(_) => {
                tracing::info!(timeout = ?self.timeout, "position lookup timed out");
                Err(LocationError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Stalled;

    #[async_trait]
    impl Geolocator for Stalled {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Coordinates::new(0.0, 0.0))
        }
    }

    #[derive(Debug)]
    struct Slow(Duration);

    #[async_trait]
    impl Geolocator for Slow {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            tokio::time::sleep(self.0).await;
            Ok(Coordinates::new(1.0, 2.0))
        }
    }

    #[derive(Debug)]
    struct Broken;

    #[async_trait]
    impl Geolocator for Broken {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Unknown("sensor fault".into()))
        }
    }

    #[tokio::test]
    async fn missing_geolocator_is_unsupported() {
        let resolver = LocationResolver::unsupported();

        assert!(!resolver.is_supported());
        assert_eq!(resolver.resolve().await, Err(LocationError::Unsupported));
    }

    #[tokio::test]
    async fn fixed_position_resolves() {
        let coords = Coordinates::new(51.5074, -0.1278);
        let resolver =
            LocationResolver::new(Some(Arc::new(FixedGeolocator::new(coords))), DEFAULT_LOCATION_TIMEOUT);

        assert_eq!(resolver.resolve().await, Ok(coords));
    }

    #[tokio::test]
    async fn geolocator_errors_pass_through() {
        let resolver = LocationResolver::new(Some(Arc::new(Broken)), DEFAULT_LOCATION_TIMEOUT);

        let err = resolver.resolve().await.unwrap_err();
        assert_eq!(err, LocationError::Unknown("sensor fault".into()));
        assert_eq!(err.user_message(), "Unable to get your location. Please search for a city.");
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_lookup_times_out() {
        let resolver = LocationResolver::new(Some(Arc::new(Stalled)), Duration::from_secs(10));

        assert_eq!(resolver.resolve().await, Err(LocationError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_within_timeout_succeeds() {
        let resolver =
            LocationResolver::new(Some(Arc::new(Slow(Duration::from_secs(9)))), Duration::from_secs(10));

        assert_eq!(resolver.resolve().await, Ok(Coordinates::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn from_config_disabled_is_permission_denied() {
        let cfg = LocationConfig {
            enabled: false,
            latitude: Some(1.0),
            longitude: Some(2.0),
            ..LocationConfig::default()
        };

        let resolver = LocationResolver::from_config(&cfg);
        assert_eq!(resolver.resolve().await, Err(LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn from_config_with_coordinates_resolves() {
        let cfg = LocationConfig {
            latitude: Some(48.8566),
            longitude: Some(2.3522),
            ..LocationConfig::default()
        };

        let resolver = LocationResolver::from_config(&cfg);
        assert_eq!(resolver.resolve().await, Ok(Coordinates::new(48.8566, 2.3522)));
    }

    #[tokio::test]
    async fn from_config_with_half_position_is_unavailable() {
        let cfg = LocationConfig {
            latitude: Some(48.8566),
            ..LocationConfig::default()
        };

        let resolver = LocationResolver::from_config(&cfg);
        assert_eq!(resolver.resolve().await, Err(LocationError::PositionUnavailable));
    }

    #[tokio::test]
    async fn from_config_without_position_is_unsupported() {
        let resolver = LocationResolver::from_config(&LocationConfig::default());

        assert!(!resolver.is_supported());
        assert_eq!(resolver.resolve().await, Err(LocationError::Unsupported));
    }
}
