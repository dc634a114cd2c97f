//! # Geolocation Module
//!
//! Coordinate types, great-circle distance, and the position acquisition
//! service used by the play engine.
//!
//! ## Components
//!
//! - [`Coordinate`] - validated latitude/longitude pair
//! - [`UserPosition`] - a single position reading with provenance
//! - [`distance::distance_meters`] - pure haversine distance
//! - [`locator::GeoLocator`] - retry/fallback acquisition behind the
//!   [`locator::PositionSource`] platform seam
//!
//! The locator is the only writer of the current-position slot; everything
//! else reads positions as immutable values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod distance;
pub mod locator;

pub use distance::{distance_meters, distance_meters_opt};
pub use locator::{GeoLocator, PositionSource, StaticPositionSource};

/// Errors from the platform geolocation capability.
///
/// These never escape [`GeoLocator`]: exhausting the retry budget degrades
/// to a fallback position instead of propagating.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The user or platform denied the location request.
    #[error("location permission denied")]
    Denied,

    /// The position could not be determined (no fix, hardware absent).
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the valid ranges
    /// (latitude [-90, 90], longitude [-180, 180]) and non-finite input.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let candidate = Self {
            latitude,
            longitude,
        };
        if candidate.is_valid() {
            Ok(candidate)
        } else {
            Err(InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Rejected coordinate values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid coordinate: lat {latitude}, lng {longitude}")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One position reading. Superseded by the next reading, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    pub coordinate: Coordinate,
    pub acquired_at: DateTime<Utc>,
    /// True when this reading is the configured default coordinate
    /// substituted after the retry budget ran out.
    pub is_fallback: bool,
}

impl UserPosition {
    pub fn live(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            acquired_at: Utc::now(),
            is_fallback: false,
        }
    }

    pub fn fallback(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            acquired_at: Utc::now(),
            is_fallback: true,
        }
    }
}
