//! Position acquisition with retry and fallback.
//!
//! [`GeoLocator`] wraps a platform [`PositionSource`] (browser geolocation,
//! GPS daemon, a fixed test coordinate) in a timeout/retry loop. When the
//! retry budget runs out it degrades to the configured fallback coordinate
//! and keeps the session playable instead of propagating the failure.
//!
//! Cancellation is structured: the locator is driven through `&mut self`, so
//! at most one acquisition exists at a time, and dropping an in-flight
//! `acquire()` future abandons the attempt without touching the
//! current-position slot.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::time::timeout;

use super::{Coordinate, GeoError, UserPosition};
use crate::config::GeoConfig;

/// Platform capability: produce one position reading.
///
/// Implementations should return promptly with whatever error the platform
/// reports; the per-read timeout is applied by the locator.
#[async_trait]
pub trait PositionSource: Send {
    async fn read_position(&mut self) -> Result<Coordinate, GeoError>;
}

/// A source that always reports the same coordinate.
///
/// Used by the CLI (desk runs, field tests with a known spot) and anywhere a
/// real platform capability is absent.
pub struct StaticPositionSource {
    coordinate: Coordinate,
}

impl StaticPositionSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

#[async_trait]
impl PositionSource for StaticPositionSource {
    async fn read_position(&mut self) -> Result<Coordinate, GeoError> {
        Ok(self.coordinate)
    }
}

/// Acquires and refreshes the user's current position.
///
/// Owns the single current-position slot; no other component writes it.
pub struct GeoLocator<S> {
    source: S,
    config: GeoConfig,
    current: Option<UserPosition>,
}

impl<S: PositionSource> GeoLocator<S> {
    pub fn new(source: S, config: GeoConfig) -> Self {
        Self {
            source,
            config,
            current: None,
        }
    }

    /// The most recent reading, if any acquisition has completed.
    pub fn current(&self) -> Option<&UserPosition> {
        self.current.as_ref()
    }

    /// Acquire a position with the full configured retry budget.
    pub async fn acquire(&mut self) -> &UserPosition {
        let budget = self.config.retry_budget;
        self.acquire_with_budget(budget).await
    }

    /// Acquire a position with at most `budget` reads.
    ///
    /// Each read gets `acquire_timeout_seconds` to complete; failed reads are
    /// retried after `retry_delay_seconds` until the budget is spent.
    /// Exhaustion stores and returns a fallback position at the configured
    /// default coordinate. The returned reading has already been written to
    /// the current-position slot.
    pub async fn acquire_with_budget(&mut self, budget: u32) -> &UserPosition {
        let budget = budget.max(1);
        let read_timeout = Duration::from_secs(self.config.acquire_timeout_seconds);
        let retry_delay = Duration::from_secs(self.config.retry_delay_seconds);

        for attempt in 1..=budget {
            match timeout(read_timeout, self.source.read_position()).await {
                Ok(Ok(coordinate)) if coordinate.is_valid() => {
                    debug!(
                        "position acquired on attempt {attempt}: ({:.7}, {:.7})",
                        coordinate.latitude, coordinate.longitude
                    );
                    return self.current.insert(UserPosition::live(coordinate));
                }
                Ok(Ok(coordinate)) => {
                    warn!(
                        "position source returned invalid coordinate ({}, {})",
                        coordinate.latitude, coordinate.longitude
                    );
                }
                Ok(Err(err)) => {
                    debug!("position read failed on attempt {attempt}: {err}");
                }
                Err(_) => {
                    debug!(
                        "position read timed out after {}s (attempt {attempt})",
                        self.config.acquire_timeout_seconds
                    );
                }
            }

            if attempt < budget && !retry_delay.is_zero() {
                tokio::time::sleep(retry_delay).await;
            }
        }

        warn!(
            "location unavailable after {budget} attempts, using default ({:.7}, {:.7})",
            self.config.fallback_latitude, self.config.fallback_longitude
        );
        self.current
            .insert(UserPosition::fallback(self.config.fallback_coordinate()))
    }

    /// Manual refresh: re-acquire with a full retry budget.
    ///
    /// Any previously in-flight acquisition has necessarily been dropped by
    /// the time this can be called, so its result can never land in the slot.
    pub async fn refresh(&mut self) -> &UserPosition {
        debug!("manual position refresh requested");
        self.acquire().await
    }
}
