//! The distance-based permission check before stage interaction.

use crate::geo::{distance_meters, Coordinate, UserPosition};

use super::types::Stage;

/// Outcome of a proximity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityDecision {
    /// Close enough to interact.
    Granted { distance_m: f64 },
    /// Physically out of range.
    TooFar { distance_m: f64 },
    /// No position reading exists yet; fails closed.
    NoPosition,
}

impl ProximityDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, ProximityDecision::Granted { .. })
    }
}

/// Decides whether a stage interaction is permitted.
///
/// Advisory only on the client: the backend independently re-validates
/// proximity when the stage detail is fetched.
#[derive(Debug, Clone, Copy)]
pub struct ProximityGate {
    threshold_m: f64,
}

impl ProximityGate {
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// Full decision with the measured distance. The boundary is inclusive:
    /// a stage at exactly the threshold is interactable.
    pub fn check(&self, stage: &Stage, position: Option<&UserPosition>) -> ProximityDecision {
        let Some(position) = position else {
            return ProximityDecision::NoPosition;
        };
        let distance_m = distance_meters(stage.coordinate, position.coordinate);
        if distance_m <= self.threshold_m {
            ProximityDecision::Granted { distance_m }
        } else {
            ProximityDecision::TooFar { distance_m }
        }
    }

    /// Spec-shaped convenience wrapper.
    pub fn can_interact(&self, stage: &Stage, position: Option<&UserPosition>) -> bool {
        self.check(stage, position).is_granted()
    }

    /// Distance check against a bare coordinate (marker previews etc.).
    pub fn within_range(&self, stage: &Stage, at: Coordinate) -> bool {
        distance_meters(stage.coordinate, at) <= self.threshold_m
    }
}
