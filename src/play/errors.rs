use thiserror::Error;

use crate::geo::InvalidCoordinate;

/// Errors that can arise while playing a quest.
///
/// An incorrect quiz answer is a normal outcome, not an error; see
/// [`crate::play::session::SubmitResult`].
#[derive(Debug, Error)]
pub enum PlayError {
    /// The proximity gate was consulted before any position reading exists.
    #[error("location not yet available, try again shortly")]
    PositionPending,

    /// The stage is out of interaction range (local gate or server check).
    #[error("stage is {distance_m:.0}m away (limit {threshold_m:.0}m)")]
    TooFar { distance_m: f64, threshold_m: f64 },

    /// Wrapper around reqwest's transport errors.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A backend call exceeded the configured timeout.
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend answered with an unexpected status code.
    #[error("backend returned status {0}")]
    Status(u16),

    /// The backend payload could not be decoded.
    #[error("malformed server payload: {0}")]
    MalformedPayload(String),

    /// Referenced a stage that is not part of this quest.
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    /// Submit or answer selection without an open quiz.
    #[error("no quiz is open")]
    NoOpenQuiz,

    /// Coordinate values outside the valid ranges.
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinate),
}

impl PlayError {
    /// Transient failures are safe to surface as "try again"; everything
    /// else indicates a rejected interaction or a bug.
    pub fn is_transient(&self) -> bool {
        match self {
            PlayError::Http(_) | PlayError::Timeout { .. } => true,
            PlayError::Status(code) => *code >= 500,
            _ => false,
        }
    }
}
