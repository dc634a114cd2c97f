//! Domain and wire types for quest play.
//!
//! Wire structs mirror the backend's camelCase JSON; domain types carry the
//! validated forms the engine works with.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// One entry of `GET /play/{questId}/points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagePoint {
    pub stage_id: String,
    pub sequence_number: u32,
    pub lat: f64,
    pub lng: f64,
    pub cleared: bool,
}

/// Stage detail payload for an open interaction
/// (`GET /play/{questId}/{stageId}?lat&lng`).
///
/// The quiz's correct answer is deliberately absent: validation happens
/// server-side on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDetail {
    pub stage_name: String,
    pub stage_address: String,
    pub stage_story: String,
    pub quiz_content: String,
}

/// A geographically anchored checkpoint within a quest.
///
/// Identity is immutable; `cleared` flips false→true exactly once, and only
/// as a side effect of a server-confirmed correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub stage_id: String,
    pub sequence_number: u32,
    pub coordinate: Coordinate,
    pub cleared: bool,
}

/// An O/X quiz answer choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizAnswer {
    O,
    X,
}

impl QuizAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizAnswer::O => "O",
            QuizAnswer::X => "X",
        }
    }

    /// Parse a user-entered choice, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "O" | "o" | "0" => Some(QuizAnswer::O),
            "X" | "x" => Some(QuizAnswer::X),
            _ => None,
        }
    }
}

/// Build domain stages from wire points, dropping entries with unusable
/// coordinates. The backend has occasionally served stages with missing
/// geocoding; a bad point must not take the whole quest down.
pub fn stages_from_points(points: Vec<StagePoint>) -> Vec<Stage> {
    let mut stages: Vec<Stage> = points
        .into_iter()
        .filter_map(|point| match Coordinate::new(point.lat, point.lng) {
            Ok(coordinate) => Some(Stage {
                stage_id: point.stage_id,
                sequence_number: point.sequence_number,
                coordinate,
                cleared: point.cleared,
            }),
            Err(err) => {
                warn!("skipping stage {} with {err}", point.stage_id);
                None
            }
        })
        .collect();
    stages.sort_by_key(|stage| stage.sequence_number);
    stages
}

/// Per-quest progress owned by the play session.
///
/// Reconstructed from the backend at session start and reconciled via
/// re-fetch at completion-check time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: String,
    pub stages: Vec<Stage>,
}

impl QuestProgress {
    pub fn new(quest_id: &str, stages: Vec<Stage>) -> Self {
        Self {
            quest_id: quest_id.to_string(),
            stages,
        }
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.stage_id == stage_id)
    }

    pub fn cleared_count(&self) -> usize {
        self.stages.iter().filter(|stage| stage.cleared).count()
    }

    /// True when every stage is cleared. A quest with no stages is not
    /// considered cleared.
    pub fn all_cleared(&self) -> bool {
        !self.stages.is_empty() && self.stages.iter().all(|stage| stage.cleared)
    }
}
