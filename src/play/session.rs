//! Per-stage quiz interaction, driven as one explicit state machine.
//!
//! ```text
//! Closed → Fetching → QuizOpen → Submitting → Cleared → Closed
//!                        ▲            │
//!                        └── wrong ───┘
//! ```
//!
//! A single [`InteractionState`] value replaces the pile of co-located flags
//! the interaction would otherwise need; "submitting while closed" and
//! friends are unrepresentable. The session also owns the quest's stage
//! list and the proximity gate, and reconciles against the backend after
//! every confirmed clear.

use log::{debug, info, warn};

use crate::backend::QuestBackend;
use crate::config::PlayConfig;
use crate::geo::UserPosition;

use super::completion::{self, ClearOutcome};
use super::errors::PlayError;
use super::proximity::{ProximityDecision, ProximityGate};
use super::types::{stages_from_points, QuestProgress, QuizAnswer, StageDetail};

/// State of the current stage interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    /// No interaction underway.
    Closed,
    /// Stage detail request in flight.
    Fetching { stage_id: String },
    /// Quiz visible, awaiting an answer.
    QuizOpen {
        stage_id: String,
        detail: StageDetail,
        selected: Option<QuizAnswer>,
    },
    /// Answer submission in flight.
    Submitting {
        stage_id: String,
        detail: StageDetail,
        selected: QuizAnswer,
    },
    /// Server confirmed the clear; transient, collapses to `Closed` once the
    /// completion check has run.
    Cleared { stage_id: String },
}

impl InteractionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, InteractionState::Closed)
    }

    pub fn is_quiz_open(&self) -> bool {
        matches!(self, InteractionState::QuizOpen { .. })
    }
}

/// Outcome of a quiz submission.
#[derive(Debug, PartialEq)]
pub enum SubmitResult {
    /// Server confirmed the answer; the stage is cleared and completion has
    /// been re-evaluated.
    Correct(ClearOutcome),
    /// Wrong answer. The quiz stays open; submit again at will.
    Incorrect,
}

/// Orchestrates one user's play-through of a quest.
pub struct PlaySession<B> {
    backend: B,
    progress: QuestProgress,
    gate: ProximityGate,
    state: InteractionState,
}

impl<B: QuestBackend> PlaySession<B> {
    /// Start a session: fetch the quest's stage points and build progress.
    pub async fn start(backend: B, quest_id: &str, config: &PlayConfig) -> Result<Self, PlayError> {
        let stages = stages_from_points(backend.list_stage_points(quest_id).await?);
        info!("play session started for quest {quest_id} ({} stages)", stages.len());
        Ok(Self {
            backend,
            progress: QuestProgress::new(quest_id, stages),
            gate: ProximityGate::new(config.proximity_threshold_m),
            state: InteractionState::Closed,
        })
    }

    pub fn progress(&self) -> &QuestProgress {
        &self.progress
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn gate(&self) -> &ProximityGate {
        &self.gate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Open a stage interaction: proximity-gated, then fetch the detail
    /// keyed by stage and current position.
    ///
    /// The caller passes the position captured at the moment of selection so
    /// the check runs against the freshest reading, not a stale snapshot.
    pub async fn open_stage(
        &mut self,
        stage_id: &str,
        position: Option<&UserPosition>,
    ) -> Result<&StageDetail, PlayError> {
        let stage = self
            .progress
            .stage(stage_id)
            .ok_or_else(|| PlayError::UnknownStage(stage_id.to_string()))?;

        match self.gate.check(stage, position) {
            ProximityDecision::Granted { distance_m } => {
                debug!("gate passed for stage {stage_id} at {distance_m:.1}m");
            }
            ProximityDecision::TooFar { distance_m } => {
                debug!("gate rejected stage {stage_id}: {distance_m:.1}m away");
                return Err(PlayError::TooFar {
                    distance_m,
                    threshold_m: self.gate.threshold_m(),
                });
            }
            ProximityDecision::NoPosition => return Err(PlayError::PositionPending),
        }

        // Position is present if the gate passed.
        let at = position.map(|p| p.coordinate).ok_or(PlayError::PositionPending)?;

        self.state = InteractionState::Fetching {
            stage_id: stage_id.to_string(),
        };
        let quest_id = self.progress.quest_id.clone();
        match self.backend.fetch_stage_detail(&quest_id, stage_id, at).await {
            Ok(detail) => {
                self.state = InteractionState::QuizOpen {
                    stage_id: stage_id.to_string(),
                    detail,
                    selected: None,
                };
                match &self.state {
                    InteractionState::QuizOpen { detail, .. } => Ok(detail),
                    _ => unreachable!("state set to QuizOpen above"),
                }
            }
            Err(err) => {
                // Abort the interaction; prior progress is untouched.
                if matches!(err, PlayError::MalformedPayload(_)) {
                    warn!("stage {stage_id} detail payload malformed: {err}");
                }
                self.state = InteractionState::Closed;
                Err(err)
            }
        }
    }

    /// Record the user's answer choice. Local state only, no transition.
    pub fn select_answer(&mut self, answer: QuizAnswer) -> Result<(), PlayError> {
        match &mut self.state {
            InteractionState::QuizOpen { selected, .. } => {
                *selected = Some(answer);
                Ok(())
            }
            _ => Err(PlayError::NoOpenQuiz),
        }
    }

    /// Submit the selected answer for server-side validation.
    ///
    /// While the call is in flight the state is `Submitting`; `&mut self`
    /// serializes submissions so no two can overlap for the same stage.
    pub async fn submit(&mut self) -> Result<SubmitResult, PlayError> {
        let (stage_id, detail, selected) =
            match std::mem::replace(&mut self.state, InteractionState::Closed) {
                InteractionState::QuizOpen {
                    stage_id,
                    detail,
                    selected: Some(selected),
                } => (stage_id, detail, selected),
                other => {
                    // Nothing to submit; restore whatever was there.
                    self.state = other;
                    return Err(PlayError::NoOpenQuiz);
                }
            };

        self.state = InteractionState::Submitting {
            stage_id: stage_id.clone(),
            detail: detail.clone(),
            selected,
        };

        let quest_id = self.progress.quest_id.clone();
        match self.backend.submit_answer(&quest_id, &stage_id, selected).await {
            Ok(true) => {
                info!("stage {stage_id} cleared");
                self.state = InteractionState::Cleared {
                    stage_id: stage_id.clone(),
                };
                self.mark_cleared(&stage_id);

                // The clear itself is durable server-side even if the
                // follow-up completion fetch fails.
                let result = completion::evaluate(&self.backend, &quest_id).await;
                self.state = InteractionState::Closed;
                let check = result?;
                self.progress.stages = check.stages;
                Ok(SubmitResult::Correct(check.outcome))
            }
            Ok(false) => {
                debug!("wrong answer for stage {stage_id}, quiz stays open");
                // Selection preserved so the user can flip and resubmit.
                self.state = InteractionState::QuizOpen {
                    stage_id,
                    detail,
                    selected: Some(selected),
                };
                Ok(SubmitResult::Incorrect)
            }
            Err(err) => {
                // No state corruption: back to the open quiz, cleared flag
                // untouched. The user resubmits when the network recovers.
                self.state = InteractionState::QuizOpen {
                    stage_id,
                    detail,
                    selected: Some(selected),
                };
                Err(err)
            }
        }
    }

    /// Discard the in-flight quiz without side effects.
    pub fn close(&mut self) {
        if !self.state.is_closed() {
            debug!("interaction closed by user");
        }
        self.state = InteractionState::Closed;
    }

    /// Map collaborator entry point: a marker tap opens that stage.
    pub async fn handle_marker_click(
        &mut self,
        stage_id: &str,
        position: Option<&UserPosition>,
    ) -> Result<&StageDetail, PlayError> {
        self.open_stage(stage_id, position).await
    }

    /// End the play session with the backend.
    pub async fn end(&mut self) -> Result<(), PlayError> {
        self.close();
        let quest_id = self.progress.quest_id.clone();
        self.backend.end_session(&quest_id).await
    }

    fn mark_cleared(&mut self, stage_id: &str) {
        if let Some(stage) = self
            .progress
            .stages
            .iter_mut()
            .find(|stage| stage.stage_id == stage_id)
        {
            stage.cleared = true;
        }
    }
}
