//! Quest completion and milestone evaluation.
//!
//! Runs after every server-confirmed stage clear. The stage list is
//! re-fetched so the verdict rests on authoritative state, not the session's
//! optimistic copy.

use log::{debug, info};

use crate::backend::QuestBackend;

use super::errors::PlayError;
use super::reward::RewardTier;
use super::types::{stages_from_points, Stage};

/// What a stage clear amounted to.
///
/// Completion and milestone celebrations are mutually exclusive per clear: a
/// quest-completing clear never also reports a milestone, even when the new
/// lifetime count lands on a threshold. The completion celebration absorbs
/// it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearOutcome {
    /// Every stage of the quest is now cleared.
    QuestComplete,
    /// Quest still in progress, but the lifetime cleared-quest count sits
    /// exactly on a reward threshold.
    Milestone(RewardTier),
    /// Quest still in progress, nothing to celebrate yet.
    Progress,
}

/// Result of a completion check: the verdict plus the authoritative stage
/// list for the session to reconcile against.
#[derive(Debug)]
pub struct CompletionCheck {
    pub outcome: ClearOutcome,
    pub stages: Vec<Stage>,
}

/// Evaluate whole-quest completion for `quest_id`.
pub async fn evaluate<B: QuestBackend>(
    backend: &B,
    quest_id: &str,
) -> Result<CompletionCheck, PlayError> {
    let stages = stages_from_points(backend.list_stage_points(quest_id).await?);
    let cleared = stages.iter().filter(|stage| stage.cleared).count();
    debug!("completion check for {quest_id}: {cleared}/{} cleared", stages.len());

    if !stages.is_empty() && cleared == stages.len() {
        info!("quest {quest_id} complete");
        return Ok(CompletionCheck {
            outcome: ClearOutcome::QuestComplete,
            stages,
        });
    }

    let lifetime = backend.cleared_quest_count().await?;
    let outcome = match RewardTier::milestone_for(lifetime) {
        Some(tier) => {
            info!("milestone reached: {} at {lifetime} cleared quests", tier.title());
            ClearOutcome::Milestone(tier)
        }
        None => ClearOutcome::Progress,
    };
    Ok(CompletionCheck { outcome, stages })
}
