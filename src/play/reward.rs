//! Reward tiers keyed to the lifetime cleared-quest count.

use serde::{Deserialize, Serialize};

/// A reward level unlocked after reaching a cumulative count of cleared
/// quests. Ordered: each tier's threshold is strictly above the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    Novice,
    Explorer,
    Pathfinder,
    Veteran,
    Legend,
}

impl RewardTier {
    /// All tiers in ascending threshold order.
    pub const ALL: [RewardTier; 5] = [
        RewardTier::Novice,
        RewardTier::Explorer,
        RewardTier::Pathfinder,
        RewardTier::Veteran,
        RewardTier::Legend,
    ];

    /// The cleared-quest count at which this tier unlocks.
    pub fn threshold(&self) -> u32 {
        match self {
            RewardTier::Novice => 1,
            RewardTier::Explorer => 5,
            RewardTier::Pathfinder => 10,
            RewardTier::Veteran => 20,
            RewardTier::Legend => 30,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RewardTier::Novice => "Novice Seeker",
            RewardTier::Explorer => "Explorer",
            RewardTier::Pathfinder => "Pathfinder",
            RewardTier::Veteran => "Veteran",
            RewardTier::Legend => "Legend",
        }
    }

    /// The tier held at a given lifetime count. Monotonic step function,
    /// total over all counts; `None` below the first threshold.
    pub fn tier_for(cleared_quest_count: u32) -> Option<RewardTier> {
        RewardTier::ALL
            .iter()
            .rev()
            .find(|tier| cleared_quest_count >= tier.threshold())
            .copied()
    }

    /// The tier newly crossed at exactly this count, if any. Milestone
    /// celebrations fire only when the count lands precisely on a threshold.
    pub fn milestone_for(cleared_quest_count: u32) -> Option<RewardTier> {
        RewardTier::ALL
            .iter()
            .find(|tier| cleared_quest_count == tier.threshold())
            .copied()
    }
}
