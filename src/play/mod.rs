//! # Play Module
//!
//! The quest play engine: stage data, the proximity gate, the per-stage quiz
//! interaction state machine, completion evaluation, and reward tiers.
//!
//! ## Flow
//!
//! ```text
//! GeoLocator ──current position──▶ ProximityGate
//!                                       │ granted
//!                                       ▼
//!                               PlaySession (quiz)
//!                                       │ correct answer
//!                                       ▼
//!                              CompletionEvaluator ──▶ RewardTier
//! ```
//!
//! All backend access goes through the [`crate::backend::QuestBackend`]
//! seam, so the whole engine runs headless in tests.

pub mod completion;
pub mod errors;
pub mod proximity;
pub mod reward;
pub mod session;
pub mod types;

pub use completion::{evaluate, ClearOutcome, CompletionCheck};
pub use errors::PlayError;
pub use proximity::{ProximityDecision, ProximityGate};
pub use reward::RewardTier;
pub use session::{InteractionState, PlaySession, SubmitResult};
pub use types::{QuestProgress, QuizAnswer, Stage, StageDetail, StagePoint};
