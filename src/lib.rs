//! # Geoquest - Location-Gated Quest Play Engine
//!
//! Geoquest is the play-side engine of a location-based quest game: it
//! tracks the user's live position, decides when they are physically close
//! enough to a stage to interact with it, mediates the O/X quiz unlock
//! protocol for that stage, and evaluates whole-quest completion and
//! milestone rewards.
//!
//! ## Features
//!
//! - **Proximity Gating**: Haversine distance against a configurable radius
//!   (50 m by default), boundary inclusive, failing closed without a
//!   position fix. The backend re-validates server-side.
//! - **Resilient Geolocation**: Timeout/retry acquisition behind a platform
//!   seam, degrading to a configured fallback coordinate instead of
//!   blocking play.
//! - **Explicit Interaction State**: One state-machine value per stage
//!   interaction; impossible combinations ("submitting while closed") do
//!   not exist.
//! - **Server-Authoritative Progress**: Stage clears and quiz validation
//!   happen on the backend; the engine never flips a cleared flag
//!   optimistically and reconciles by re-fetch after every clear.
//! - **Milestone Rewards**: Lifetime cleared-quest counts map onto reward
//!   tiers; completion and milestone celebrations are mutually exclusive
//!   per clear.
//! - **Headless Core**: Map rendering and geolocation are collaborator
//!   traits, so the whole engine runs under test without a map SDK or GPS.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geoquest::backend::HttpQuestBackend;
//! use geoquest::config::Config;
//! use geoquest::geo::{GeoLocator, StaticPositionSource};
//! use geoquest::play::PlaySession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!
//!     let source = StaticPositionSource::new(config.geo.fallback_coordinate());
//!     let mut locator = GeoLocator::new(source, config.geo.clone());
//!     locator.acquire().await;
//!
//!     let backend = HttpQuestBackend::new(&config.backend);
//!     let mut session = PlaySession::start(backend, "quest-1", &config.play).await?;
//!     let detail = session
//!         .open_stage("stage-1", locator.current())
//!         .await?;
//!     println!("{}", detail.quiz_content);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`geo`] - coordinates, haversine distance, position acquisition
//! - [`play`] - proximity gate, quiz session state machine, completion and
//!   reward evaluation
//! - [`backend`] - REST client behind the [`backend::QuestBackend`] seam
//! - [`map`] - map-rendering collaborator interface
//! - [`config`] - configuration management and validation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   PlaySession   │ ← quiz state machine + progress
//! └─────────────────┘
//!     │           │
//! ┌───────────┐ ┌─────────────┐
//! │ Proximity │ │ QuestBackend│ ← REST surface
//! │   Gate    │ └─────────────┘
//! └───────────┘
//!     │
//! ┌─────────────────┐
//! │   GeoLocator    │ ← position acquisition
//! └─────────────────┘
//! ```

pub mod backend;
pub mod config;
pub mod geo;
pub mod map;
pub mod play;
