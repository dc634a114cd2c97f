//! Shared fixtures: an in-memory quest backend and a scripted position
//! source, so the engine runs end-to-end without a server or GPS.
#![allow(dead_code)] // Not every test binary uses every fixture.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use geoquest::backend::QuestBackend;
use geoquest::geo::{Coordinate, GeoError, PositionSource};
use geoquest::play::{PlayError, QuizAnswer, StageDetail, StagePoint};

/// A stage as the fake backend stores it.
pub struct FakeStage {
    pub point: StagePoint,
    pub correct_answer: QuizAnswer,
}

pub struct FakeBackendState {
    pub stages: Vec<FakeStage>,
    pub cleared_quest_count: u32,
    /// Queued error for the next submit call (simulates a network drop).
    pub submit_failure: Option<PlayError>,
    /// Queued error for the next detail fetch.
    pub detail_failure: Option<PlayError>,
    pub submit_calls: u32,
    pub end_calls: u32,
}

/// In-memory [`QuestBackend`]: validates answers, marks stages cleared, and
/// serves the authoritative stage list the way the real server would.
pub struct FakeBackend {
    pub state: Mutex<FakeBackendState>,
}

impl FakeBackend {
    pub fn new(stages: Vec<FakeStage>, cleared_quest_count: u32) -> Self {
        Self {
            state: Mutex::new(FakeBackendState {
                stages,
                cleared_quest_count,
                submit_failure: None,
                detail_failure: None,
                submit_calls: 0,
                end_calls: 0,
            }),
        }
    }

    pub fn fail_next_submit(&self, err: PlayError) {
        self.state.lock().unwrap().submit_failure = Some(err);
    }

    pub fn fail_next_detail(&self, err: PlayError) {
        self.state.lock().unwrap().detail_failure = Some(err);
    }
}

#[async_trait]
impl QuestBackend for FakeBackend {
    async fn list_stage_points(&self, _quest_id: &str) -> Result<Vec<StagePoint>, PlayError> {
        let state = self.state.lock().unwrap();
        Ok(state.stages.iter().map(|s| s.point.clone()).collect())
    }

    async fn fetch_stage_detail(
        &self,
        _quest_id: &str,
        stage_id: &str,
        _at: Coordinate,
    ) -> Result<StageDetail, PlayError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.detail_failure.take() {
            return Err(err);
        }
        let stage = state
            .stages
            .iter()
            .find(|s| s.point.stage_id == stage_id)
            .ok_or_else(|| PlayError::UnknownStage(stage_id.to_string()))?;
        Ok(StageDetail {
            stage_name: format!("Stage {}", stage.point.sequence_number),
            stage_address: "1 Plaza Way".to_string(),
            stage_story: "A story unfolds here.".to_string(),
            quiz_content: "Is the statue facing east?".to_string(),
        })
    }

    async fn submit_answer(
        &self,
        _quest_id: &str,
        stage_id: &str,
        answer: QuizAnswer,
    ) -> Result<bool, PlayError> {
        let mut state = self.state.lock().unwrap();
        state.submit_calls += 1;
        if let Some(err) = state.submit_failure.take() {
            return Err(err);
        }
        let stage = state
            .stages
            .iter_mut()
            .find(|s| s.point.stage_id == stage_id)
            .ok_or_else(|| PlayError::UnknownStage(stage_id.to_string()))?;
        if stage.correct_answer == answer {
            stage.point.cleared = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn end_session(&self, _quest_id: &str) -> Result<(), PlayError> {
        self.state.lock().unwrap().end_calls += 1;
        Ok(())
    }

    async fn cleared_quest_count(&self) -> Result<u32, PlayError> {
        Ok(self.state.lock().unwrap().cleared_quest_count)
    }
}

/// Position source that replays a scripted sequence of readings.
pub struct ScriptedPositionSource {
    pub script: VecDeque<Result<Coordinate, GeoError>>,
    pub reads: u32,
}

impl ScriptedPositionSource {
    pub fn new(script: Vec<Result<Coordinate, GeoError>>) -> Self {
        Self {
            script: script.into(),
            reads: 0,
        }
    }
}

#[async_trait]
impl PositionSource for ScriptedPositionSource {
    async fn read_position(&mut self) -> Result<Coordinate, GeoError> {
        self.reads += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(GeoError::Unavailable("script exhausted".to_string())))
    }
}

/// Three-stage quest at known coordinates, ~1km apart.
pub fn three_stage_quest() -> Vec<FakeStage> {
    let make = |id: &str, seq: u32, lat: f64| FakeStage {
        point: StagePoint {
            stage_id: id.to_string(),
            sequence_number: seq,
            lat,
            lng: 126.8526012,
            cleared: false,
        },
        correct_answer: QuizAnswer::O,
    };
    vec![
        make("s1", 1, 35.1595454),
        make("s2", 2, 35.1695454),
        make("s3", 3, 35.1795454),
    ]
}

/// Standard play config with the 50m default gate.
pub fn play_config() -> geoquest::config::PlayConfig {
    geoquest::config::PlayConfig::default()
}

/// Geo config tuned for fast tests: no retry delay, 1s read timeout.
pub fn fast_geo_config() -> geoquest::config::GeoConfig {
    geoquest::config::GeoConfig {
        acquire_timeout_seconds: 1,
        retry_delay_seconds: 0,
        retry_budget: 5,
        ..geoquest::config::GeoConfig::default()
    }
}
