//! # Map Collaborator Interface
//!
//! Rendering is an external concern: the engine only asks for "a marker at
//! this coordinate with this icon" and "a path through these points".
//! Anything that can draw implements [`MapRenderer`]; marker taps flow back
//! through [`crate::play::PlaySession::handle_marker_click`].

use log::info;

use crate::geo::Coordinate;
use crate::play::types::Stage;

/// Icon selection for a stage marker: keyed by sequence number, with the
/// cleared state available for a checked-off variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    pub sequence: u32,
    pub cleared: bool,
}

/// Map rendering capability provided by the host application.
pub trait MapRenderer {
    fn render_marker(&mut self, at: Coordinate, icon: MarkerIcon);
    fn render_path(&mut self, path: &[Coordinate]);
}

/// Draw a quest's stages: one marker per stage and a path through them in
/// sequence order. Stage lists arrive pre-validated, so every coordinate
/// here is drawable.
pub fn render_quest<R: MapRenderer>(renderer: &mut R, stages: &[Stage]) {
    let mut path = Vec::with_capacity(stages.len());
    for stage in stages {
        renderer.render_marker(
            stage.coordinate,
            MarkerIcon {
                sequence: stage.sequence_number,
                cleared: stage.cleared,
            },
        );
        path.push(stage.coordinate);
    }
    if !path.is_empty() {
        renderer.render_path(&path);
    }
}

/// Headless renderer: logs what a real map would draw. Used by the CLI and
/// anywhere no map SDK exists.
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub markers: usize,
}

impl MapRenderer for LogRenderer {
    fn render_marker(&mut self, at: Coordinate, icon: MarkerIcon) {
        self.markers += 1;
        info!(
            "marker #{} at ({:.7}, {:.7}){}",
            icon.sequence,
            at.latitude,
            at.longitude,
            if icon.cleared { " [cleared]" } else { "" }
        );
    }

    fn render_path(&mut self, path: &[Coordinate]) {
        info!("path through {} points", path.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::play::types::{stages_from_points, StagePoint};

    #[derive(Default)]
    struct RecordingRenderer {
        markers: Vec<MarkerIcon>,
        paths: Vec<Vec<Coordinate>>,
    }

    impl MapRenderer for RecordingRenderer {
        fn render_marker(&mut self, _at: Coordinate, icon: MarkerIcon) {
            self.markers.push(icon);
        }
        fn render_path(&mut self, path: &[Coordinate]) {
            self.paths.push(path.to_vec());
        }
    }

    fn point(id: &str, seq: u32, lat: f64, cleared: bool) -> StagePoint {
        StagePoint {
            stage_id: id.to_string(),
            sequence_number: seq,
            lat,
            lng: 126.85,
            cleared,
        }
    }

    #[test]
    fn markers_and_path_in_sequence_order() {
        let stages = stages_from_points(vec![
            point("s2", 2, 35.2, true),
            point("s1", 1, 35.1, false),
        ]);
        let mut renderer = RecordingRenderer::default();
        render_quest(&mut renderer, &stages);

        let sequences: Vec<_> = renderer.markers.iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, [1, 2]);
        assert!(renderer.markers[1].cleared);
        assert_eq!(renderer.paths.len(), 1);
        assert_eq!(renderer.paths[0].len(), 2);
    }

    #[test]
    fn empty_quest_draws_no_path() {
        let mut renderer = RecordingRenderer::default();
        render_quest(&mut renderer, &[]);
        assert!(renderer.paths.is_empty());
    }
}
