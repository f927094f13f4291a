use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::track::Track;
use super::window::ViewableWindow;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate track id: {0}")]
    DuplicateTrack(String),
    #[error("track {id}: offset {offset} and duration {duration} do not fit the timeline")]
    InvalidTiming {
        id: String,
        offset: i64,
        duration: i64,
    },
}

/// A data-viewer timeline: the shared window plus one track per lane.
///
/// Loaded from JSON; the window is validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub window: ViewableWindow,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn from_json(data: &[u8]) -> Result<Self, TimelineError> {
        let timeline: Timeline = serde_json::from_slice(data)?;
        for (i, track) in timeline.tracks.iter().enumerate() {
            if timeline.tracks[..i].iter().any(|t| t.id == track.id) {
                return Err(TimelineError::DuplicateTrack(track.id.clone()));
            }
            if track.duration < 0 || track.offset.checked_add(track.duration).is_none() {
                return Err(TimelineError::InvalidTiming {
                    id: track.id.clone(),
                    offset: track.offset,
                    duration: track.duration,
                });
            }
        }
        log::debug!(
            "loaded timeline: {} tracks, zoom {}..{} of {}",
            timeline.tracks.len(),
            timeline.window.zoom_start(),
            timeline.window.zoom_end(),
            timeline.window.end()
        );
        Ok(timeline)
    }

    pub fn to_json(&self) -> Result<String, TimelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn track_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// Latest end point over all resolvable tracks, or 0 with none.
    pub fn content_end(&self) -> i64 {
        self.tracks
            .iter()
            .filter(|t| !t.erroneous)
            .map(Track::end)
            .max()
            .unwrap_or(0)
    }
}
