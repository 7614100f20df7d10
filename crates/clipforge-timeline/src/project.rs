//! Project: the top-level timeline state.

use std::collections::HashSet;

use clipforge_core::{ClipforgeError, Result, Rgb};
use serde::{Deserialize, Serialize};

use crate::track::{Track, TrackKind};

/// Maximum supported resolution (8K).
pub const MAX_RESOLUTION: (u32, u32) = (7680, 4320);

/// Maximum supported frame rate.
pub const MAX_FPS: u32 = 120;

/// The complete state of a video project.
///
/// Tracks run in parallel, not concatenated: the project duration is the
/// maximum track duration. Track order determines render layering, with the
/// first track at the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// `(width, height)`, both > 0, capped at 7680x4320.
    pub resolution: (u32, u32),
    /// Frames per second, 1..=120.
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub background_color: Rgb,
}

fn default_fps() -> u32 {
    30
}

impl Project {
    /// Create a validated, trackless project.
    pub fn new(
        name: impl Into<String>,
        resolution: (u32, u32),
        fps: u32,
        background_color: Rgb,
    ) -> Result<Self> {
        let project = Self {
            name: name.into(),
            resolution,
            fps,
            tracks: Vec::new(),
            background_color,
        };
        project.validate()?;
        Ok(project)
    }

    /// Find a track by ID.
    pub fn track_by_id(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Find a track mutably by ID.
    pub fn track_by_id_mut(&mut self, track_id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    /// Index of a track by ID.
    pub fn track_index(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// All tracks of the given kind, in layer order.
    pub fn tracks_by_kind(&self, kind: TrackKind) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.kind == kind).collect()
    }

    /// Total project duration: the maximum track duration.
    pub fn total_duration(&self) -> f64 {
        self.tracks.iter().map(Track::duration).fold(0.0, f64::max)
    }

    /// Total number of clips across all tracks, gaps included.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    /// Check every project, track, and clip invariant.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.resolution;
        if width == 0 || height == 0 {
            return Err(ClipforgeError::Validation(format!(
                "resolution must be positive: {width}x{height}"
            )));
        }
        if width > MAX_RESOLUTION.0 || height > MAX_RESOLUTION.1 {
            return Err(ClipforgeError::Validation(format!(
                "resolution too large (max {}x{}): {width}x{height}",
                MAX_RESOLUTION.0, MAX_RESOLUTION.1
            )));
        }
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ClipforgeError::Validation(format!(
                "fps must be within 1..={MAX_FPS}, got {}",
                self.fps
            )));
        }
        let mut seen = HashSet::new();
        for track in &self.tracks {
            if !seen.insert(track.id.as_str()) {
                return Err(ClipforgeError::Validation(format!(
                    "duplicate track id '{}'",
                    track.id
                )));
            }
            track.validate()?;
        }
        Ok(())
    }
}
