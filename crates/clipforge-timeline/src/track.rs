//! Track types for the timeline.

use std::collections::HashSet;
use std::fmt;

use clipforge_core::{ClipforgeError, Result};
use serde::{Deserialize, Serialize};

use crate::clip::{Clip, VOLUME_MAX};

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }

    /// Capitalized display label, used for auto-generated track names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A track: an ordered, independently-timed layer of clips.
///
/// Clips are stored in timeline order; their positions are derived from the
/// durations of preceding clips, never stored. The track's position in the
/// project's track list determines its render layer (lower index = bottom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track ID, unique across the project.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// Track-level volume multiplier in [0, 2]; multiplies every clip's
    /// volume at render time.
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Invisible tracks are skipped entirely during flattening.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked tracks reject all clip-structural mutation.
    #[serde(default)]
    pub locked: bool,
}

fn default_volume() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Track {
    /// Create a new empty track.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            clips: Vec::new(),
            volume: 1.0,
            visible: true,
            locked: false,
        }
    }

    /// Total duration: the sum of all clip durations, gaps included.
    pub fn duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }

    /// Find a clip by ID.
    pub fn clip_by_id(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    /// Find a clip mutably by ID.
    pub fn clip_by_id_mut(&mut self, clip_id: &str) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == clip_id)
    }

    /// Index of a clip by ID.
    pub fn clip_index(&self, clip_id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    /// Whether a clip with this ID exists in the track.
    pub fn has_clip(&self, clip_id: &str) -> bool {
        self.clip_index(clip_id).is_some()
    }

    /// Derived timeline start time of the clip at `index`: the sum of the
    /// durations of all preceding clips, gaps included.
    pub fn clip_start_time(&self, index: usize) -> Result<f64> {
        if index >= self.clips.len() {
            return Err(ClipforgeError::Validation(format!(
                "clip index {index} out of range (track '{}' has {} clips)",
                self.id,
                self.clips.len()
            )));
        }
        Ok(self.clips[..index].iter().map(|c| c.duration).sum())
    }

    /// Check track-level invariants and every contained clip.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=VOLUME_MAX).contains(&self.volume) {
            return Err(ClipforgeError::Validation(format!(
                "track '{}': volume must be within [0.0, {VOLUME_MAX}], got {}",
                self.id, self.volume
            )));
        }
        let mut seen = HashSet::new();
        for clip in &self.clips {
            if !seen.insert(clip.id.as_str()) {
                return Err(ClipforgeError::Validation(format!(
                    "track '{}': duplicate clip id '{}'",
                    self.id, clip.id
                )));
            }
            clip.validate()?;
        }
        Ok(())
    }
}
