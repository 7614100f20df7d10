//! Clip and effect types for the timeline.

use std::collections::BTreeMap;
use std::fmt;

use clipforge_core::{ClipforgeError, Result};
use serde::{Deserialize, Serialize};

/// Maximum allowed clip/track volume multiplier.
pub const VOLUME_MAX: f64 = 2.0;

/// A video/audio effect applied to a clip.
///
/// Effects carry no identity of their own; their order within a clip's
/// effect list is the order they are applied at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Effect kind, e.g. `crop`, `fade`, `resize`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl Effect {
    /// Create an effect with no parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter (builder style).
    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}

/// Kind of clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Video,
    Audio,
    Image,
    Text,
    /// A spacer: advances the track's running time but renders nothing.
    Gap,
}

impl ClipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Text => "text",
            Self::Gap => "gap",
        }
    }
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clip on the timeline.
///
/// A clip's timeline position is never stored. It is always derived as the
/// sum of the durations of all clips preceding it in its track, gaps
/// included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Clip ID, unique within the owning track.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    /// File path/URL for media clips, raw text for text clips, `None` for gaps.
    #[serde(default)]
    pub source: Option<String>,
    /// Duration in seconds, always > 0.
    pub duration: f64,
    /// Offset into the source media in seconds (trimming). Meaningless for
    /// text and gap clips.
    #[serde(default)]
    pub media_start: f64,
    /// Audio volume multiplier in [0, 2].
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

fn default_volume() -> f64 {
    1.0
}

impl Clip {
    /// Create a validated clip. Gap clips have their source forced to `None`.
    pub fn new(
        id: impl Into<String>,
        kind: ClipKind,
        source: Option<String>,
        duration: f64,
    ) -> Result<Self> {
        let clip = Self {
            id: id.into(),
            kind,
            source: if kind == ClipKind::Gap { None } else { source },
            duration,
            media_start: 0.0,
            volume: 1.0,
            effects: Vec::new(),
        };
        clip.validate()?;
        Ok(clip)
    }

    /// Create a gap clip of the given duration.
    pub fn gap(id: impl Into<String>, duration: f64) -> Result<Self> {
        Self::new(id, ClipKind::Gap, None, duration)
    }

    /// Set the source media offset (builder style, unvalidated until `validate`).
    pub fn with_media_start(mut self, media_start: f64) -> Self {
        self.media_start = media_start;
        self
    }

    /// Set the volume (builder style, unvalidated until `validate`).
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Check every field invariant.
    pub fn validate(&self) -> Result<()> {
        if self.duration <= 0.0 {
            return Err(ClipforgeError::Validation(format!(
                "clip '{}': duration must be > 0, got {}",
                self.id, self.duration
            )));
        }
        if self.media_start < 0.0 {
            return Err(ClipforgeError::Validation(format!(
                "clip '{}': media_start must be >= 0, got {}",
                self.id, self.media_start
            )));
        }
        if !(0.0..=VOLUME_MAX).contains(&self.volume) {
            return Err(ClipforgeError::Validation(format!(
                "clip '{}': volume must be within [0.0, {VOLUME_MAX}], got {}",
                self.id, self.volume
            )));
        }
        match self.kind {
            ClipKind::Gap => {
                if self.source.is_some() {
                    return Err(ClipforgeError::Validation(format!(
                        "clip '{}': gap clips must not have a source",
                        self.id
                    )));
                }
            }
            kind => {
                if self.source.as_deref().map_or(true, str::is_empty) {
                    return Err(ClipforgeError::Validation(format!(
                        "clip '{}': {kind} clips require a source",
                        self.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// End of the source window, `media_start + duration`.
    pub fn media_end(&self) -> f64 {
        self.media_start + self.duration
    }
}
