//! Composition building: flattened clips to a concrete render plan.
//!
//! The composition is the last pure stage before the encoder: a background
//! layer spanning the whole project plus one layer per placed clip, bottom
//! track first so later tracks draw on top.

use clipforge_core::{ClipforgeError, Result, Rgb};
use clipforge_engine::{flatten, PlacedClip};
use clipforge_timeline::{Clip, ClipKind, Effect, Project};

/// What a layer renders.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    /// Video subclipped from `media_start` to `media_start + duration`.
    Video { path: String, media_start: f64 },
    /// Audio subclipped the same way; contributes no pixels.
    Audio { path: String, media_start: f64 },
    /// Still image held for the layer duration.
    Image { path: String },
    /// Text synthesized at render time, colored for contrast against the
    /// project background.
    Text { text: String, color: Rgb },
}

/// One renderable layer of the composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub clip_id: String,
    pub track_id: String,
    /// Absolute start time in seconds.
    pub start: f64,
    pub duration: f64,
    /// Effective audio gain: `clip.volume * track.volume`, applied last.
    pub gain: f64,
    /// Effects in application order.
    pub effects: Vec<Effect>,
    pub content: LayerContent,
}

impl Layer {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A complete, ordered render plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub background: Rgb,
    /// Total duration: the maximum track duration across the project.
    pub duration: f64,
    /// Layers in draw order, bottom first.
    pub layers: Vec<Layer>,
}

/// Build the render plan for a project.
///
/// Fails fast with `"no clips to render"` when flattening yields nothing,
/// and aborts on the first clip that cannot be materialized.
pub fn build_composition(project: &Project) -> Result<Composition> {
    let placed = flatten(project);
    if placed.is_empty() {
        return Err(ClipforgeError::Render("no clips to render".into()));
    }

    let layers = placed
        .iter()
        .map(|p| materialize(p, project))
        .collect::<Result<Vec<_>>>()?;

    let (width, height) = project.resolution;
    Ok(Composition {
        width,
        height,
        fps: project.fps,
        background: project.background_color,
        duration: project.total_duration(),
        layers,
    })
}

fn materialize(placed: &PlacedClip<'_>, project: &Project) -> Result<Layer> {
    let clip = placed.clip;
    let content = match clip.kind {
        ClipKind::Video => LayerContent::Video {
            path: required_source(clip)?,
            media_start: clip.media_start,
        },
        ClipKind::Audio => LayerContent::Audio {
            path: required_source(clip)?,
            media_start: clip.media_start,
        },
        ClipKind::Image => LayerContent::Image {
            path: required_source(clip)?,
        },
        ClipKind::Text => LayerContent::Text {
            text: required_source(clip)?,
            color: project.background_color.contrast_text(),
        },
        // The flattener never emits gaps; reaching here means the plan is
        // inconsistent with the timeline.
        ClipKind::Gap => {
            return Err(ClipforgeError::Render(format!(
                "failed to process clip '{}': gap clips are not renderable",
                clip.id
            )))
        }
    };

    Ok(Layer {
        clip_id: clip.id.clone(),
        track_id: placed.track.id.clone(),
        start: placed.start,
        duration: clip.duration,
        gain: clip.volume * placed.track.volume,
        effects: clip.effects.clone(),
        content,
    })
}

fn required_source(clip: &Clip) -> Result<String> {
    clip.source.clone().ok_or_else(|| {
        ClipforgeError::Render(format!(
            "failed to process clip '{}': missing source",
            clip.id
        ))
    })
}
