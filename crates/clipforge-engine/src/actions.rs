//! The canonical timeline actions.
//!
//! Each action is a typed function over `Project` plus a parameter struct.
//! Parameter structs deserialize with `deny_unknown_fields`, so an unknown
//! parameter fails closed instead of being ignored. The functions are
//! callable directly or through the [`ActionRegistry`](crate::ActionRegistry).

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::{Clip, ClipKind, Effect, Project, Track, TrackKind, VOLUME_MAX};
use serde::Deserialize;
use uuid::Uuid;

use crate::selector::resolve_clip_index;

/// Generate a clip ID of the form `clip_<8 hex>`.
pub fn new_clip_id() -> String {
    format!("clip_{}", &Uuid::new_v4().simple().to_string()[..8])
}

/// Generate a track ID of the form `track_<8 hex>`.
pub fn new_track_id() -> String {
    format!("track_{}", &Uuid::new_v4().simple().to_string()[..8])
}

fn track_mut<'a>(project: &'a mut Project, track_id: &str) -> Result<&'a mut Track> {
    // Index first to keep the borrow checker happy with the error path.
    match project.track_index(track_id) {
        Some(i) => Ok(&mut project.tracks[i]),
        None => Err(ClipforgeError::InvalidAction(format!(
            "track '{track_id}' not found"
        ))),
    }
}

fn ensure_unlocked(track: &Track) -> Result<()> {
    if track.locked {
        return Err(ClipforgeError::InvalidAction(format!(
            "track '{}' is locked",
            track.id
        )));
    }
    Ok(())
}

// ── Track actions ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTrack {
    pub track_type: TrackKind,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub track_id: Option<String>,
}

/// Create a new track. Returns the new track's ID.
///
/// The name defaults to `"{Kind} {N+1}"` where N is the number of existing
/// tracks of the same kind.
pub fn create_track(project: &mut Project, params: CreateTrack) -> Result<String> {
    let id = params.track_id.unwrap_or_else(new_track_id);
    if project.track_by_id(&id).is_some() {
        return Err(ClipforgeError::InvalidAction(format!(
            "track '{id}' already exists"
        )));
    }
    let name = params.track_name.unwrap_or_else(|| {
        let existing = project.tracks_by_kind(params.track_type).len();
        format!("{} {}", params.track_type.label(), existing + 1)
    });
    project.tracks.push(Track::new(&id, name, params.track_type));
    Ok(id)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteTrack {
    pub track_id: String,
}

/// Delete a track by ID, preserving the relative order of the remainder.
pub fn delete_track(project: &mut Project, params: DeleteTrack) -> Result<()> {
    match project.track_index(&params.track_id) {
        Some(i) => {
            project.tracks.remove(i);
            Ok(())
        }
        None => Err(ClipforgeError::InvalidAction(format!(
            "track '{}' not found",
            params.track_id
        ))),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderTracks {
    /// A permutation of all existing track IDs, bottom layer first.
    pub order: Vec<String>,
}

/// Rebuild the track sequence in exactly the given order.
pub fn reorder_tracks(project: &mut Project, params: ReorderTracks) -> Result<()> {
    use std::collections::BTreeSet;

    let existing: BTreeSet<&str> = project.tracks.iter().map(|t| t.id.as_str()).collect();
    let given: BTreeSet<&str> = params.order.iter().map(String::as_str).collect();

    if params.order.len() != given.len() {
        return Err(ClipforgeError::InvalidAction(
            "reorder_tracks: duplicate track ids in order".into(),
        ));
    }
    if existing != given {
        let missing: Vec<&str> = existing.difference(&given).copied().collect();
        let unknown: Vec<&str> = given.difference(&existing).copied().collect();
        return Err(ClipforgeError::InvalidAction(format!(
            "reorder_tracks requires a permutation of all track ids (missing: [{}], unknown: [{}])",
            missing.join(", "),
            unknown.join(", ")
        )));
    }

    let mut old = std::mem::take(&mut project.tracks);
    for id in &params.order {
        // Unwrap is safe: set equality was checked above.
        let i = old.iter().position(|t| &t.id == id).unwrap();
        project.tracks.push(old.swap_remove(i));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTrack {
    pub track_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub locked: Option<bool>,
}

/// Partial update of track metadata. Allowed on locked tracks, since this
/// is not a clip-structural mutation.
pub fn update_track(project: &mut Project, params: UpdateTrack) -> Result<()> {
    let track = track_mut(project, &params.track_id)?;
    if let Some(volume) = params.volume {
        if !(0.0..=VOLUME_MAX).contains(&volume) {
            return Err(ClipforgeError::InvalidAction(format!(
                "volume must be within [0.0, {VOLUME_MAX}], got {volume}"
            )));
        }
        track.volume = volume;
    }
    if let Some(name) = params.name {
        track.name = name;
    }
    if let Some(visible) = params.visible {
        track.visible = visible;
    }
    if let Some(locked) = params.locked {
        track.locked = locked;
    }
    Ok(())
}

// ── Clip actions ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppendClip {
    pub track_id: String,
    pub clip_type: ClipKind,
    #[serde(default)]
    pub source: Option<String>,
    pub duration: f64,
    #[serde(default)]
    pub media_start: f64,
    #[serde(default = "default_clip_volume")]
    pub volume: f64,
    #[serde(default)]
    pub clip_id: Option<String>,
}

fn default_clip_volume() -> f64 {
    1.0
}

/// Append a clip to the end of a track. Returns the new clip's ID.
pub fn append_clip(project: &mut Project, params: AppendClip) -> Result<String> {
    let AppendClip {
        track_id,
        clip_type,
        source,
        duration,
        media_start,
        volume,
        clip_id,
    } = params;
    let index = {
        let track = track_mut(project, &track_id)?;
        track.clips.len()
    };
    insert_clip(
        project,
        InsertClip {
            track_id,
            index,
            clip_type,
            source,
            duration,
            media_start,
            volume,
            clip_id,
        },
    )
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertClip {
    pub track_id: String,
    /// 0-based position; equal to the current clip count means append.
    pub index: usize,
    pub clip_type: ClipKind,
    #[serde(default)]
    pub source: Option<String>,
    pub duration: f64,
    #[serde(default)]
    pub media_start: f64,
    #[serde(default = "default_clip_volume")]
    pub volume: f64,
    #[serde(default)]
    pub clip_id: Option<String>,
}

/// Insert a clip at an explicit index. Returns the new clip's ID.
pub fn insert_clip(project: &mut Project, params: InsertClip) -> Result<String> {
    let track = track_mut(project, &params.track_id)?;
    ensure_unlocked(track)?;
    if params.index > track.clips.len() {
        return Err(ClipforgeError::InvalidAction(format!(
            "index {} out of range (track '{}' has {} clips)",
            params.index,
            track.id,
            track.clips.len()
        )));
    }
    let id = params.clip_id.unwrap_or_else(new_clip_id);
    if track.has_clip(&id) {
        return Err(ClipforgeError::InvalidAction(format!(
            "clip '{id}' already exists in track '{}'",
            track.id
        )));
    }
    let clip = Clip::new(&id, params.clip_type, params.source, params.duration)?
        .with_media_start(params.media_start)
        .with_volume(params.volume);
    clip.validate()?;
    track.clips.insert(params.index, clip);
    Ok(id)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertGap {
    pub track_id: String,
    pub index: usize,
    pub duration: f64,
    #[serde(default)]
    pub clip_id: Option<String>,
}

/// Insert a gap spacer: sugar for `insert_clip` with kind `gap` and no source.
pub fn insert_gap(project: &mut Project, params: InsertGap) -> Result<String> {
    insert_clip(
        project,
        InsertClip {
            track_id: params.track_id,
            index: params.index,
            clip_type: ClipKind::Gap,
            source: None,
            duration: params.duration,
            media_start: 0.0,
            volume: 1.0,
            clip_id: params.clip_id,
        },
    )
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteClip {
    pub track_id: String,
    #[serde(default)]
    pub clip_id: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
}

/// Delete a clip, addressed by ID or index (exactly one).
pub fn delete_clip(project: &mut Project, params: DeleteClip) -> Result<()> {
    let track = track_mut(project, &params.track_id)?;
    ensure_unlocked(track)?;
    let index = resolve_clip_index(track, params.clip_id.as_deref(), params.index)?;
    track.clips.remove(index);
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveClip {
    pub track_id: String,
    pub from_index: usize,
    pub to_index: usize,
}

/// Move a clip within its track: pop at `from_index`, insert at `to_index`.
pub fn move_clip(project: &mut Project, params: MoveClip) -> Result<()> {
    let track = track_mut(project, &params.track_id)?;
    ensure_unlocked(track)?;
    let len = track.clips.len();
    for (field, value) in [("from_index", params.from_index), ("to_index", params.to_index)] {
        if value >= len {
            return Err(ClipforgeError::InvalidAction(format!(
                "{field} {value} out of range (track '{}' has {len} clips)",
                track.id
            )));
        }
    }
    let clip = track.clips.remove(params.from_index);
    track.clips.insert(params.to_index, clip);
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrimClip {
    pub track_id: String,
    #[serde(default)]
    pub clip_id: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
    /// New source offset, >= 0.
    #[serde(default)]
    pub media_start: Option<f64>,
    /// New duration, > 0.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Adjust a clip's source window and/or duration.
pub fn trim_clip(project: &mut Project, params: TrimClip) -> Result<()> {
    let track = track_mut(project, &params.track_id)?;
    ensure_unlocked(track)?;
    let index = resolve_clip_index(track, params.clip_id.as_deref(), params.index)?;
    if let Some(duration) = params.duration {
        if duration <= 0.0 {
            return Err(ClipforgeError::InvalidAction(format!(
                "trim duration must be > 0, got {duration}"
            )));
        }
    }
    if let Some(media_start) = params.media_start {
        if media_start < 0.0 {
            return Err(ClipforgeError::InvalidAction(format!(
                "trim media_start must be >= 0, got {media_start}"
            )));
        }
    }
    let clip = &mut track.clips[index];
    if let Some(duration) = params.duration {
        clip.duration = duration;
    }
    if let Some(media_start) = params.media_start {
        clip.media_start = media_start;
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplyEffect {
    pub track_id: String,
    #[serde(default)]
    pub clip_id: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
    pub effect_type: String,
    #[serde(default)]
    pub parameters: std::collections::BTreeMap<String, serde_json::Value>,
}

/// Append a new effect to a clip's effect list. Existing effects are kept;
/// effects apply in list order at render time.
pub fn apply_effect(project: &mut Project, params: ApplyEffect) -> Result<()> {
    let track = track_mut(project, &params.track_id)?;
    let index = resolve_clip_index(track, params.clip_id.as_deref(), params.index)?;
    track.clips[index].effects.push(Effect {
        kind: params.effect_type,
        parameters: params.parameters,
    });
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetClipVolume {
    pub track_id: String,
    #[serde(default)]
    pub clip_id: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
    pub volume: f64,
}

/// Set a clip's volume multiplier.
pub fn set_clip_volume(project: &mut Project, params: SetClipVolume) -> Result<()> {
    let track = track_mut(project, &params.track_id)?;
    let index = resolve_clip_index(track, params.clip_id.as_deref(), params.index)?;
    if !(0.0..=VOLUME_MAX).contains(&params.volume) {
        return Err(ClipforgeError::InvalidAction(format!(
            "volume must be within [0.0, {VOLUME_MAX}], got {}",
            params.volume
        )));
    }
    track.clips[index].volume = params.volume;
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropVertical {
    pub track_id: String,
    #[serde(default)]
    pub clip_id: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default = "default_aspect")]
    pub target_aspect: String,
}

fn default_aspect() -> String {
    "9:16".into()
}

/// Append a centered crop sized to the project's vertical resolution.
///
/// For aspect `W:H`, `crop_width = res_height * W / H` (integer truncation),
/// `crop_height = res_height`, centered horizontally.
pub fn crop_vertical(project: &mut Project, params: CropVertical) -> Result<()> {
    let (aspect_w, aspect_h) = parse_aspect(&params.target_aspect)?;
    let (res_w, res_h) = project.resolution;

    let crop_width = (res_h as u64 * aspect_w as u64 / aspect_h as u64) as i64;
    let crop_height = res_h as i64;
    let x = (res_w as i64 - crop_width).div_euclid(2);

    let track = track_mut(project, &params.track_id)?;
    let index = resolve_clip_index(track, params.clip_id.as_deref(), params.index)?;
    track.clips[index].effects.push(
        Effect::new("crop")
            .with_parameter("width", serde_json::json!(crop_width))
            .with_parameter("height", serde_json::json!(crop_height))
            .with_parameter("x", serde_json::json!(x))
            .with_parameter("y", serde_json::json!(0)),
    );
    Ok(())
}

fn parse_aspect(aspect: &str) -> Result<(u32, u32)> {
    aspect
        .split_once(':')
        .and_then(|(w, h)| {
            let w = w.trim().parse::<u32>().ok()?;
            let h = h.trim().parse::<u32>().ok()?;
            (w > 0 && h > 0).then_some((w, h))
        })
        .ok_or_else(|| {
            ClipforgeError::InvalidAction(format!(
                "invalid aspect ratio '{aspect}': expected 'W:H' with positive integers"
            ))
        })
}
