//! Shared clip resolution: exactly one of `clip_id` or `index`.
//!
//! Every clip-addressing action resolves its target through this helper so
//! the mutual-exclusion rule and the error messages stay consistent.

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::Track;

/// Resolve a clip reference to its index within `track`.
///
/// Exactly one of `clip_id` / `index` must be given; passing both or
/// neither is rejected rather than silently preferring one.
pub fn resolve_clip_index(
    track: &Track,
    clip_id: Option<&str>,
    index: Option<usize>,
) -> Result<usize> {
    match (clip_id, index) {
        (Some(_), Some(_)) => Err(ClipforgeError::InvalidAction(
            "exactly one of clip_id or index must be given (got both)".into(),
        )),
        (None, None) => Err(ClipforgeError::InvalidAction(
            "exactly one of clip_id or index must be given (got neither)".into(),
        )),
        (Some(id), None) => track.clip_index(id).ok_or_else(|| {
            ClipforgeError::InvalidAction(format!("clip '{id}' not found in track '{}'", track.id))
        }),
        (None, Some(i)) => {
            if i >= track.clips.len() {
                return Err(ClipforgeError::InvalidAction(format!(
                    "clip index {i} out of range (track '{}' has {} clips)",
                    track.id,
                    track.clips.len()
                )));
            }
            Ok(i)
        }
    }
}
