//! Clipforge Timeline - Timeline data model
//!
//! Implements the timeline structure:
//! - Projects containing ordered tracks (layer order)
//! - Tracks containing ordered clips (timeline order)
//! - Derived clip positions: a clip's start time is the sum of preceding
//!   clip durations in its track, never stored
//! - JSON serialization with load-time re-validation

pub mod clip;
pub mod project;
pub mod serialization;
pub mod track;

pub use clip::{Clip, ClipKind, Effect, VOLUME_MAX};
pub use project::{Project, MAX_FPS, MAX_RESOLUTION};
pub use track::{Track, TrackKind};
