//! Clipforge Engine - Actions and flattening
//!
//! The mutation and derivation layer over the timeline data model:
//! - A registry of named, validated state-transition actions
//! - Typed per-action parameter structs (unknown parameters fail closed)
//! - The shared id-XOR-index clip selector
//! - The pure timeline flattener (clip order to absolute start times)

pub mod actions;
pub mod flatten;
pub mod registry;
pub mod selector;

pub use flatten::{flatten, PlacedClip};
pub use registry::ActionRegistry;
pub use selector::resolve_clip_index;
