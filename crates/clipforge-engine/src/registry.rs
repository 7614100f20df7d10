//! The action registry: named, validated state transitions over a project.
//!
//! The registry is an explicit object rather than process-wide state, so it
//! can be constructed per façade (and per test) without interference.

use std::collections::BTreeMap;

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::Project;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::actions;

type ActionFn = fn(&mut Project, Value) -> Result<()>;

struct ActionEntry {
    doc: &'static str,
    run: ActionFn,
}

/// Registry mapping action names to state-transition functions.
///
/// `execute` is the uniform entry point: it resolves the action by name,
/// deserializes its parameters (unknown parameters fail closed), and
/// normalizes non-domain failures into `InvalidAction` carrying the action
/// name. Domain errors raised inside an action are already `InvalidAction`
/// values and propagate unchanged.
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, ActionEntry>,
}

impl ActionRegistry {
    /// Build a registry with all built-in actions registered.
    pub fn new() -> Self {
        let mut registry = Self {
            actions: BTreeMap::new(),
        };
        registry.register_builtins();
        registry
    }

    fn register(&mut self, name: &'static str, doc: &'static str, run: ActionFn) {
        self.actions.insert(name, ActionEntry { doc, run });
    }

    fn register_builtins(&mut self) {
        self.register(
            "create_track",
            "Create a new track (track_type, optional track_name/track_id).",
            |p, v| run(p, v, actions::create_track),
        );
        self.register(
            "delete_track",
            "Delete a track by id, preserving the order of the rest.",
            |p, v| run(p, v, actions::delete_track),
        );
        self.register(
            "reorder_tracks",
            "Rebuild the track sequence from a permutation of all track ids.",
            |p, v| run(p, v, actions::reorder_tracks),
        );
        self.register(
            "update_track",
            "Partial update of track name/volume/visible/locked.",
            |p, v| run(p, v, actions::update_track),
        );
        self.register(
            "append_clip",
            "Append a clip to the end of a track (auto clip_id if absent).",
            |p, v| run(p, v, actions::append_clip),
        );
        self.register(
            "insert_clip",
            "Insert a clip at an explicit 0-based index (index == len appends).",
            |p, v| run(p, v, actions::insert_clip),
        );
        self.register(
            "insert_gap",
            "Insert a gap spacer that advances time but renders nothing.",
            |p, v| run(p, v, actions::insert_gap),
        );
        self.register(
            "delete_clip",
            "Delete a clip addressed by clip_id or index (exactly one).",
            |p, v| run(p, v, actions::delete_clip),
        );
        self.register(
            "move_clip",
            "Move a clip within its track from from_index to to_index.",
            |p, v| run(p, v, actions::move_clip),
        );
        self.register(
            "trim_clip",
            "Adjust a clip's media_start and/or duration.",
            |p, v| run(p, v, actions::trim_clip),
        );
        self.register(
            "apply_effect",
            "Append an effect (effect_type, parameters) to a clip.",
            |p, v| run(p, v, actions::apply_effect),
        );
        self.register(
            "set_clip_volume",
            "Set a clip's volume multiplier (0.0 to 2.0).",
            |p, v| run(p, v, actions::set_clip_volume),
        );
        self.register(
            "crop_vertical",
            "Append a centered crop to a vertical aspect such as 9:16.",
            |p, v| run(p, v, actions::crop_vertical),
        );
    }

    /// Execute a named action against the project.
    pub fn execute(&self, name: &str, project: &mut Project, params: Value) -> Result<()> {
        let entry = self.actions.get(name).ok_or_else(|| {
            ClipforgeError::UnknownAction {
                name: name.to_string(),
                available: self.names(),
            }
        })?;
        (entry.run)(project, params).map_err(|e| match e {
            e @ ClipforgeError::InvalidAction(_) => e,
            other => ClipforgeError::InvalidAction(format!("action '{name}' failed: {other}")),
        })
    }

    /// All registered action names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.actions.keys().map(|k| k.to_string()).collect()
    }

    /// Documentation for a registered action.
    pub fn describe(&self, name: &str) -> Result<&'static str> {
        self.actions
            .get(name)
            .map(|e| e.doc)
            .ok_or_else(|| ClipforgeError::UnknownAction {
                name: name.to_string(),
                available: self.names(),
            })
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize the parameter envelope and invoke a typed action function,
/// discarding its return value.
fn run<P, T>(project: &mut Project, params: Value, action: fn(&mut Project, P) -> Result<T>) -> Result<()>
where
    P: DeserializeOwned,
{
    let params: P = serde_json::from_value(params)
        .map_err(|e| ClipforgeError::Serialization(format!("invalid parameters: {e}")))?;
    action(project, params).map(|_| ())
}
