//! Integration tests for the editing pipeline.
//!
//! Drives the action registry with raw JSON parameters, exactly as an
//! external caller would, and checks the derived timeline that results.

use clipforge_core::Rgb;
use clipforge_engine::{flatten, ActionRegistry};
use clipforge_timeline::Project;
use serde_json::json;

// ── Helpers ────────────────────────────────────────────────────

fn empty_project() -> Project {
    Project::new("Integration Test Project", (1920, 1080), 30, Rgb::BLACK).unwrap()
}

fn project_with_text_track() -> (ActionRegistry, Project) {
    let registry = ActionRegistry::new();
    let mut project = empty_project();
    registry
        .execute(
            "create_track",
            &mut project,
            json!({ "track_type": "text", "track_id": "t1" }),
        )
        .unwrap();
    (registry, project)
}

fn append_text(registry: &ActionRegistry, project: &mut Project, id: &str, secs: f64) {
    registry
        .execute(
            "append_clip",
            project,
            json!({
                "track_id": "t1",
                "clip_type": "text",
                "source": format!("caption {id}"),
                "duration": secs,
                "clip_id": id,
            }),
        )
        .unwrap();
}

// ── Derived positions ──────────────────────────────────────────

#[test]
fn two_text_clips_yield_back_to_back_layers() {
    let (registry, mut project) = project_with_text_track();
    append_text(&registry, &mut project, "c1", 5.0);
    append_text(&registry, &mut project, "c2", 3.0);

    assert_eq!(project.total_duration(), 8.0);
    let placed = flatten(&project);
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].start, 0.0);
    assert_eq!(placed[1].start, 5.0);
    assert_eq!(placed[1].clip.id, "c2");
}

#[test]
fn deleting_the_first_clip_shifts_the_second_to_zero() {
    let (registry, mut project) = project_with_text_track();
    append_text(&registry, &mut project, "c1", 5.0);
    append_text(&registry, &mut project, "c2", 3.0);

    registry
        .execute(
            "delete_clip",
            &mut project,
            json!({ "track_id": "t1", "clip_id": "c1" }),
        )
        .unwrap();

    let placed = flatten(&project);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].clip.id, "c2");
    assert_eq!(placed[0].start, 0.0);
    assert_eq!(project.total_duration(), 3.0);
}

#[test]
fn gaps_take_up_time_but_do_not_flatten() {
    let (registry, mut project) = project_with_text_track();
    append_text(&registry, &mut project, "c1", 2.0);
    registry
        .execute(
            "insert_gap",
            &mut project,
            json!({ "track_id": "t1", "index": 1, "duration": 4.0 }),
        )
        .unwrap();
    append_text(&registry, &mut project, "c2", 1.0);

    assert_eq!(project.total_duration(), 7.0);
    let placed = flatten(&project);
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[1].start, 6.0);
}

#[test]
fn move_clip_to_same_index_is_a_no_op() {
    let (registry, mut project) = project_with_text_track();
    append_text(&registry, &mut project, "c1", 5.0);
    append_text(&registry, &mut project, "c2", 3.0);
    let before = project.clone();

    registry
        .execute(
            "move_clip",
            &mut project,
            json!({ "track_id": "t1", "from_index": 1, "to_index": 1 }),
        )
        .unwrap();
    assert_eq!(project, before);
}

// ── Locked tracks ──────────────────────────────────────────────

#[test]
fn locked_track_rejects_structure_and_stays_identical() {
    let (registry, mut project) = project_with_text_track();
    append_text(&registry, &mut project, "c1", 5.0);
    registry
        .execute(
            "update_track",
            &mut project,
            json!({ "track_id": "t1", "locked": true }),
        )
        .unwrap();
    let before = project.clone();

    for (action, params) in [
        (
            "append_clip",
            json!({ "track_id": "t1", "clip_type": "text", "source": "x", "duration": 1.0 }),
        ),
        (
            "insert_gap",
            json!({ "track_id": "t1", "index": 0, "duration": 1.0 }),
        ),
        ("delete_clip", json!({ "track_id": "t1", "clip_id": "c1" })),
        (
            "move_clip",
            json!({ "track_id": "t1", "from_index": 0, "to_index": 0 }),
        ),
        (
            "trim_clip",
            json!({ "track_id": "t1", "clip_id": "c1", "duration": 2.0 }),
        ),
    ] {
        let err = registry.execute(action, &mut project, params).unwrap_err();
        assert!(
            err.to_string().contains("locked"),
            "{action}: unexpected error {err}"
        );
    }
    assert_eq!(project, before);
}

#[test]
fn locked_track_still_accepts_non_structural_edits() {
    let (registry, mut project) = project_with_text_track();
    append_text(&registry, &mut project, "c1", 5.0);
    registry
        .execute(
            "update_track",
            &mut project,
            json!({ "track_id": "t1", "locked": true }),
        )
        .unwrap();

    registry
        .execute(
            "set_clip_volume",
            &mut project,
            json!({ "track_id": "t1", "clip_id": "c1", "volume": 0.25 }),
        )
        .unwrap();
    registry
        .execute(
            "apply_effect",
            &mut project,
            json!({ "track_id": "t1", "clip_id": "c1", "effect_type": "fade",
                    "parameters": { "fade_in": 0.5 } }),
        )
        .unwrap();

    let clip = project.tracks[0].clip_by_id("c1").unwrap();
    assert_eq!(clip.volume, 0.25);
    assert_eq!(clip.effects.len(), 1);
}

// ── crop_vertical ──────────────────────────────────────────────

#[test]
fn crop_vertical_centers_a_9_16_window_on_1080p() {
    let registry = ActionRegistry::new();
    let mut project = empty_project();
    registry
        .execute(
            "create_track",
            &mut project,
            json!({ "track_type": "video", "track_id": "v1" }),
        )
        .unwrap();
    registry
        .execute(
            "append_clip",
            &mut project,
            json!({ "track_id": "v1", "clip_type": "video", "source": "a.mp4",
                    "duration": 10.0, "clip_id": "c1" }),
        )
        .unwrap();
    registry
        .execute(
            "crop_vertical",
            &mut project,
            json!({ "track_id": "v1", "clip_id": "c1" }),
        )
        .unwrap();

    let effect = &project.tracks[0].clips[0].effects[0];
    assert_eq!(effect.kind, "crop");
    assert_eq!(effect.parameters["width"], json!(607));
    assert_eq!(effect.parameters["height"], json!(1080));
    assert_eq!(effect.parameters["x"], json!(656));
    assert_eq!(effect.parameters["y"], json!(0));
}

// ── Registry error contract ────────────────────────────────────

#[test]
fn unknown_parameters_fail_closed() {
    let (registry, mut project) = project_with_text_track();
    let before = project.clone();

    let err = registry
        .execute(
            "append_clip",
            &mut project,
            json!({ "track_id": "t1", "clip_type": "text", "source": "x",
                    "duration": 1.0, "position": 3.5 }),
        )
        .unwrap_err();
    assert!(err.to_string().contains("append_clip"));
    assert_eq!(project, before);
}

#[test]
fn unknown_action_lists_the_registry() {
    let registry = ActionRegistry::new();
    let mut project = empty_project();
    let err = registry
        .execute("rotate_clip", &mut project, json!({}))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Unknown action 'rotate_clip'"));
    assert!(message.contains("crop_vertical"));
    assert!(message.contains("reorder_tracks"));
}
