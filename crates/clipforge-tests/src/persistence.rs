//! Integration tests for persistence: store round-trips and the manager
//! façade driving storage and templates together.

use clipforge_core::Rgb;
use clipforge_manager::ProjectManager;
use clipforge_storage::{JsonStore, MemoryStore, ProjectStore, TemplateManager};
use clipforge_timeline::{ClipKind, Project, TrackKind};
use serde_json::json;

fn manager_in(dir: &std::path::Path) -> ProjectManager {
    ProjectManager::new(
        Box::new(JsonStore::new(dir.join("projects")).unwrap()),
        TemplateManager::new(dir.join("templates")).unwrap(),
    )
}

#[test]
fn edited_project_survives_a_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_in(dir.path());
    manager
        .create_project("roundtrip", (1920, 1080), 30, Rgb(10, 20, 30))
        .unwrap();

    let video = manager.default_track(TrackKind::Video).unwrap().id.clone();
    manager
        .append_clip(&video, ClipKind::Video, Some("intro.mp4".into()), 5.0)
        .unwrap();
    manager
        .apply(
            "apply_effect",
            json!({ "track_id": video, "index": 0, "effect_type": "fade",
                    "parameters": { "fade_in": 1.0, "fade_out": 1.0 } }),
        )
        .unwrap();
    manager
        .apply(
            "update_track",
            json!({ "track_id": video, "volume": 0.5, "visible": false }),
        )
        .unwrap();
    manager.save_project().unwrap();
    let original = manager.project().unwrap().clone();

    let mut fresh = manager_in(dir.path());
    let reloaded = fresh.load_project("roundtrip").unwrap();
    assert_eq!(*reloaded, original);
}

#[test]
fn raw_json_round_trip_preserves_equality() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_in(dir.path());
    manager
        .create_project("json", (1280, 720), 60, Rgb::WHITE)
        .unwrap();
    let text = manager.default_track(TrackKind::Text).unwrap().id.clone();
    manager
        .append_clip(&text, ClipKind::Text, Some("hello".into()), 2.5)
        .unwrap();

    let project = manager.project().unwrap();
    let roundtripped = Project::from_json(&project.to_json().unwrap()).unwrap();
    assert_eq!(roundtripped, *project);
}

#[test]
fn memory_and_json_stores_agree() {
    let dir = tempfile::tempdir().unwrap();
    let mut json_store = JsonStore::new(dir.path()).unwrap();
    let mut memory_store = MemoryStore::new();

    let project = Project::new("shared", (1920, 1080), 30, Rgb::BLACK).unwrap();
    json_store.save(&project).unwrap();
    memory_store.save(&project).unwrap();

    assert_eq!(
        json_store.load("shared").unwrap(),
        memory_store.load("shared").unwrap()
    );
    assert_eq!(json_store.list().unwrap(), memory_store.list().unwrap());
}

#[test]
fn template_instantiation_keeps_structure_not_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_in(dir.path());
    manager
        .create_project("master", (1080, 1920), 30, Rgb::BLACK)
        .unwrap();
    let video = manager.default_track(TrackKind::Video).unwrap().id.clone();
    manager
        .apply("crop_vertical", json!({ "track_id": video, "index": 0 }))
        .unwrap_err(); // no clips yet, addressing must fail
    manager
        .append_clip(&video, ClipKind::Image, Some("bg.png".into()), 4.0)
        .unwrap();
    manager.save_template("shorts").unwrap();

    let instance = manager.load_template("shorts", "episode-1").unwrap();
    assert_eq!(instance.name, "episode-1");
    assert_eq!(instance.clip_count(), 1);
    assert_eq!(instance.resolution, (1080, 1920));
}

#[test]
fn corrupt_store_file_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let store = JsonStore::new(dir.path()).unwrap();
    assert!(store.load("broken").is_err());
}
