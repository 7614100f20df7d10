//! Integration tests for the render path: flatten, compose, and the
//! manager façade driving a substitute backend.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clipforge_core::{Result, Rgb};
use clipforge_manager::ProjectManager;
use clipforge_render::{
    build_composition, Composition, LayerContent, ProgressFn, RenderBackend, RenderSettings,
    Renderer,
};
use clipforge_storage::{MemoryStore, TemplateManager};
use clipforge_timeline::{ClipKind, TrackKind};
use serde_json::json;

/// Backend that records what it was asked to encode.
#[derive(Clone, Default)]
struct CaptureBackend {
    captured: Arc<Mutex<Option<(Composition, PathBuf)>>>,
}

impl RenderBackend for CaptureBackend {
    fn render(
        &self,
        composition: &Composition,
        _settings: &RenderSettings,
        output: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<PathBuf> {
        if let Some(progress) = progress {
            progress(1.0);
        }
        *self.captured.lock().unwrap() = Some((composition.clone(), output.to_path_buf()));
        Ok(output.to_path_buf())
    }
}

fn manager_with_backend(dir: &Path, backend: CaptureBackend) -> ProjectManager {
    ProjectManager::new(
        Box::new(MemoryStore::new()),
        TemplateManager::new(dir.join("templates")).unwrap(),
    )
    .with_renderer(Renderer::with_backend(Box::new(backend)))
}

#[test]
fn invisible_tracks_drop_out_and_come_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_with_backend(dir.path(), CaptureBackend::default());
    manager
        .create_project("vis", (1920, 1080), 30, Rgb::BLACK)
        .unwrap();
    let video = manager.default_track(TrackKind::Video).unwrap().id.clone();
    let text = manager.default_track(TrackKind::Text).unwrap().id.clone();
    manager
        .append_clip(&video, ClipKind::Video, Some("a.mp4".into()), 6.0)
        .unwrap();
    manager
        .append_clip(&text, ClipKind::Text, Some("caption".into()), 8.0)
        .unwrap();

    manager
        .apply("update_track", json!({ "track_id": text, "visible": false }))
        .unwrap();
    let composition = build_composition(manager.project().unwrap()).unwrap();
    assert_eq!(composition.layers.len(), 1);
    // The hidden track still counts toward project duration.
    assert_eq!(composition.duration, 8.0);

    manager
        .apply("update_track", json!({ "track_id": text, "visible": true }))
        .unwrap();
    let composition = build_composition(manager.project().unwrap()).unwrap();
    assert_eq!(composition.layers.len(), 2);
    assert!(composition
        .layers
        .iter()
        .any(|l| matches!(&l.content, LayerContent::Text { text, .. } if text == "caption")));
}

#[test]
fn facade_render_hands_the_backend_a_full_composition() {
    let dir = tempfile::tempdir().unwrap();
    let backend = CaptureBackend::default();
    let mut manager = manager_with_backend(dir.path(), backend.clone());
    manager
        .create_project("out", (1280, 720), 30, Rgb(200, 200, 200))
        .unwrap();
    let text = manager.default_track(TrackKind::Text).unwrap().id.clone();
    manager
        .append_clip(&text, ClipKind::Text, Some("Title".into()), 3.0)
        .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    manager.set_progress_callback(move |fraction| sink.lock().unwrap().push(fraction));

    let output = dir.path().join("out.mp4");
    let path = manager.render(&output, &RenderSettings::default()).unwrap();
    assert_eq!(path, output);
    assert_eq!(*seen.lock().unwrap(), vec![1.0]);

    let captured = backend.captured.lock().unwrap();
    let (composition, captured_path) = captured.as_ref().unwrap();
    assert_eq!(*captured_path, output);
    assert_eq!((composition.width, composition.height), (1280, 720));
    // Light background flips caption text to black.
    match &composition.layers[0].content {
        LayerContent::Text { color, .. } => assert_eq!(*color, Rgb::BLACK),
        other => panic!("unexpected layer content: {other:?}"),
    }
}

#[test]
fn effective_gain_multiplies_clip_and_track_volume() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_with_backend(dir.path(), CaptureBackend::default());
    manager
        .create_project("gain", (1280, 720), 30, Rgb::BLACK)
        .unwrap();
    let audio = manager.default_track(TrackKind::Audio).unwrap().id.clone();
    manager
        .append_clip(&audio, ClipKind::Audio, Some("m.mp3".into()), 4.0)
        .unwrap();
    manager
        .apply(
            "set_clip_volume",
            json!({ "track_id": audio, "index": 0, "volume": 0.5 }),
        )
        .unwrap();
    manager
        .apply("update_track", json!({ "track_id": audio, "volume": 0.5 }))
        .unwrap();

    let composition = build_composition(manager.project().unwrap()).unwrap();
    assert_eq!(composition.layers[0].gain, 0.25);
}

#[test]
fn gap_only_timeline_is_not_renderable() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = manager_with_backend(dir.path(), CaptureBackend::default());
    manager
        .create_project("gaps", (1280, 720), 30, Rgb::BLACK)
        .unwrap();
    let video = manager.default_track(TrackKind::Video).unwrap().id.clone();
    manager
        .apply(
            "insert_gap",
            json!({ "track_id": video, "index": 0, "duration": 5.0 }),
        )
        .unwrap();

    // One clip exists, but flattening yields nothing visible.
    let err = manager
        .render(dir.path().join("out.mp4"), &RenderSettings::default())
        .unwrap_err();
    assert!(err.to_string().contains("no clips to render"));
}
