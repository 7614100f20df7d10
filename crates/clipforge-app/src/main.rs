//! Clipforge - Timeline-based video assembly
//!
//! Entry point: builds a demo project through the manager façade, prints
//! its summary, and optionally renders it with ffmpeg.

use std::path::PathBuf;

use anyhow::Result;
use clipforge_core::Rgb;
use clipforge_manager::ProjectManager;
use clipforge_render::RenderSettings;
use clipforge_storage::{JsonStore, TemplateManager};
use clipforge_timeline::{ClipKind, TrackKind};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Clipforge starting...");

    let data_dir = std::env::var_os("CLIPFORGE_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("clipforge-data"));
    let output = std::env::args().nth(1).map(PathBuf::from);

    let mut manager = ProjectManager::new(
        Box::new(JsonStore::new(data_dir.join("projects"))?),
        TemplateManager::new(data_dir.join("templates"))?,
    );

    // A small demo timeline: background color, a title, a gap, a closing
    // card.
    manager.create_project("demo", (1920, 1080), 30, Rgb(16, 16, 24))?;
    let text_track = manager
        .default_track(TrackKind::Text)
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow::anyhow!("demo project has no text track"))?;
    manager.append_clip(&text_track, ClipKind::Text, Some("Clipforge".into()), 3.0)?;
    manager.apply(
        "insert_gap",
        json!({ "track_id": text_track, "index": 1, "duration": 1.0 }),
    )?;
    manager.append_clip(&text_track, ClipKind::Text, Some("Cut. Print.".into()), 2.0)?;
    manager.save_project()?;

    let summary = manager.project_info()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(output) = output {
        manager.set_progress_callback(|fraction| {
            info!(percent = (fraction * 100.0).round(), "encoding");
        });
        let path = manager.render(&output, &RenderSettings::default())?;
        info!(output = %path.display(), "render finished");
    }

    Ok(())
}
