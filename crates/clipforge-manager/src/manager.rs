//! The `ProjectManager` façade.
//!
//! One object that owns the active project and wires together the action
//! registry, the store, the template library, and the renderer. Every
//! mutation of the active project goes through [`ProjectManager::apply`],
//! so the validated-action contract holds no matter who drives it.

use std::path::{Path, PathBuf};

use clipforge_core::{ClipforgeError, Rgb, Result};
use clipforge_engine::ActionRegistry;
use clipforge_render::{Renderer, RenderSettings};
use clipforge_storage::{ProjectStore, TemplateManager};
use clipforge_timeline::{ClipKind, Project, Track, TrackKind};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

/// Summary of one clip, with its derived timeline position.
#[derive(Debug, Clone, Serialize)]
pub struct ClipInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    pub source: Option<String>,
    /// Derived start time: the sum of preceding clip durations.
    pub start: f64,
    pub duration: f64,
    pub volume: f64,
    pub effect_count: usize,
}

/// Summary of one track.
#[derive(Debug, Clone, Serialize)]
pub struct TrackInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub volume: f64,
    pub visible: bool,
    pub locked: bool,
    pub duration: f64,
    pub clips: Vec<ClipInfo>,
}

/// Snapshot of the active project for display or export to a caller.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub resolution: (u32, u32),
    pub fps: u32,
    pub duration: f64,
    pub track_count: usize,
    pub clip_count: usize,
    pub tracks: Vec<TrackInfo>,
}

pub struct ProjectManager {
    store: Box<dyn ProjectStore>,
    templates: TemplateManager,
    registry: ActionRegistry,
    renderer: Renderer,
    project: Option<Project>,
}

impl ProjectManager {
    pub fn new(store: Box<dyn ProjectStore>, templates: TemplateManager) -> Self {
        Self {
            store,
            templates,
            registry: ActionRegistry::new(),
            renderer: Renderer::new(),
            project: None,
        }
    }

    /// Swap the render backend (tests, alternative encoders).
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    fn active(&self) -> Result<&Project> {
        self.project
            .as_ref()
            .ok_or_else(|| ClipforgeError::InvalidAction("no active project".into()))
    }

    fn active_mut(&mut self) -> Result<&mut Project> {
        self.project
            .as_mut()
            .ok_or_else(|| ClipforgeError::InvalidAction("no active project".into()))
    }

    // ── Project lifecycle ───────────────────────────────────────────

    /// Create a fresh project with one video, one audio, and one text
    /// track, and make it active.
    pub fn create_project(
        &mut self,
        name: impl Into<String>,
        resolution: (u32, u32),
        fps: u32,
        background_color: Rgb,
    ) -> Result<&Project> {
        let project = Project::new(name, resolution, fps, background_color)?;
        info!(project = %project.name, "project created");
        self.project = Some(project);
        for kind in ["video", "audio", "text"] {
            self.apply("create_track", json!({ "track_type": kind }))?;
        }
        self.active()
    }

    /// Instantiate a template under a new project name and make it active.
    pub fn load_template(
        &mut self,
        template_name: &str,
        project_name: impl Into<String>,
    ) -> Result<&Project> {
        let mut project = self.templates.load(template_name)?;
        project.name = project_name.into();
        info!(template = template_name, project = %project.name, "template instantiated");
        self.project = Some(project);
        self.active()
    }

    /// Persist the active project under its own name.
    pub fn save_project(&mut self) -> Result<()> {
        let project = self
            .project
            .as_ref()
            .ok_or_else(|| ClipforgeError::InvalidAction("no active project".into()))?;
        self.store.save(project)
    }

    /// Load a stored project and make it active.
    pub fn load_project(&mut self, name: &str) -> Result<&Project> {
        let project = self.store.load(name)?;
        self.project = Some(project);
        self.active()
    }

    pub fn list_projects(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    pub fn close_project(&mut self) -> Option<Project> {
        self.project.take()
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Run a named action against the active project. The sole mutation
    /// entry point.
    pub fn apply(&mut self, action: &str, params: Value) -> Result<()> {
        let project = self
            .project
            .as_mut()
            .ok_or_else(|| ClipforgeError::InvalidAction("no active project".into()))?;
        self.registry.execute(action, project, params)?;
        info!(action, "action applied");
        Ok(())
    }

    /// Registered action names.
    pub fn actions(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn describe_action(&self, name: &str) -> Result<&'static str> {
        self.registry.describe(name)
    }

    /// Typed shortcut for `create_track`. Returns the new track's ID.
    pub fn create_track(&mut self, kind: TrackKind, name: Option<String>) -> Result<String> {
        let project = self.active_mut()?;
        clipforge_engine::actions::create_track(
            project,
            clipforge_engine::actions::CreateTrack {
                track_type: kind,
                track_name: name,
                track_id: None,
            },
        )
    }

    /// Typed shortcut for `append_clip`. Returns the new clip's ID.
    pub fn append_clip(
        &mut self,
        track_id: &str,
        clip_type: ClipKind,
        source: Option<String>,
        duration: f64,
    ) -> Result<String> {
        let project = self.active_mut()?;
        clipforge_engine::actions::append_clip(
            project,
            clipforge_engine::actions::AppendClip {
                track_id: track_id.into(),
                clip_type,
                source,
                duration,
                media_start: 0.0,
                volume: 1.0,
                clip_id: None,
            },
        )
    }

    /// Typed shortcut for `insert_clip`. Returns the new clip's ID.
    pub fn insert_clip(
        &mut self,
        track_id: &str,
        index: usize,
        clip_type: ClipKind,
        source: Option<String>,
        duration: f64,
    ) -> Result<String> {
        let project = self.active_mut()?;
        clipforge_engine::actions::insert_clip(
            project,
            clipforge_engine::actions::InsertClip {
                track_id: track_id.into(),
                index,
                clip_type,
                source,
                duration,
                media_start: 0.0,
                volume: 1.0,
                clip_id: None,
            },
        )
    }

    /// First track of the given kind, in layer order.
    pub fn default_track(&self, kind: TrackKind) -> Option<&Track> {
        self.project
            .as_ref()
            .and_then(|p| p.tracks.iter().find(|t| t.kind == kind))
    }

    // ── Introspection ───────────────────────────────────────────────

    /// Snapshot the active project, with derived clip start times.
    pub fn project_info(&self) -> Result<ProjectInfo> {
        let project = self.active()?;
        let tracks = project
            .tracks
            .iter()
            .map(|track| {
                let mut start = 0.0;
                let clips = track
                    .clips
                    .iter()
                    .map(|clip| {
                        let info = ClipInfo {
                            id: clip.id.clone(),
                            kind: clip.kind,
                            source: clip.source.clone(),
                            start,
                            duration: clip.duration,
                            volume: clip.volume,
                            effect_count: clip.effects.len(),
                        };
                        start += clip.duration;
                        info
                    })
                    .collect();
                TrackInfo {
                    id: track.id.clone(),
                    name: track.name.clone(),
                    kind: track.kind,
                    volume: track.volume,
                    visible: track.visible,
                    locked: track.locked,
                    duration: track.duration(),
                    clips,
                }
            })
            .collect();
        Ok(ProjectInfo {
            name: project.name.clone(),
            resolution: project.resolution,
            fps: project.fps,
            duration: project.total_duration(),
            track_count: project.tracks.len(),
            clip_count: project.clip_count(),
            tracks,
        })
    }

    // ── Templates ───────────────────────────────────────────────────

    pub fn templates(&self) -> Result<Vec<String>> {
        self.templates.list()
    }

    /// Save the active project as a template.
    pub fn save_template(&self, name: &str) -> Result<()> {
        self.templates.save(name, self.active()?)
    }

    // ── Render ──────────────────────────────────────────────────────

    /// Render the active project. Fails fast when there is nothing to
    /// encode.
    pub fn render(&self, output: impl AsRef<Path>, settings: &RenderSettings) -> Result<PathBuf> {
        let project = self.active()?;
        if project.clip_count() == 0 {
            return Err(ClipforgeError::Render("no clips to render".into()));
        }
        self.renderer.render(project, output, settings)
    }

    /// Forward encode progress fractions to a callback.
    pub fn set_progress_callback(&mut self, callback: impl Fn(f64) + Send + Sync + 'static) {
        self.renderer.set_progress_callback(callback);
    }
}
