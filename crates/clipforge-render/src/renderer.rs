//! Render orchestration.

use std::path::{Path, PathBuf};

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::Project;
use tracing::info;

use crate::compose::{build_composition, Composition};
use crate::ffmpeg::FfmpegBackend;
use crate::settings::RenderSettings;

/// Progress callback, invoked with a fraction in `0.0..=1.0`.
pub type ProgressFn = dyn Fn(f64) + Send + Sync;

/// Encoder seam. The default implementation shells out to ffmpeg; tests
/// substitute an in-process backend.
pub trait RenderBackend: Send + Sync {
    fn render(
        &self,
        composition: &Composition,
        settings: &RenderSettings,
        output: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<PathBuf>;
}

/// Turns a project into an encoded file via a pluggable backend.
pub struct Renderer {
    backend: Box<dyn RenderBackend>,
    progress: Option<Box<ProgressFn>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_backend(Box::new(FfmpegBackend::new()))
    }

    pub fn with_backend(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            progress: None,
        }
    }

    /// Register a callback that receives encode progress fractions.
    pub fn set_progress_callback(&mut self, callback: impl Fn(f64) + Send + Sync + 'static) {
        self.progress = Some(Box::new(callback));
    }

    /// Flatten the project, compose layers, and hand off to the backend.
    pub fn render(
        &self,
        project: &Project,
        output: impl AsRef<Path>,
        settings: &RenderSettings,
    ) -> Result<PathBuf> {
        let output = output.as_ref();
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ClipforgeError::Render(format!(
                        "failed to create output directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let composition = build_composition(project)?;
        info!(
            project = %project.name,
            layers = composition.layers.len(),
            duration = composition.duration,
            output = %output.display(),
            "rendering project"
        );
        self.backend
            .render(&composition, settings, output, self.progress.as_deref())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
