//! Named project templates.
//!
//! A template is an ordinary project JSON file kept in a template
//! directory. Loading a template yields a fresh `Project` the caller can
//! rename and edit without touching the template itself.

use std::fs;
use std::path::{Path, PathBuf};

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::Project;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TemplateManager {
    template_dir: PathBuf,
}

impl TemplateManager {
    /// Open a template library rooted at `template_dir`, creating it if
    /// needed.
    pub fn new(template_dir: impl Into<PathBuf>) -> Result<Self> {
        let template_dir = template_dir.into();
        fs::create_dir_all(&template_dir).map_err(|e| {
            ClipforgeError::Storage(format!(
                "failed to create template directory {}: {e}",
                template_dir.display()
            ))
        })?;
        Ok(Self { template_dir })
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.template_dir.join(format!("{name}.json"))
    }

    /// Save a project as a template under `name`.
    pub fn save(&self, name: &str, project: &Project) -> Result<()> {
        let path = self.path_for(name);
        project.save_to_file(&path)?;
        debug!(template = name, path = %path.display(), "template saved");
        Ok(())
    }

    /// Load a template, validating like any project load.
    pub fn load(&self, name: &str) -> Result<Project> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ClipforgeError::Storage(format!(
                "template not found: {name}"
            )));
        }
        Project::load_from_file(&path)
    }

    /// Names of all templates, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.template_dir).map_err(|e| {
            ClipforgeError::Storage(format!(
                "failed to read template directory {}: {e}",
                self.template_dir.display()
            ))
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ClipforgeError::Storage(format!("failed to list templates: {e}")))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ClipforgeError::Storage(format!(
                "template not found: {name}"
            )));
        }
        fs::remove_file(&path)
            .map_err(|e| ClipforgeError::Storage(format!("failed to delete '{name}': {e}")))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}
