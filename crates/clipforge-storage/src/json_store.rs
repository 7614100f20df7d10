//! Directory-backed JSON project store.

use std::fs;
use std::path::{Path, PathBuf};

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::Project;
use tracing::debug;

use crate::store::ProjectStore;

/// Stores each project as `<name>.json` under a base directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| {
            ClipforgeError::Storage(format!(
                "failed to create project directory {}: {e}",
                base_dir.display()
            ))
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{name}.json"))
    }
}

impl ProjectStore for JsonStore {
    fn save(&mut self, project: &Project) -> Result<()> {
        let path = self.path_for(&project.name);
        project.save_to_file(&path)?;
        debug!(project = %project.name, path = %path.display(), "project saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Project> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ClipforgeError::Storage(format!("project not found: {name}")));
        }
        Project::load_from_file(&path)
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| {
            ClipforgeError::Storage(format!(
                "failed to read project directory {}: {e}",
                self.base_dir.display()
            ))
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ClipforgeError::Storage(format!("failed to list projects: {e}")))?
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

    fn delete(&mut self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ClipforgeError::Storage(format!("project not found: {name}")));
        }
        fs::remove_file(&path)
            .map_err(|e| ClipforgeError::Storage(format!("failed to delete '{name}': {e}")))
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}
