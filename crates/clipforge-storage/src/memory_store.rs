//! In-memory project store for tests and ephemeral sessions.

use std::collections::BTreeMap;

use clipforge_core::{ClipforgeError, Result};
use clipforge_timeline::Project;

use crate::store::ProjectStore;

/// Keeps projects in a map. Saves and loads clone, so a stored project
/// cannot be mutated behind the store's back.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: BTreeMap<String, Project>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn save(&mut self, project: &Project) -> Result<()> {
        project.validate()?;
        self.projects.insert(project.name.clone(), project.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Project> {
        self.projects
            .get(name)
            .cloned()
            .ok_or_else(|| ClipforgeError::Storage(format!("project not found: {name}")))
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.projects.keys().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        match self.projects.remove(name) {
            Some(_) => Ok(()),
            None => Err(ClipforgeError::Storage(format!(
                "project not found: {name}"
            ))),
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }
}
