//! Project JSON serialization.
//!
//! The persisted layout mirrors the `Project` structure exactly. Loading
//! re-validates every invariant; invalid data fails, it is never repaired.

use std::path::Path;

use clipforge_core::{ClipforgeError, Result};

use crate::project::Project;

impl Project {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClipforgeError::Serialization(format!("failed to serialize project: {e}")))
    }

    /// Deserialize from JSON and re-validate all invariants.
    pub fn from_json(data: &str) -> Result<Self> {
        let project: Project = serde_json::from_str(data)
            .map_err(|e| ClipforgeError::Serialization(format!("invalid project JSON: {e}")))?;
        project.validate()?;
        Ok(project)
    }

    /// Save to a file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from a file path, re-validating on the way in.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}
