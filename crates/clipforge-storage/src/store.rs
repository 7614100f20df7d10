//! Persistence seam for projects.

use clipforge_core::Result;
use clipforge_timeline::Project;

/// Where projects live. Implementations must validate on load so that a
/// store never hands back a project that violates timeline invariants.
pub trait ProjectStore: Send {
    /// Persist a project under its own name, replacing any previous copy.
    fn save(&mut self, project: &Project) -> Result<()>;

    /// Load a project by name. `Storage` error if absent.
    fn load(&self, name: &str) -> Result<Project>;

    /// Names of all stored projects, sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Remove a stored project. `Storage` error if absent.
    fn delete(&mut self, name: &str) -> Result<()>;

    fn exists(&self, name: &str) -> bool;
}
