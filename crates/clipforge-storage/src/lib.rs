//! Persistence: project stores and the template library.

pub mod json_store;
pub mod memory_store;
pub mod store;
pub mod templates;

pub use json_store::JsonStore;
pub use memory_store::MemoryStore;
pub use store::ProjectStore;
pub use templates::TemplateManager;
