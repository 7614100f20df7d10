//! Orchestration façade over the timeline, engine, storage, and render
//! crates.

pub mod manager;
pub mod search;

pub use manager::{ClipInfo, ProjectInfo, ProjectManager, TrackInfo};
pub use search::{MediaProvider, MediaType, SearchResult};
