//! Stock-media search result value type.
//!
//! Search itself happens outside this workspace; results cross the
//! boundary as plain data so a caller can turn one into an `append_clip`
//! action without any network types leaking in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaProvider {
    Pexels,
    Pixabay,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Audio,
}

/// One hit from an external media search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    /// Download URL for the full asset.
    pub url: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    pub provider: MediaProvider,
    pub media_type: MediaType,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}
