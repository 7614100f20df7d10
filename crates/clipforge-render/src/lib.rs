//! Rendering: flattened projects become encoded video files.
//!
//! [`build_composition`] turns a project into a resolution-stamped layer
//! stack, and [`Renderer`] hands that stack to a [`RenderBackend`]. The
//! stock backend drives an external `ffmpeg` process.

pub mod compose;
pub mod ffmpeg;
pub mod renderer;
pub mod settings;

pub use compose::{build_composition, Composition, Layer, LayerContent};
pub use ffmpeg::FfmpegBackend;
pub use renderer::{ProgressFn, RenderBackend, Renderer};
pub use settings::{AudioCodec, EncodePreset, RenderSettings, VideoCodec};
