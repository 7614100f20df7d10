//! Clipforge Core - Foundation types for the timeline engine
//!
//! This crate provides the fundamental types used throughout clipforge:
//! - The workspace-wide error type and `Result` alias
//! - RGB color values (backgrounds, text contrast)

pub mod color;
pub mod error;

pub use color::Rgb;
pub use error::{ClipforgeError, Result};
