//! Encoder settings: codecs and quality/speed presets.

use serde::{Deserialize, Serialize};

/// Video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCodec {
    H264,
    H265,
    Vp9,
}

impl VideoCodec {
    /// FFmpeg encoder name.
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::H264 => "libx264",
            Self::H265 => "libx265",
            Self::Vp9 => "libvpx-vp9",
        }
    }

    /// File extension for this codec.
    pub fn extension(self) -> &'static str {
        match self {
            Self::H264 | Self::H265 => "mp4",
            Self::Vp9 => "webm",
        }
    }
}

/// Audio codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCodec {
    Mp3,
    Aac,
    Pcm,
}

impl AudioCodec {
    /// FFmpeg encoder name.
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Aac => "aac",
            Self::Pcm => "pcm_s16le",
        }
    }
}

/// Encoding speed/quality tradeoff, forwarded opaquely to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodePreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl EncodePreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }
}

/// Render configuration passed alongside the composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub codec: VideoCodec,
    pub audio_codec: AudioCodec,
    pub preset: EncodePreset,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            codec: VideoCodec::H264,
            audio_codec: AudioCodec::Mp3,
            preset: EncodePreset::Medium,
        }
    }
}
