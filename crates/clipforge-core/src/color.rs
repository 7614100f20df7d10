//! RGB color values used for backgrounds and text contrast.

use serde::{Deserialize, Serialize};

/// An sRGB color triple. Serializes as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);

    /// Perceived brightness as the mean channel value, in 0.0..=1.0.
    pub fn brightness(self) -> f64 {
        (self.0 as f64 + self.1 as f64 + self.2 as f64) / (3.0 * 255.0)
    }

    /// Text color with legible contrast against this background.
    pub fn contrast_text(self) -> Rgb {
        if self.brightness() > 0.5 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    /// Hex form without a leading `#`, e.g. `ff8800`.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self(r, g, b)
    }
}
