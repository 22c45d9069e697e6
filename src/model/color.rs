//! Marker color data model.

use std::fmt;

/// An RGB color assigned to a marker when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack the color into a `0xRRGGBB` integer.
    pub fn to_rgb24(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Split a `0xRRGGBB` integer into channels. Bits above 24 are ignored.
    pub fn from_rgb24(num: u32) -> Self {
        Self {
            r: ((num >> 16) & 0xFF) as u8,
            g: ((num >> 8) & 0xFF) as u8,
            b: (num & 0xFF) as u8,
        }
    }

    /// Channels as an array, the shape renderers usually want.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
