//! Color generation for new markers.
//!
//! Every marker gets a random color when its drag starts. The three channels
//! are taken from a single random scalar spread over the 24-bit RGB range, so
//! they are correlated rather than sampled independently. Keeping the scalar in
//! the upper part of the range biases the result towards bright colors, which
//! read well as outlines over most photos.

use rand::Rng;

use crate::model::Color;

/// Lower bound (inclusive) of the random brightness scalar.
pub const BRIGHT_SCALAR_MIN: f64 = 0.6;

/// Upper bound (exclusive) of the random brightness scalar.
pub const BRIGHT_SCALAR_MAX: f64 = 1.0;

/// Largest 24-bit RGB value.
const RGB24_MAX: f64 = 0xFF_FFFF as f64;

/// Derive a color from a scalar in `[0, 1]`.
///
/// The scalar is multiplied into the 24-bit range, rounded, then split into
/// `r = n >> 16`, `g = (n >> 8) & 255` and `b = n & 255`.
pub fn color_from_scalar(scalar: f64) -> Color {
    let scalar = scalar.clamp(0.0, 1.0);
    let num = (RGB24_MAX * scalar).round() as u32;
    Color::from_rgb24(num)
}

/// Generate a random bright color.
pub fn random_bright_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let scalar = rng.gen_range(BRIGHT_SCALAR_MIN..BRIGHT_SCALAR_MAX);
    color_from_scalar(scalar)
}
