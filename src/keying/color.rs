//! HSV (Hue-Saturation-Value) conversion for the 8-bit rasters used by the keyer.
//!
//! The 8-bit convention here matches the integer rasters the green-screen bounds
//! were calibrated against: H is the hue angle halved (0..=179 covers the full
//! wheel), S and V span 0..=255.

/// One pixel in HSV space, 8-bit convention (H halved to 0..=179)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// Lower green-screen bound. Fixed by design, not configurable.
pub const GREEN_LOWER: Hsv = Hsv { h: 35, s: 100, v: 100 };

/// Upper green-screen bound. Fixed by design, not configurable.
pub const GREEN_UPPER: Hsv = Hsv { h: 85, s: 255, v: 255 };

/// Inclusive lower/upper bounds in HSV space.
///
/// A pixel is inside the range when every channel lies within its bounds,
/// inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ColorRange {
    /// The fixed range that counts as "green screen"
    pub const GREEN_SCREEN: ColorRange = ColorRange {
        lower: GREEN_LOWER,
        upper: GREEN_UPPER,
    };

    /// Per-channel inclusive containment test
    #[inline]
    pub fn contains(&self, pixel: Hsv) -> bool {
        self.lower.h <= pixel.h
            && pixel.h <= self.upper.h
            && self.lower.s <= pixel.s
            && pixel.s <= self.upper.s
            && self.lower.v <= pixel.v
            && pixel.v <= self.upper.v
    }
}

/// Convert an 8-bit BGR pixel to 8-bit HSV
///
/// V is the channel maximum; S is the chroma relative to V scaled to 0..=255;
/// H is the hue angle in degrees halved and rounded to nearest. Achromatic
/// pixels (zero chroma) report H = 0, S = 0.
#[inline]
pub fn bgr_to_hsv(b: u8, g: u8, r: u8) -> Hsv {
    let bf = b as f32;
    let gf = g as f32;
    let rf = r as f32;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max as u8;

    if delta <= f32::EPSILON {
        // Achromatic case
        return Hsv { h: 0, s: 0, v };
    }

    let s = (255.0 * delta / max).round() as u8;

    let degrees = if (max - rf).abs() <= f32::EPSILON {
        let mut h = 60.0 * (gf - bf) / delta;
        if h < 0.0 {
            h += 360.0;
        }
        h
    } else if (max - gf).abs() <= f32::EPSILON {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };

    // Halve to fit the wheel into 0..=179
    let h = ((degrees / 2.0).round() as u16 % 180) as u8;

    Hsv { h, s, v }
}
