use crate::error::{KeyingError, Result};
use crate::keying::color::ColorRange;
use crate::keying::image::BgrImage;
use crate::keying::mask::Mask;

/// Replace the green-screen pixels of `foreground` with the corresponding
/// pixels of `background`
///
/// Both images must have identical dimensions. The green mask and its inverse
/// partition every pixel, the two contributions are extracted disjointly and
/// combined with saturating addition, so every output pixel equals either the
/// original foreground pixel or the original background pixel, never a blend.
pub fn composite(foreground: &BgrImage, background: &BgrImage) -> Result<BgrImage> {
    if foreground.dimensions() != background.dimensions() {
        return Err(KeyingError::DimensionMismatch {
            fg_width: foreground.width(),
            fg_height: foreground.height(),
            bg_width: background.width(),
            bg_height: background.height(),
        }
        .into());
    }

    let mask = Mask::in_range(foreground, &ColorRange::GREEN_SCREEN);
    let mask_inv = mask.invert();

    let fg_kept = foreground.masked(&mask_inv);
    let bg_selected = background.masked(&mask);

    Ok(fg_kept.saturating_add(&bg_selected))
}
