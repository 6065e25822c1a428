use crate::keying::color::{bgr_to_hsv, ColorRange};
use crate::keying::image::BgrImage;

/// Mask element value for a selected pixel
pub const SELECTED: u8 = 255;

/// A single-channel raster marking pixels as selected (255) or not (0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Build a mask selecting every pixel whose HSV value lies inside `range`
    ///
    /// The range test is inclusive on both ends, so pixels exactly on a bound
    /// are selected.
    pub fn in_range(image: &BgrImage, range: &ColorRange) -> Mask {
        let (width, height) = image.dimensions();
        let mut data = Vec::with_capacity((width * height) as usize);

        for y in 0..height {
            for x in 0..width {
                let [b, g, r] = image.pixel(x, y);
                let selected = range.contains(bgr_to_hsv(b, g, r));
                data.push(if selected { SELECTED } else { 0 });
            }
        }

        Mask { width, height, data }
    }

    /// The complement mask: selected where `self` is not, and vice versa
    pub fn invert(&self) -> Mask {
        Mask {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| !v).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        self.data[(y * self.width + x) as usize] == SELECTED
    }

    /// Number of selected pixels
    pub fn selected_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == SELECTED).count()
    }
}
