use image::RgbImage;

use crate::keying::mask::Mask;

/// A 3-channel raster in blue-green-red channel order
///
/// This is the processing encoding of the keyer. Video frames arrive in RGB;
/// converting them through [`BgrImage::from_rgb`] / [`BgrImage::to_rgb`] is the
/// only way across the boundary, so a skipped conversion is a type error rather
/// than silently swapped channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BgrImage {
    /// Create a new image with the given dimensions filled with black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 3) as usize],
        }
    }

    /// Convert an RGB raster into the BGR processing encoding
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut data = Vec::with_capacity((width * height * 3) as usize);

        for pixel in image.pixels() {
            data.push(pixel[2]);
            data.push(pixel[1]);
            data.push(pixel[0]);
        }

        Self { width, height, data }
    }

    /// Convert back to the RGB video encoding
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let [b, g, r] = self.pixel(x, y);
            image::Rgb([r, g, b])
        })
    }

    /// Reconstruct an image from raw BGR bytes
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() == (width * height * 3) as usize {
            Some(Self { width, height, data })
        } else {
            None
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the (width, height) pair
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 3) as usize
    }

    /// Get a pixel as a [b, g, r] triple
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Set a pixel from a [b, g, r] triple
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, bgr: [u8; 3]) {
        let i = self.index(x, y);
        self.data[i] = bgr[0];
        self.data[i + 1] = bgr[1];
        self.data[i + 2] = bgr[2];
    }

    /// Keep pixels where the mask is selected, zero elsewhere
    ///
    /// The mask must have the same dimensions as the image.
    pub fn masked(&self, mask: &Mask) -> BgrImage {
        debug_assert_eq!(self.dimensions(), mask.dimensions());

        let mut out = BgrImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if mask.is_selected(x, y) {
                    out.set_pixel(x, y, self.pixel(x, y));
                }
            }
        }
        out
    }

    /// Element-wise saturating addition of two same-sized images
    pub fn saturating_add(&self, other: &BgrImage) -> BgrImage {
        debug_assert_eq!(self.dimensions(), other.dimensions());

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a.saturating_add(b))
            .collect();

        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Raw BGR bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keying::color::ColorRange;

    #[test]
    fn test_rgb_roundtrip_swaps_channels() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, image::Rgb([10, 20, 30]));
        rgb.put_pixel(1, 0, image::Rgb([200, 100, 50]));

        let bgr = BgrImage::from_rgb(&rgb);
        assert_eq!(bgr.pixel(0, 0), [30, 20, 10]);
        assert_eq!(bgr.pixel(1, 0), [50, 100, 200]);

        assert_eq!(bgr.to_rgb(), rgb);
    }

    #[test]
    fn test_from_raw_rejects_bad_length() {
        assert!(BgrImage::from_raw(2, 2, vec![0; 12]).is_some());
        assert!(BgrImage::from_raw(2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn test_masked_zeroes_unselected_pixels() {
        let mut img = BgrImage::new(2, 1);
        img.set_pixel(0, 0, [0, 255, 0]); // pure green, selected
        img.set_pixel(1, 0, [255, 0, 0]);

        let mask = Mask::in_range(&img, &ColorRange::GREEN_SCREEN);
        let kept = img.masked(&mask);

        assert_eq!(kept.pixel(0, 0), [0, 255, 0]);
        assert_eq!(kept.pixel(1, 0), [0, 0, 0]);
    }

    #[test]
    fn test_saturating_add_clamps() {
        let mut a = BgrImage::new(1, 1);
        let mut b = BgrImage::new(1, 1);
        a.set_pixel(0, 0, [200, 10, 0]);
        b.set_pixel(0, 0, [100, 10, 5]);

        let sum = a.saturating_add(&b);
        assert_eq!(sum.pixel(0, 0), [255, 20, 5]);
    }
}
