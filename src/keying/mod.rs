//! # Chroma-key Compositor
//!
//! Per-pixel green-screen keying: pixels of a foreground image whose HSV value
//! falls inside a fixed green range are replaced by the corresponding pixel of a
//! background image of identical dimensions.
//!
//! Processing happens in the blue-green-red encoding ([`BgrImage`]); conversion
//! from the RGB video encoding is explicit and only happens at the pipeline
//! boundary.
//!
//! ## Usage
//!
//! ```rust
//! use chroma_compositor::keying::{composite, BgrImage};
//!
//! let foreground = BgrImage::new(2, 2);
//! let background = BgrImage::new(2, 2);
//! let combined = composite(&foreground, &background).unwrap();
//! assert_eq!(combined.dimensions(), (2, 2));
//! ```

pub mod color;
pub mod compositor;
pub mod image;
pub mod mask;

// Re-exports for convenience
pub use color::{bgr_to_hsv, ColorRange, Hsv, GREEN_LOWER, GREEN_UPPER};
pub use compositor::composite;
pub use self::image::BgrImage;
pub use mask::Mask;
