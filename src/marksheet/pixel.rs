use image::{Rgb, RgbImage};

/// True when every channel is at or below `threshold`.
pub fn is_dark(pixel: &Rgb<u8>, threshold: u8) -> bool {
    pixel.0.iter().all(|&c| c <= threshold)
}

/// Dark-pixel test over a borrowed scan.
///
/// Band detection and mark extraction both need "is this pixel ink, and is
/// its neighbor ink too"; this keeps the threshold next to the image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InkMap<'a> {
    image: &'a RgbImage,
    threshold: u8,
}

impl<'a> InkMap<'a> {
    pub(crate) fn new(image: &'a RgbImage, threshold: u8) -> Self {
        Self { image, threshold }
    }

    pub(crate) fn width(&self) -> u32 {
        self.image.width()
    }

    pub(crate) fn height(&self) -> u32 {
        self.image.height()
    }

    pub(crate) fn dark(&self, x: u32, y: u32) -> bool {
        is_dark(self.image.get_pixel(x, y), self.threshold)
    }

    /// Dark pixel that is not the continuation of ink from `(x - 1, y)`.
    ///
    /// Returns `None` for a dark pixel whose left neighbor is also dark, so
    /// callers can skip it without treating it as background.
    pub(crate) fn leading_from_left(&self, x: u32, y: u32) -> Option<bool> {
        let dark = self.dark(x, y);
        if dark && x > 0 && self.dark(x - 1, y) {
            None
        } else {
            Some(dark)
        }
    }

    /// Same as [`Self::leading_from_left`] with `(x, y - 1)` as the neighbor.
    pub(crate) fn leading_from_above(&self, x: u32, y: u32) -> Option<bool> {
        let dark = self.dark(x, y);
        if dark && y > 0 && self.dark(x, y - 1) {
            None
        } else {
            Some(dark)
        }
    }
}
