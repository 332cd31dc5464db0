//! Default frame sink: one palette index per pixel.

use ricoh_ppu_2c02::{FB_HEIGHT, FB_WIDTH, FrameSink};

/// 256×240 buffer of 6-bit NES palette indices.
///
/// Colour conversion is left to whoever displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    pixels: Vec<u8>,
}

impl IndexedFrame {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pixels: vec![0; FB_WIDTH * FB_HEIGHT],
        }
    }

    /// Row-major palette indices.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette index at (`x`, `y`), or `None` off-screen.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < FB_WIDTH && y < FB_HEIGHT {
            Some(self.pixels[y * FB_WIDTH + x])
        } else {
            None
        }
    }
}

impl Default for IndexedFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for IndexedFrame {
    fn put_pixel(&mut self, x: u8, y: u8, color: u8) {
        if let Some(slot) = self
            .pixels
            .get_mut(usize::from(y) * FB_WIDTH + usize::from(x))
        {
            *slot = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_row_major() {
        let mut frame = IndexedFrame::new();
        frame.put_pixel(255, 239, 0x2A);
        frame.put_pixel(1, 0, 0x11);
        assert_eq!(frame.pixel(255, 239), Some(0x2A));
        assert_eq!(frame.pixels()[1], 0x11);
        assert_eq!(frame.pixel(256, 0), None);
        assert_eq!(frame.pixels().len(), FB_WIDTH * FB_HEIGHT);
    }

    #[test]
    fn ignores_rows_past_the_bottom() {
        let mut frame = IndexedFrame::new();
        frame.put_pixel(0, 240, 0x3F);
        assert!(frame.pixels().iter().all(|&c| c == 0));
    }
}
