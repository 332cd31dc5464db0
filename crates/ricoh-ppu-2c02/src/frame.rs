//! Pixel output seam.

/// Receives one composed pixel per visible dot.
///
/// `color` is a 6-bit index into the NES master palette, already passed
/// through the PPUMASK greyscale bit.
pub trait FrameSink {
    fn put_pixel(&mut self, x: u8, y: u8, color: u8);
}

/// Discards every pixel. Useful when only timing matters.
impl FrameSink for () {
    fn put_pixel(&mut self, _x: u8, _y: u8, _color: u8) {}
}
