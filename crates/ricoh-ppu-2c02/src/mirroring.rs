//! Nametable and palette address folding.

/// How the four logical nametables share two physical 1 KB pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// Tables 0,1 on page 0; tables 2,3 on page 1.
    Horizontal,
    /// Tables 0,2 on page 0; tables 1,3 on page 1.
    Vertical,
}

/// Fold a PPU address in $2000-$3EFF onto an offset in 2 KB of CIRAM.
#[must_use]
pub fn mirror_nametable(address: u16, mirroring: Mirroring) -> usize {
    let offset = (address.wrapping_sub(0x2000) & 0x0FFF) as usize;
    match mirroring {
        Mirroring::Horizontal => ((offset / 0x0800) * 0x0400) | (offset & 0x03FF),
        Mirroring::Vertical => offset & 0x07FF,
    }
}

/// Fold a PPU address in $3F00-$3FFF onto an index in the 32-byte palette.
///
/// Sprite-palette entries $10/$14/$18/$1C alias the background entries
/// $00/$04/$08/$0C.
#[must_use]
pub fn mirror_palette(address: u16) -> usize {
    let index = (address & 0x1F) as usize;
    if index >= 0x10 && index & 0x03 == 0 {
        index - 0x10
    } else {
        index
    }
}
