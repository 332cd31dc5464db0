//! Sprite evaluation and per-dot sprite lookup.

use emu_core::BusError;
use log::trace;

use super::{
    CTRL_SPRITE_16, CTRL_SPRITE_TABLE, MASK_SPRITE_LEFT, MASK_SPRITES, Ppu, STATUS_OVERFLOW,
};
use crate::ChrMemory;

const MAX_SPRITES_PER_LINE: usize = 8;

/// Opaque sprite pixel found at a dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SpritePixel {
    pub pixel: u8,
    /// Sprite palettes are 4-7.
    pub palette: u8,
    pub behind_bg: bool,
    pub is_sprite_zero: bool,
}

impl Ppu {
    fn sprite_height(&self) -> u16 {
        if self.ctrl & CTRL_SPRITE_16 != 0 { 16 } else { 8 }
    }

    /// Select up to eight sprites covering the current line and fetch their
    /// pattern rows; they are drawn on the following line. Earlier OAM
    /// entries win both the eight slots and, later, pixel priority.
    pub(super) fn evaluate_sprites(&mut self, chr: &mut dyn ChrMemory) -> Result<(), BusError> {
        let height = self.sprite_height();
        let mut found = 0usize;
        self.sprite_zero_on_line = false;

        for index in 0..64usize {
            let base = index * 4;
            let row = self.scan_line.wrapping_sub(u16::from(self.oam[base]));
            if row >= height {
                continue;
            }
            found += 1;
            if found > MAX_SPRITES_PER_LINE {
                continue;
            }

            let slot = found - 1;
            let tile = self.oam[base + 1];
            let attribs = self.oam[base + 2];
            let (lo, hi) = self.fetch_sprite_row(chr, tile, attribs, row, height)?;
            self.sprite_patterns_lo[slot] = lo;
            self.sprite_patterns_hi[slot] = hi;
            self.sprite_attribs[slot] = attribs;
            self.sprite_x[slot] = self.oam[base + 3];
            if index == 0 {
                self.sprite_zero_on_line = true;
            }
        }

        if found > MAX_SPRITES_PER_LINE {
            trace!("ppu: {found} sprites on line {}", self.scan_line);
            self.status |= STATUS_OVERFLOW;
        }
        self.sprite_count = found.min(MAX_SPRITES_PER_LINE) as u8;
        Ok(())
    }

    fn fetch_sprite_row(
        &self,
        chr: &mut dyn ChrMemory,
        tile_index: u8,
        attribs: u8,
        row: u16,
        height: u16,
    ) -> Result<(u8, u8), BusError> {
        let flip_v = attribs & 0x80 != 0;
        let row = if flip_v { height - 1 - row } else { row };

        let (table, tile, tile_row) = if height == 16 {
            // 8x16: bit 0 picks the table, the pair starts at an even tile.
            let table = u16::from(tile_index & 1) * 0x1000;
            let tile = tile_index & 0xFE;
            if row >= 8 {
                (table, tile + 1, row - 8)
            } else {
                (table, tile, row)
            }
        } else {
            let table = if self.ctrl & CTRL_SPRITE_TABLE != 0 { 0x1000 } else { 0 };
            (table, tile_index, row)
        };

        let addr = table + u16::from(tile) * 16 + tile_row;
        let mut lo = self.ppu_read(addr, chr)?;
        let mut hi = self.ppu_read(addr + 8, chr)?;
        if attribs & 0x40 != 0 {
            lo = flip_byte(lo);
            hi = flip_byte(hi);
        }
        Ok((lo, hi))
    }

    /// First opaque sprite pixel at column `x`, in slot order.
    pub(super) fn sprite_pixel(&self, x: u8) -> Option<SpritePixel> {
        if self.mask & MASK_SPRITES == 0 {
            return None;
        }
        if x < 8 && self.mask & MASK_SPRITE_LEFT == 0 {
            return None;
        }

        (0..self.sprite_count as usize).find_map(|slot| {
            let offset = x.checked_sub(self.sprite_x[slot])?;
            if offset > 7 {
                return None;
            }
            let lo = (self.sprite_patterns_lo[slot] >> (7 - offset)) & 1;
            let hi = (self.sprite_patterns_hi[slot] >> (7 - offset)) & 1;
            let pixel = (hi << 1) | lo;
            if pixel == 0 {
                return None;
            }
            let attribs = self.sprite_attribs[slot];
            Some(SpritePixel {
                pixel,
                palette: (attribs & 0x03) + 4,
                behind_bg: attribs & 0x20 != 0,
                is_sprite_zero: self.sprite_zero_on_line && slot == 0,
            })
        })
    }
}

/// Reverse the bits in a byte (horizontal sprite flip).
fn flip_byte(b: u8) -> u8 {
    b.reverse_bits()
}
