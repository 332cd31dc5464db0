//! Background fetch pipeline and pixel composition.

use emu_core::BusError;

use super::{
    CTRL_BG_TABLE, MASK_BG, MASK_BG_LEFT, MASK_GREYSCALE, Ppu, STATUS_SPRITE_ZERO,
};
use crate::{ChrMemory, FrameSink, mirror_palette};

impl Ppu {
    /// One dot of background fetching. Four fetches per 8-dot tile:
    /// nametable, attribute, pattern low, pattern high; coarse X steps on
    /// the eighth dot.
    pub(super) fn bg_fetch_cycle(&mut self, chr: &mut dyn ChrMemory) -> Result<(), BusError> {
        let cycle = if self.clock >= 321 {
            self.clock - 321
        } else {
            self.clock - 1
        };

        match cycle & 0x07 {
            0 => {
                // Previous tile enters the shifters, except at the first
                // prefetch of the line.
                if self.clock != 321 {
                    self.load_bg_shift_registers();
                }
                let nt_addr = 0x2000 | (self.v & 0x0FFF);
                self.bg_next_tile_id = self.ppu_read(nt_addr, chr)?;
            }
            2 => {
                let attr_addr =
                    0x23C0 | (self.v & 0x0C00) | ((self.v >> 4) & 0x38) | ((self.v >> 2) & 0x07);
                let attr_byte = self.ppu_read(attr_addr, chr)?;
                let shift = ((self.v >> 4) & 0x04) | (self.v & 0x02);
                self.bg_next_tile_attrib = (attr_byte >> shift) & 0x03;
            }
            4 => {
                let addr = self.bg_pattern_address();
                self.bg_next_tile_lo = self.ppu_read(addr, chr)?;
            }
            6 => {
                let addr = self.bg_pattern_address() + 8;
                self.bg_next_tile_hi = self.ppu_read(addr, chr)?;
            }
            7 => self.increment_x(),
            _ => {}
        }
        Ok(())
    }

    fn bg_pattern_address(&self) -> u16 {
        let table = if self.ctrl & CTRL_BG_TABLE != 0 { 0x1000 } else { 0 };
        let fine_y = (self.v >> 12) & 0x07;
        table + u16::from(self.bg_next_tile_id) * 16 + fine_y
    }

    fn load_bg_shift_registers(&mut self) {
        self.bg_shift_pattern_lo =
            (self.bg_shift_pattern_lo & 0xFF00) | u16::from(self.bg_next_tile_lo);
        self.bg_shift_pattern_hi =
            (self.bg_shift_pattern_hi & 0xFF00) | u16::from(self.bg_next_tile_hi);

        let fill = |bit: u8| if self.bg_next_tile_attrib & bit != 0 { 0xFF } else { 0x00 };
        self.bg_shift_attrib_lo = (self.bg_shift_attrib_lo & 0xFF00) | fill(0x01);
        self.bg_shift_attrib_hi = (self.bg_shift_attrib_hi & 0xFF00) | fill(0x02);
    }

    pub(super) fn shift_registers(&mut self) {
        self.bg_shift_pattern_lo <<= 1;
        self.bg_shift_pattern_hi <<= 1;
        self.bg_shift_attrib_lo <<= 1;
        self.bg_shift_attrib_hi <<= 1;
    }

    pub(super) fn render_pixel(&mut self, sink: &mut dyn FrameSink) {
        let x = (self.clock - 1) as u8;
        let y = self.scan_line as u8;

        let (bg_pixel, bg_palette) = self.bg_pixel();
        let sprite = self.sprite_pixel(x);

        let (pixel, palette) = match (bg_pixel, sprite) {
            (0, None) => (0, 0),
            (0, Some(sp)) => (sp.pixel, sp.palette),
            (_, None) => (bg_pixel, bg_palette),
            (_, Some(sp)) => {
                if sp.is_sprite_zero && x < 255 {
                    self.status |= STATUS_SPRITE_ZERO;
                }
                if sp.behind_bg {
                    (bg_pixel, bg_palette)
                } else {
                    (sp.pixel, sp.palette)
                }
            }
        };

        let colour_addr = if pixel == 0 {
            0
        } else {
            (u16::from(palette) << 2) | u16::from(pixel)
        };
        let colour = self.palette_ram[mirror_palette(colour_addr)];
        sink.put_pixel(x, y, self.apply_greyscale(colour));
    }

    /// Rendering disabled: every visible dot shows the backdrop colour.
    pub(super) fn render_backdrop(&self, sink: &mut dyn FrameSink) {
        let x = (self.clock - 1) as u8;
        let y = self.scan_line as u8;
        sink.put_pixel(x, y, self.apply_greyscale(self.palette_ram[0]));
    }

    fn bg_pixel(&self) -> (u8, u8) {
        if self.mask & MASK_BG == 0 {
            return (0, 0);
        }
        if self.clock <= 8 && self.mask & MASK_BG_LEFT == 0 {
            return (0, 0);
        }

        let bit_select = 0x8000 >> self.fine_x;
        let pixel_lo = u8::from(self.bg_shift_pattern_lo & bit_select != 0);
        let pixel_hi = u8::from(self.bg_shift_pattern_hi & bit_select != 0);
        let palette_lo = u8::from(self.bg_shift_attrib_lo & bit_select != 0);
        let palette_hi = u8::from(self.bg_shift_attrib_hi & bit_select != 0);

        ((pixel_hi << 1) | pixel_lo, (palette_hi << 1) | palette_lo)
    }

    fn apply_greyscale(&self, colour: u8) -> u8 {
        if self.mask & MASK_GREYSCALE != 0 {
            colour & 0x30
        } else {
            colour & 0x3F
        }
    }
}
