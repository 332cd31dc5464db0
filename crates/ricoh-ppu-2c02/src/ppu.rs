//! PPU state, dot clock and NMI timing.

#![allow(clippy::cast_possible_truncation, clippy::struct_excessive_bools)]

mod registers;
mod render;
mod scroll;
mod sprites;
mod vram;

use emu_core::{BusError, Observable, Value};
use log::trace;

use crate::{ChrMemory, FrameSink};

/// Framebuffer dimensions.
pub const FB_WIDTH: usize = 256;
pub const FB_HEIGHT: usize = 240;

const DOTS_PER_LINE: u16 = 341;
const VISIBLE_LINES: u16 = 240;
const VBLANK_LINE: u16 = 241;
const PRE_RENDER_LINE: u16 = 261;

/// Dots between the NMI condition becoming true and the CPU seeing it.
const NMI_DELAY: u8 = 15;

// PPUCTRL
const CTRL_INCREMENT_32: u8 = 0x04;
const CTRL_SPRITE_TABLE: u8 = 0x08;
const CTRL_BG_TABLE: u8 = 0x10;
const CTRL_SPRITE_16: u8 = 0x20;
const CTRL_NMI: u8 = 0x80;

// PPUMASK
const MASK_GREYSCALE: u8 = 0x01;
const MASK_BG_LEFT: u8 = 0x02;
const MASK_SPRITE_LEFT: u8 = 0x04;
const MASK_BG: u8 = 0x08;
const MASK_SPRITES: u8 = 0x10;

// PPUSTATUS
const STATUS_OVERFLOW: u8 = 0x20;
const STATUS_SPRITE_ZERO: u8 = 0x40;
const STATUS_VBLANK: u8 = 0x80;

/// PPU 2C02.
pub struct Ppu {
    // VRAM
    nametable_ram: [u8; 2048],
    palette_ram: [u8; 32],
    oam: [u8; 256],

    // Registers
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    /// Last value written to any register; fills PPUSTATUS bits 0-4.
    latch: u8,

    // Loopy scroll/address registers
    v: u16,
    t: u16,
    fine_x: u8,
    w: bool,

    // $2007 read buffer
    read_buffer: u8,

    // Position
    scan_line: u16,
    clock: u16,
    frame: u64,
    frame_odd: bool,

    // Background pipeline
    bg_shift_pattern_lo: u16,
    bg_shift_pattern_hi: u16,
    bg_shift_attrib_lo: u16,
    bg_shift_attrib_hi: u16,
    bg_next_tile_id: u8,
    bg_next_tile_attrib: u8,
    bg_next_tile_lo: u8,
    bg_next_tile_hi: u8,

    // Sprites selected for the next line
    sprite_count: u8,
    sprite_patterns_lo: [u8; 8],
    sprite_patterns_hi: [u8; 8],
    sprite_attribs: [u8; 8],
    sprite_x: [u8; 8],
    sprite_zero_on_line: bool,

    // NMI
    nmi_previous: bool,
    nmi_delay: u8,
    nmi_pending: bool,
}

impl Ppu {
    /// Power-on state: just before the post-render line ends, so vertical
    /// blank starts within the first couple of dots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nametable_ram: [0; 2048],
            palette_ram: [0; 32],
            oam: [0; 256],

            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            latch: 0,

            v: 0,
            t: 0,
            fine_x: 0,
            w: false,

            read_buffer: 0,

            scan_line: VISIBLE_LINES,
            clock: DOTS_PER_LINE - 1,
            frame: 0,
            frame_odd: false,

            bg_shift_pattern_lo: 0,
            bg_shift_pattern_hi: 0,
            bg_shift_attrib_lo: 0,
            bg_shift_attrib_hi: 0,
            bg_next_tile_id: 0,
            bg_next_tile_attrib: 0,
            bg_next_tile_lo: 0,
            bg_next_tile_hi: 0,

            sprite_count: 0,
            sprite_patterns_lo: [0; 8],
            sprite_patterns_hi: [0; 8],
            sprite_attribs: [0; 8],
            sprite_x: [0; 8],
            sprite_zero_on_line: false,

            nmi_previous: false,
            nmi_delay: 0,
            nmi_pending: false,
        }
    }

    /// Restore power-on state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// One PPU dot.
    ///
    /// Advances the position first, then performs the work of the dot it
    /// lands on. After a call, [`Self::scan_line`] and [`Self::clock`] name
    /// the dot that was just processed.
    pub fn tick(
        &mut self,
        chr: &mut dyn ChrMemory,
        sink: &mut dyn FrameSink,
    ) -> Result<(), BusError> {
        self.tick_nmi_delay();
        self.advance();

        let pre_line = self.scan_line == PRE_RENDER_LINE;
        let visible_line = self.scan_line < VISIBLE_LINES;
        let render_line = pre_line || visible_line;
        let visible_dot = (1..=256).contains(&self.clock);
        let fetch_dot = visible_dot || (321..=336).contains(&self.clock);

        if self.rendering_enabled() {
            if visible_line && visible_dot {
                self.render_pixel(sink);
            }
            if render_line && fetch_dot {
                self.bg_fetch_cycle(chr)?;
                self.shift_registers();
            }
            if render_line {
                if self.clock == 256 {
                    self.increment_y();
                }
                if self.clock == 257 {
                    self.copy_horizontal();
                }
            }
            if pre_line && (280..=304).contains(&self.clock) {
                self.copy_vertical();
            }
            if self.clock == 257 {
                if visible_line {
                    self.evaluate_sprites(chr)?;
                } else {
                    self.sprite_count = 0;
                }
            }
        } else if visible_line && visible_dot {
            self.render_backdrop(sink);
        }

        if self.scan_line == VBLANK_LINE && self.clock == 1 {
            self.status |= STATUS_VBLANK;
            self.nmi_change();
        }
        if pre_line && self.clock == 1 {
            self.status &= !(STATUS_VBLANK | STATUS_SPRITE_ZERO | STATUS_OVERFLOW);
            self.nmi_change();
        }
        Ok(())
    }

    fn advance(&mut self) {
        // Odd frames drop the last pre-render dot while rendering.
        if self.rendering_enabled()
            && self.frame_odd
            && self.scan_line == PRE_RENDER_LINE
            && self.clock == 339
        {
            self.clock = 0;
            self.scan_line = 0;
            self.end_frame();
            return;
        }

        self.clock += 1;
        if self.clock >= DOTS_PER_LINE {
            self.clock = 0;
            self.scan_line += 1;
            if self.scan_line > PRE_RENDER_LINE {
                self.scan_line = 0;
                self.end_frame();
            }
        }
    }

    fn end_frame(&mut self) {
        self.frame += 1;
        self.frame_odd = !self.frame_odd;
        trace!("ppu: frame {} begins", self.frame);
    }

    // === NMI ===

    /// Re-evaluate the NMI line after PPUCTRL or the vblank flag changes.
    fn nmi_change(&mut self) {
        let nmi = self.ctrl & CTRL_NMI != 0 && self.status & STATUS_VBLANK != 0;
        if nmi && !self.nmi_previous {
            self.nmi_delay = NMI_DELAY;
        }
        self.nmi_previous = nmi;
    }

    fn tick_nmi_delay(&mut self) {
        if self.nmi_delay == 0 {
            return;
        }
        self.nmi_delay -= 1;
        // Reading PPUSTATUS or clearing PPUCTRL.7 inside the window cancels it.
        if self.nmi_delay == 0 && self.ctrl & CTRL_NMI != 0 && self.status & STATUS_VBLANK != 0
        {
            self.nmi_pending = true;
        }
    }

    /// Take the pending NMI, if any. The console forwards it to the CPU.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    // === Helpers ===

    fn rendering_enabled(&self) -> bool {
        self.mask & (MASK_BG | MASK_SPRITES) != 0
    }

    fn vram_increment(&self) -> u16 {
        if self.ctrl & CTRL_INCREMENT_32 != 0 {
            32
        } else {
            1
        }
    }

    /// Write OAM data (for DMA).
    pub fn write_oam(&mut self, offset: u8, value: u8) {
        self.oam[offset as usize] = value;
    }

    /// Read OAM data (for observation).
    #[must_use]
    pub fn read_oam(&self, offset: u8) -> u8 {
        self.oam[offset as usize]
    }

    /// OAM address register.
    #[must_use]
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    /// Current scanline, 0-261.
    #[must_use]
    pub fn scan_line(&self) -> u16 {
        self.scan_line
    }

    /// Current dot within the scanline, 0-340.
    #[must_use]
    pub fn clock(&self) -> u16 {
        self.clock
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Vertical blank flag (PPUSTATUS bit 7) without the read side effect.
    #[must_use]
    pub fn in_vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }

    /// Read nametable RAM directly (for observation).
    #[must_use]
    pub fn read_nametable(&self, offset: u16) -> u8 {
        self.nametable_ram[(offset as usize) & 0x7FF]
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

const QUERY_PATHS: &[&str] = &[
    "scan_line",
    "clock",
    "frame",
    "ctrl",
    "mask",
    "status",
    "oam_addr",
    "v",
    "t",
    "fine_x",
    "vblank",
];

impl Observable for Ppu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "scan_line" => Some(self.scan_line.into()),
            "clock" => Some(self.clock.into()),
            "frame" => Some(self.frame.into()),
            "ctrl" => Some(self.ctrl.into()),
            "mask" => Some(self.mask.into()),
            "status" => Some(self.status.into()),
            "oam_addr" => Some(self.oam_addr.into()),
            "v" => Some(self.v.into()),
            "t" => Some(self.t.into()),
            "fine_x" => Some(self.fine_x.into()),
            "vblank" => Some(self.in_vblank().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
