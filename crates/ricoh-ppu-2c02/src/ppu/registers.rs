//! CPU-facing registers $2000-$2007.

use emu_core::BusError;

use super::{CTRL_NMI, Ppu, STATUS_VBLANK};
use crate::ChrMemory;

impl Ppu {
    /// CPU read from a PPU register. `register` is taken modulo 8.
    pub fn cpu_read(&mut self, register: u16, chr: &mut dyn ChrMemory) -> Result<u8, BusError> {
        Ok(match register & 0x07 {
            // $2002 - PPUSTATUS
            2 => {
                let result = (self.status & 0xE0) | (self.latch & 0x1F);
                self.status &= !STATUS_VBLANK;
                self.nmi_change();
                self.w = false;
                result
            }
            // $2004 - OAMDATA (no increment on read)
            4 => self.oam[self.oam_addr as usize],
            // $2007 - PPUDATA
            7 => {
                let address = self.v & 0x3FFF;
                let value = self.ppu_read(address, chr)?;
                let result = if address < 0x3F00 {
                    std::mem::replace(&mut self.read_buffer, value)
                } else {
                    // Palette reads bypass the buffer; it picks up the
                    // nametable byte underneath instead.
                    self.read_buffer = self.ppu_read(address - 0x1000, chr)?;
                    value
                };
                self.v = self.v.wrapping_add(self.vram_increment()) & 0x7FFF;
                result
            }
            _ => 0,
        })
    }

    /// CPU write to a PPU register. `register` is taken modulo 8.
    pub fn cpu_write(
        &mut self,
        register: u16,
        value: u8,
        chr: &mut dyn ChrMemory,
    ) -> Result<(), BusError> {
        self.latch = value;
        match register & 0x07 {
            // $2000 - PPUCTRL
            0 => {
                self.ctrl = value;
                self.t = (self.t & !0x0C00) | (u16::from(value & 0x03) << 10);
                self.nmi_change();
            }
            // $2001 - PPUMASK
            1 => self.mask = value,
            // $2003 - OAMADDR
            3 => self.oam_addr = value,
            // $2004 - OAMDATA
            4 => {
                self.oam[self.oam_addr as usize] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            // $2005 - PPUSCROLL
            5 => {
                if self.w {
                    self.t = (self.t & !0x73E0)
                        | (u16::from(value & 0x07) << 12)
                        | (u16::from(value >> 3) << 5);
                } else {
                    self.t = (self.t & !0x001F) | (u16::from(value) >> 3);
                    self.fine_x = value & 0x07;
                }
                self.w = !self.w;
            }
            // $2006 - PPUADDR
            6 => {
                if self.w {
                    self.t = (self.t & 0xFF00) | u16::from(value);
                    self.v = self.t;
                } else {
                    self.t = (self.t & 0x00FF) | (u16::from(value & 0x3F) << 8);
                }
                self.w = !self.w;
            }
            // $2007 - PPUDATA
            7 => {
                self.ppu_write(self.v & 0x3FFF, value, chr)?;
                self.v = self.v.wrapping_add(self.vram_increment()) & 0x7FFF;
            }
            // $2002 is read-only
            _ => {}
        }
        Ok(())
    }

    /// NMI output enable (PPUCTRL bit 7).
    #[must_use]
    pub fn nmi_enabled(&self) -> bool {
        self.ctrl & CTRL_NMI != 0
    }
}
