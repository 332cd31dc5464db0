//! PPU address space: pattern tables, nametables, palette.

use emu_core::BusError;

use super::Ppu;
use crate::{ChrMemory, mirror_nametable, mirror_palette};

impl Ppu {
    pub(super) fn ppu_read(&self, address: u16, chr: &mut dyn ChrMemory) -> Result<u8, BusError> {
        let address = address & 0x3FFF;
        Ok(match address {
            0x0000..=0x1FFF => chr.chr_read(address)?,
            0x2000..=0x3EFF => self.nametable_ram[mirror_nametable(address, chr.mirroring())],
            _ => self.palette_ram[mirror_palette(address)],
        })
    }

    pub(super) fn ppu_write(
        &mut self,
        address: u16,
        value: u8,
        chr: &mut dyn ChrMemory,
    ) -> Result<(), BusError> {
        let address = address & 0x3FFF;
        match address {
            0x0000..=0x1FFF => chr.chr_write(address, value)?,
            0x2000..=0x3EFF => {
                self.nametable_ram[mirror_nametable(address, chr.mirroring())] = value;
            }
            _ => self.palette_ram[mirror_palette(address)] = value,
        }
        Ok(())
    }
}
