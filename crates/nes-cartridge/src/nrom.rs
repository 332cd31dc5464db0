use emu_core::BusError;
use log::trace;
use ricoh_ppu_2c02::{ChrMemory, Mirroring};

use crate::mapper::{chr_offset, prg_ram_offset};
use crate::{Cartridge, Mapper};

/// NROM (Mapper 0): no bank switching.
///
/// - PRG: 16K mirrored at $8000-$FFFF, or 32K at $8000-$FFFF
/// - CHR: 8K at PPU $0000-$1FFF
/// - PRG-RAM at $6000-$7FFF
pub struct Nrom {
    cart: Cartridge,
}

impl Nrom {
    #[must_use]
    pub fn new(cart: Cartridge) -> Self {
        Self { cart }
    }
}

impl Mapper for Nrom {
    fn id(&self) -> u8 {
        0
    }

    fn name(&self) -> &'static str {
        "NROM"
    }

    fn cpu_read(&mut self, address: u16) -> Result<u8, BusError> {
        match address {
            0x6000..=0x7FFF => self.cart.read_prg_ram(prg_ram_offset(address)),
            0x8000..=0xFFFF => {
                // A 16K image appears twice.
                let offset = usize::from(address - 0x8000) % self.cart.prg_rom_len().max(1);
                self.cart.read_prg_rom(offset)
            }
            _ => Err(BusError::OutOfRange { address }),
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            0x6000..=0x7FFF => self.cart.write_prg_ram(prg_ram_offset(address), value),
            0x8000..=0xFFFF => {
                trace!("nrom: ignoring PRG-ROM write ${value:02X} to ${address:04X}");
                Ok(())
            }
            _ => Err(BusError::OutOfRange { address }),
        }
    }
}

impl ChrMemory for Nrom {
    fn chr_read(&mut self, address: u16) -> Result<u8, BusError> {
        self.cart.read_chr(chr_offset(address))
    }

    fn chr_write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.cart.write_chr(chr_offset(address), value)
    }

    fn mirroring(&self) -> Mirroring {
        self.cart.mirroring()
    }
}
