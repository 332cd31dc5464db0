use emu_core::BusError;
use log::trace;
use ricoh_ppu_2c02::{ChrMemory, Mirroring};

use crate::mapper::{chr_offset, prg_ram_offset};
use crate::{Cartridge, Mapper, PRG_BANK_SIZE};

/// UxROM (Mapper 2): switchable 16K PRG bank.
///
/// - PRG: 16K switchable at $8000-$BFFF, 16K fixed (last bank) at $C000-$FFFF
/// - CHR: 8K, usually RAM
/// - Mirroring: fixed from cartridge header
pub struct UxRom {
    cart: Cartridge,
    prg_bank: u8,
}

impl UxRom {
    #[must_use]
    pub fn new(cart: Cartridge) -> Self {
        Self { cart, prg_bank: 0 }
    }

    fn read_rom(&self, address: u16) -> Result<u8, BusError> {
        let banks = self.cart.prg_banks().max(1);
        let (bank, offset) = match address {
            0x8000..=0xBFFF => (usize::from(self.prg_bank) % banks, address - 0x8000),
            _ => (banks - 1, address - 0xC000),
        };
        self.cart.read_prg_rom(bank * PRG_BANK_SIZE + usize::from(offset))
    }
}

impl Mapper for UxRom {
    fn id(&self) -> u8 {
        2
    }

    fn name(&self) -> &'static str {
        "UxROM"
    }

    fn cpu_read(&mut self, address: u16) -> Result<u8, BusError> {
        match address {
            0x6000..=0x7FFF => self.cart.read_prg_ram(prg_ram_offset(address)),
            0x8000..=0xFFFF => self.read_rom(address),
            _ => Err(BusError::OutOfRange { address }),
        }
    }

    fn cpu_write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            0x6000..=0x7FFF => self.cart.write_prg_ram(prg_ram_offset(address), value),
            0x8000..=0xFFFF => {
                // Bus conflict: the ROM drives the data bus too.
                let rom_byte = self.read_rom(address)?;
                self.prg_bank = value & rom_byte;
                trace!("uxrom: PRG bank {}", self.prg_bank);
                Ok(())
            }
            _ => Err(BusError::OutOfRange { address }),
        }
    }
}

impl ChrMemory for UxRom {
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
