//! Cartridge memory: PRG-ROM, CHR-ROM or CHR-RAM, PRG-RAM.
//!
//! Offsets are bank-relative byte indices chosen by a mapper. An offset past
//! the end of a region is a mapper bug, reported as
//! [`BusError::BankOverrun`] rather than folded back into range.

use emu_core::{Bank, BusError};
use log::warn;

use crate::{Mirroring, RomImage};

pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;
pub const PRG_RAM_BANK_SIZE: usize = 8 * 1024;

/// Memory owned by a cartridge board.
#[derive(Debug, Clone)]
pub struct Cartridge {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,
    mirroring: Mirroring,
}

impl Cartridge {
    /// Build from a parsed image. No CHR-ROM means 8 KB of CHR-RAM.
    #[must_use]
    pub fn new(rom: RomImage) -> Self {
        let chr_is_ram = rom.chr_rom.is_empty();
        let chr = if chr_is_ram {
            vec![0u8; CHR_BANK_SIZE]
        } else {
            rom.chr_rom
        };
        Self {
            prg_rom: rom.prg_rom,
            chr,
            chr_is_ram,
            prg_ram: vec![0u8; usize::from(rom.prg_ram_banks.max(1)) * PRG_RAM_BANK_SIZE],
            mirroring: rom.mirroring,
        }
    }

    /// Read PRG-ROM.
    ///
    /// # Errors
    ///
    /// [`BusError::BankOverrun`] if `offset` is past the end of PRG-ROM.
    pub fn read_prg_rom(&self, offset: usize) -> Result<u8, BusError> {
        lookup(&self.prg_rom, Bank::PrgRom, offset)
    }

    /// Read CHR-ROM or CHR-RAM.
    ///
    /// # Errors
    ///
    /// [`BusError::BankOverrun`] if `offset` is past the end of CHR.
    pub fn read_chr(&self, offset: usize) -> Result<u8, BusError> {
        lookup(&self.chr, Bank::Chr, offset)
    }

    /// Write CHR. Writes to CHR-ROM are dropped.
    ///
    /// # Errors
    ///
    /// [`BusError::BankOverrun`] if `offset` is past the end of CHR.
    pub fn write_chr(&mut self, offset: usize, value: u8) -> Result<(), BusError> {
        let len = self.chr.len();
        let slot = self.chr.get_mut(offset).ok_or(BusError::BankOverrun {
            bank: Bank::Chr,
            offset,
            len,
        })?;
        if self.chr_is_ram {
            *slot = value;
        } else {
            warn!("cartridge: ignoring write ${value:02X} to CHR-ROM offset {offset:#06X}");
        }
        Ok(())
    }

    /// Read PRG-RAM.
    ///
    /// # Errors
    ///
    /// [`BusError::BankOverrun`] if `offset` is past the end of PRG-RAM.
    pub fn read_prg_ram(&self, offset: usize) -> Result<u8, BusError> {
        lookup(&self.prg_ram, Bank::PrgRam, offset)
    }

    /// Write PRG-RAM.
    ///
    /// # Errors
    ///
    /// [`BusError::BankOverrun`] if `offset` is past the end of PRG-RAM.
    pub fn write_prg_ram(&mut self, offset: usize, value: u8) -> Result<(), BusError> {
        let len = self.prg_ram.len();
        let slot = self.prg_ram.get_mut(offset).ok_or(BusError::BankOverrun {
            bank: Bank::PrgRam,
            offset,
            len,
        })?;
        *slot = value;
        Ok(())
    }

    #[must_use]
    pub fn prg_rom_len(&self) -> usize {
        self.prg_rom.len()
    }

    /// Number of 16 KB PRG-ROM banks.
    #[must_use]
    pub fn prg_banks(&self) -> usize {
        self.prg_rom.len() / PRG_BANK_SIZE
    }

    #[must_use]
    pub fn chr_is_ram(&self) -> bool {
        self.chr_is_ram
    }

    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

fn lookup(region: &[u8], bank: Bank, offset: usize) -> Result<u8, BusError> {
    region.get(offset).copied().ok_or(BusError::BankOverrun {
        bank,
        offset,
        len: region.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom(chr: Vec<u8>) -> RomImage {
        RomImage {
            prg_rom: (0..PRG_BANK_SIZE).map(|i| i as u8).collect(),
            chr_rom: chr,
            mapper_id: 0,
            mirroring: Mirroring::Horizontal,
            prg_ram_banks: 1,
            has_battery: false,
        }
    }

    #[test]
    fn prg_rom_reads_and_overruns() {
        let cart = Cartridge::new(rom(Vec::new()));
        assert_eq!(cart.read_prg_rom(0x1234).unwrap(), 0x34);
        assert_eq!(
            cart.read_prg_rom(PRG_BANK_SIZE),
            Err(BusError::BankOverrun {
                bank: Bank::PrgRom,
                offset: PRG_BANK_SIZE,
                len: PRG_BANK_SIZE
            })
        );
    }

    #[test]
    fn missing_chr_rom_becomes_ram() {
        let mut cart = Cartridge::new(rom(Vec::new()));
        assert!(cart.chr_is_ram());
        cart.write_chr(0x0ABC, 0x5A).unwrap();
        assert_eq!(cart.read_chr(0x0ABC).unwrap(), 0x5A);
    }

    #[test]
    fn chr_rom_ignores_writes() {
        let mut cart = Cartridge::new(rom(vec![0x77; CHR_BANK_SIZE]));
        cart.write_chr(0x0010, 0x00).unwrap();
        assert_eq!(cart.read_chr(0x0010).unwrap(), 0x77);
        assert!(matches!(
            cart.write_chr(CHR_BANK_SIZE, 0),
            Err(BusError::BankOverrun { bank: Bank::Chr, .. })
        ));
    }

    #[test]
    fn prg_ram_round_trip_and_overrun() {
        let mut cart = Cartridge::new(rom(Vec::new()));
        cart.write_prg_ram(0x1FFF, 0xC3).unwrap();
        assert_eq!(cart.read_prg_ram(0x1FFF).unwrap(), 0xC3);
        assert!(matches!(
            cart.write_prg_ram(0x2000, 0),
            Err(BusError::BankOverrun { bank: Bank::PrgRam, .. })
        ));
        assert!(cart.read_prg_ram(0x2000).is_err());
    }

    #[test]
    fn zero_prg_ram_banks_still_maps_one() {
        let mut image = rom(Vec::new());
        image.prg_ram_banks = 0;
        let mut cart = Cartridge::new(image);
        cart.write_prg_ram(0x1FFF, 0x5A).unwrap();
        assert_eq!(cart.read_prg_ram(0x1FFF).unwrap(), 0x5A);
        assert!(cart.read_prg_ram(0x2000).is_err());
    }
}
