//! Mapper strategy trait and factory.

use emu_core::BusError;
use log::debug;
use ricoh_ppu_2c02::ChrMemory;

use crate::{Cartridge, Nrom, RomError, RomImage, UxRom};

/// Translates CPU and PPU addresses to cartridge ROM/RAM.
///
/// The CPU side covers $6000-$FFFF (PRG-RAM window plus PRG-ROM); the PPU
/// side is the [`ChrMemory`] supertrait.
pub trait Mapper: ChrMemory {
    /// iNES mapper number.
    fn id(&self) -> u8;

    /// Board name for logs.
    fn name(&self) -> &'static str;

    /// CPU read from $6000-$FFFF.
    ///
    /// # Errors
    ///
    /// [`BusError::OutOfRange`] below $6000, [`BusError::BankOverrun`] if
    /// bank arithmetic leaves a region.
    fn cpu_read(&mut self, address: u16) -> Result<u8, BusError>;

    /// CPU write to $6000-$FFFF. Writes to ROM space drive bank registers.
    ///
    /// # Errors
    ///
    /// As for [`Mapper::cpu_read`].
    fn cpu_write(&mut self, address: u16, value: u8) -> Result<(), BusError>;
}

/// Pick the mapper implementation named by the image header.
///
/// # Errors
///
/// [`RomError::UnsupportedMapper`] for anything but 0 and 2.
pub fn mapper_for(rom: RomImage) -> Result<Box<dyn Mapper>, RomError> {
    let id = rom.mapper_id;
    let mapper: Box<dyn Mapper> = match id {
        0 => Box::new(Nrom::new(Cartridge::new(rom))),
        2 => Box::new(UxRom::new(Cartridge::new(rom))),
        n => return Err(RomError::UnsupportedMapper(n)),
    };
    debug!("cartridge: using {} (mapper {id})", mapper.name());
    Ok(mapper)
}

/// $6000-$7FFF offset into PRG-RAM, shared by boards with a plain 8 KB window.
pub(crate) fn prg_ram_offset(address: u16) -> usize {
    usize::from(address - 0x6000)
}

/// Chip-select for CHR addresses: 8 KB, unbanked.
pub(crate) fn chr_offset(address: u16) -> usize {
    usize::from(address & 0x1FFF)
}
