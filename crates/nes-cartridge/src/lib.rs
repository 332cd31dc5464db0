//! iNES cartridge parser and mapper implementations.
//!
//! Parsing produces a [`RomImage`]; [`mapper_for`] turns it into a boxed
//! [`Mapper`] chosen by the header's mapper number. Supports NROM
//! (mapper 0) and UxROM (mapper 2).

mod cartridge;
mod error;
mod ines;
mod mapper;
mod nrom;
mod uxrom;

pub use cartridge::{CHR_BANK_SIZE, Cartridge, PRG_BANK_SIZE, PRG_RAM_BANK_SIZE};
pub use error::RomError;
pub use ines::RomImage;
pub use mapper::{Mapper, mapper_for};
pub use nrom::Nrom;
pub use ricoh_ppu_2c02::Mirroring;
pub use uxrom::UxRom;

/// Parse an iNES file and return a boxed mapper.
///
/// # Errors
///
/// Returns [`RomError`] if the header is invalid, the data is truncated,
/// or the mapper is unsupported.
pub fn parse_ines(data: &[u8]) -> Result<Box<dyn Mapper>, RomError> {
    mapper_for(RomImage::parse(data)?)
}
