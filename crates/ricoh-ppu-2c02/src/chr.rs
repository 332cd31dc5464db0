//! Pattern-table access seam.

use emu_core::BusError;

use crate::Mirroring;

/// Cartridge-side view of PPU address space $0000-$1FFF.
///
/// Implemented by mappers. Reads take `&mut self` because some mappers
/// latch bank switches off pattern fetches.
pub trait ChrMemory {
    fn chr_read(&mut self, address: u16) -> Result<u8, BusError>;

    fn chr_write(&mut self, address: u16, value: u8) -> Result<(), BusError>;

    /// Current nametable arrangement.
    fn mirroring(&self) -> Mirroring;
}
