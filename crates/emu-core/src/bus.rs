//! Memory and I/O bus interface.

use crate::BusError;

/// Memory-mapped bus over a 16-bit address space.
///
/// Components access memory and peripherals through this trait. The bus
/// handles address decoding and routes each access to the owning device.
/// Reads take `&mut self` because many device registers have read side
/// effects (status flags clearing, buffered data ports).
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> Result<u8, BusError>;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError>;

    /// Read a little-endian word from two consecutive addresses.
    fn read_word(&mut self, address: u16) -> Result<u16, BusError> {
        let lo = self.read(address)?;
        let hi = self.read(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }
}

/// Flat 64 KB RAM with no devices. Every address is backed.
///
/// Used as a test harness for CPU cores.
pub struct SimpleBus {
    ram: Vec<u8>,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: vec![0; 0x1_0000],
        }
    }

    /// Copy `data` into RAM starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.ram[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Read without going through the bus.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.ram[address as usize]
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> Result<u8, BusError> {
        Ok(self.ram[address as usize])
    }

    fn write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.ram[address as usize] = value;
        Ok(())
    }
}
