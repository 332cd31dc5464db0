//! NES APU register file.
//!
//! The APU lives on the 2A03 CPU die at $4000-$4017. Only the register
//! interface is modelled: writes are latched so they can be observed, and
//! $4015 reads back the channel-enable bits. No audio is produced.

use emu_core::{BusError, Observable, Value};
use log::trace;

/// First APU register address.
pub const APU_BASE: u16 = 0x4000;
/// Channel enable / status register.
pub const STATUS: u16 = 0x4015;
/// Frame counter register.
pub const FRAME_COUNTER: u16 = 0x4017;

const REGISTER_COUNT: usize = 0x18;

/// APU 2A03 register latch.
#[derive(Debug, Clone, Default)]
pub struct Apu {
    registers: [u8; REGISTER_COUNT],
}

impl Apu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU read. Only $4015 is readable.
    ///
    /// # Errors
    ///
    /// [`BusError::Unimplemented`] for the write-only channel registers,
    /// [`BusError::OutOfRange`] outside $4000-$4017.
    pub fn read_register(&mut self, address: u16) -> Result<u8, BusError> {
        match address {
            STATUS => Ok(self.registers[index(STATUS)] & 0x1F),
            APU_BASE..=FRAME_COUNTER => Err(BusError::Unimplemented {
                region: "APU register read",
                address,
            }),
            _ => Err(BusError::OutOfRange { address }),
        }
    }

    /// CPU write. $4014 (OAM DMA) and $4016 (controller strobe) belong to
    /// other devices and are rejected here.
    ///
    /// # Errors
    ///
    /// [`BusError::OutOfRange`] for addresses the APU does not decode.
    pub fn write_register(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        match address {
            0x4000..=0x4013 | STATUS | FRAME_COUNTER => {
                trace!("apu: ${address:04X} <- ${value:02X}");
                self.registers[index(address)] = value;
                Ok(())
            }
            _ => Err(BusError::OutOfRange { address }),
        }
    }

    /// Last value written to a register, for inspection.
    #[must_use]
    pub fn peek(&self, address: u16) -> Option<u8> {
        address
            .checked_sub(APU_BASE)
            .and_then(|offset| self.registers.get(usize::from(offset)))
            .copied()
    }
}

fn index(address: u16) -> usize {
    usize::from(address - APU_BASE)
}

const QUERY_PATHS: &[&str] = &["status", "frame_counter"];

impl Observable for Apu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "status" => self.peek(STATUS).map(Value::from),
            "frame_counter" => self.peek(FRAME_COUNTER).map(Value::from),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
