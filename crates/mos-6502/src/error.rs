//! CPU step failures.

use emu_core::BusError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error(transparent)]
    Bus(#[from] BusError),

    /// KIL/JAM opcodes stop the real chip until reset.
    #[error("CPU jammed by opcode ${opcode:02X} at ${pc:04X}")]
    Jammed { opcode: u8, pc: u16 },
}
