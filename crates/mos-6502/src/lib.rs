//! Ricoh 2A03 CPU core: an NMOS 6502 with the decimal adder disconnected.
//!
//! The core is instruction-stepped. Each [`Cpu::step`](emu_core::Cpu::step)
//! executes one whole instruction (or one interrupt entry, or one DMA stall
//! cycle) and reports how many cycles it took, so the machine can clock the
//! rest of the system to match.
//!
//! Decoding goes through a static 256-entry table covering the 151
//! documented opcodes and the undocumented ones games and test ROMs rely on.

mod addressing;
mod cpu;
mod error;
pub mod flags;
mod instructions;
mod registers;
mod table;

pub use addressing::{AddressingMode, Operand};
pub use cpu::Mos6502;
pub use error::CpuError;
pub use flags::Status;
pub use registers::Registers;
pub use table::{INSTRUCTIONS, Instruction};
