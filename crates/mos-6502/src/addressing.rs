//! Addressing-mode resolution.
//!
//! Every mode resolves to an effective address before the handler runs.
//! Operand bytes are read relative to the opcode address, so resolution
//! happens before PC advances.

use emu_core::{Bus, BusError};

/// The 13 operand addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Accumulator,
    Immediate,
    Implied,
    /// `(zp,X)`
    IndexedIndirect,
    /// `(abs)`, JMP only
    Indirect,
    /// `(zp),Y`
    IndirectIndexed,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
}

impl AddressingMode {
    /// Instruction length in bytes, opcode included.
    #[must_use]
    pub const fn size(self) -> u8 {
        match self {
            Self::Accumulator | Self::Implied => 1,
            Self::Immediate
            | Self::IndexedIndirect
            | Self::IndirectIndexed
            | Self::Relative
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY => 2,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 3,
        }
    }
}

/// Result of resolving an instruction's operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    /// Effective address. Meaningless for `Accumulator` and `Implied`.
    pub address: u16,
    pub mode: AddressingMode,
    /// Indexing carried into the high byte (indexed modes only).
    pub page_crossed: bool,
}

/// True when `a` and `b` are on different 256-byte pages.
#[must_use]
pub const fn pages_differ(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}

/// Read a 16-bit pointer whose high byte never leaves the low byte's page.
///
/// A pointer at `$xxFF` takes its high byte from `$xx00`. This is how the
/// NMOS 6502 fetches JMP indirect targets and zero-page pointers.
pub fn read_word_page_wrapped(bus: &mut dyn Bus, address: u16) -> Result<u16, BusError> {
    let hi_address = (address & 0xFF00) | (address.wrapping_add(1) & 0x00FF);
    let lo = bus.read(address)?;
    let hi = bus.read(hi_address)?;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// Resolve the operand of the instruction whose opcode sits at `pc`.
pub fn resolve(
    bus: &mut dyn Bus,
    mode: AddressingMode,
    pc: u16,
    x: u8,
    y: u8,
) -> Result<Operand, BusError> {
    let arg = pc.wrapping_add(1);
    let (address, page_crossed) = match mode {
        AddressingMode::Absolute => (bus.read_word(arg)?, false),
        AddressingMode::AbsoluteX => indexed(bus.read_word(arg)?, x),
        AddressingMode::AbsoluteY => indexed(bus.read_word(arg)?, y),
        AddressingMode::Accumulator | AddressingMode::Implied => (0, false),
        AddressingMode::Immediate => (arg, false),
        AddressingMode::IndexedIndirect => {
            let zp = bus.read(arg)?.wrapping_add(x);
            (read_word_page_wrapped(bus, u16::from(zp))?, false)
        }
        AddressingMode::Indirect => {
            let pointer = bus.read_word(arg)?;
            (read_word_page_wrapped(bus, pointer)?, false)
        }
        AddressingMode::IndirectIndexed => {
            let zp = bus.read(arg)?;
            indexed(read_word_page_wrapped(bus, u16::from(zp))?, y)
        }
        AddressingMode::Relative => {
            let offset = bus.read(arg)? as i8;
            let next = pc.wrapping_add(2);
            (next.wrapping_add_signed(i16::from(offset)), false)
        }
        AddressingMode::ZeroPage => (u16::from(bus.read(arg)?), false),
        AddressingMode::ZeroPageX => (u16::from(bus.read(arg)?.wrapping_add(x)), false),
        AddressingMode::ZeroPageY => (u16::from(bus.read(arg)?.wrapping_add(y)), false),
    };
    Ok(Operand {
        address,
        mode,
        page_crossed,
    })
}

fn indexed(base: u16, index: u8) -> (u16, bool) {
    let address = base.wrapping_add(u16::from(index));
    (address, pages_differ(base, address))
}
