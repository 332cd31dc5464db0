//! CPU core trait.

use crate::Bus;

/// An instruction-stepped CPU core.
///
/// The bus is passed in, not owned, so the machine that owns both can route
/// side effects (DMA, interrupts) between steps.
pub trait Cpu {
    /// Failure raised by a step (bus faults, jammed opcodes).
    type Error;

    /// Execute one instruction, or one interrupt entry, or one stall cycle.
    ///
    /// Returns the number of CPU cycles consumed.
    fn step(&mut self, bus: &mut dyn Bus) -> Result<u32, Self::Error>;

    /// Load the reset vector and put registers into power-on state.
    fn reset(&mut self, bus: &mut dyn Bus) -> Result<(), Self::Error>;

    /// Request a non-maskable interrupt, taken before the next instruction.
    fn nmi(&mut self);

    /// Request a maskable interrupt, taken if interrupts are enabled.
    fn irq(&mut self);

    /// Current program counter.
    fn pc(&self) -> u16;
}
