//! Processor status register (P).
//!
//! Bit layout, high to low: `N V U B D I Z C`. The numeric layout is
//! observable: it is what BRK, IRQ, NMI and PHP push onto the stack.

/// Carry.
pub const C: u8 = 0x01;
/// Zero.
pub const Z: u8 = 0x02;
/// Interrupt disable. IRQ is ignored while set.
pub const I: u8 = 0x04;
/// Decimal mode. Settable, but the 2A03 has no BCD adder.
pub const D: u8 = 0x08;
/// Break. Only exists in the pushed copy of P.
pub const B: u8 = 0x10;
/// Unused. Always reads as 1.
pub const U: u8 = 0x20;
/// Overflow.
pub const V: u8 = 0x40;
/// Negative.
pub const N: u8 = 0x80;

/// Packed status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Status as pulled from the stack by PLP and RTI: B dropped, U forced.
    #[must_use]
    pub const fn from_stack(value: u8) -> Self {
        Self((value & !B) | U)
    }

    /// Copy pushed by BRK and PHP: B and U set.
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.0 | U | B
    }

    /// Copy pushed by IRQ and NMI: U set, B clear.
    #[must_use]
    pub const fn to_byte_irq(self) -> u8 {
        (self.0 | U) & !B
    }

    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Recompute Z and N from an 8-bit result.
    pub fn update_nz(&mut self, value: u8) {
        self.set_if(Z, value == 0);
        self.set_if(N, value & 0x80 != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_nz_tracks_every_result() {
        let mut p = Status(U);
        for value in 0..=255u8 {
            p.update_nz(value);
            assert_eq!(p.is_set(Z), value == 0, "Z for {value:#04X}");
            assert_eq!(p.is_set(N), value & 0x80 != 0, "N for {value:#04X}");
        }
    }

    #[test]
    fn pushed_copies_differ_only_in_break() {
        let p = Status(C | I | U);
        assert_eq!(p.to_byte_brk(), 0x35);
        assert_eq!(p.to_byte_irq(), 0x25);
    }

    #[test]
    fn from_stack_ignores_break_and_forces_unused() {
        assert_eq!(Status::from_stack(0xFF).0, 0xEF);
        assert_eq!(Status::from_stack(0x00).0, 0x20);
    }
}
