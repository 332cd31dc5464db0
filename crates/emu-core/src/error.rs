//! Bus error taxonomy.

use std::fmt;

use thiserror::Error;

/// Fixed-size cartridge storage regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    PrgRom,
    PrgRam,
    Chr,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bank::PrgRom => "PRG-ROM",
            Bank::PrgRam => "PRG-RAM",
            Bank::Chr => "CHR",
        };
        f.write_str(name)
    }
}

/// A failed bus access.
///
/// None of these are recoverable: the step that raised one aborts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// No device decodes this address.
    #[error("no device mapped at ${address:04X}")]
    OutOfRange { address: u16 },

    /// The address belongs to a region this machine does not emulate.
    #[error("{region} at ${address:04X} is not implemented")]
    Unimplemented { region: &'static str, address: u16 },

    /// A mapper computed an offset past the end of a cartridge region.
    #[error("{bank} offset {offset:#X} out of range (size {len:#X})")]
    BankOverrun { bank: Bank, offset: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_address() {
        let err = BusError::OutOfRange { address: 0x4018 };
        assert_eq!(err.to_string(), "no device mapped at $4018");

        let err = BusError::Unimplemented {
            region: "expansion ROM",
            address: 0x5000,
        };
        assert_eq!(err.to_string(), "expansion ROM at $5000 is not implemented");
    }

    #[test]
    fn bank_overrun_is_distinct_from_bus_addresses() {
        let err = BusError::BankOverrun {
            bank: Bank::Chr,
            offset: 0x2000,
            len: 0x2000,
        };
        assert_eq!(err.to_string(), "CHR offset 0x2000 out of range (size 0x2000)");
        assert_ne!(err, BusError::OutOfRange { address: 0x2000 });
    }
}
