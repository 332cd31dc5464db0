//! Core traits and types for instruction-stepped emulation.
//!
//! Every chip talks to memory through a [`Bus`]. Bus accesses are fallible:
//! an address with no device behind it is an error the caller must see,
//! never a silent zero.

mod bus;
mod cpu;
mod error;
mod observable;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use error::{Bank, BusError};
pub use observable::{Observable, Value, parse_address};
