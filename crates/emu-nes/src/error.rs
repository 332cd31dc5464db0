use emu_core::BusError;
use mos_6502::CpuError;
use nes_cartridge::RomError;
use thiserror::Error;

/// Anything that stops the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NesError {
    #[error("failed to load ROM: {0}")]
    Rom(#[from] RomError),

    #[error(transparent)]
    Cpu(#[from] CpuError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("step limit of {0} reached")]
    StepLimit(u64),
}
