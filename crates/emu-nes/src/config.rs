//! NES configuration and NTSC timing.

/// NTSC CPU frequency in Hz (crystal / 12).
pub const CPU_HZ: u32 = 1_789_773;

/// PPU dots per CPU cycle (crystal / 4 against crystal / 12).
pub const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;

/// CPU cycles an OAM DMA steals, plus one when it starts on an odd cycle.
pub const OAM_DMA_STALL: u32 = 513;

/// Wall-clock seconds `cycles` CPU cycles take on NTSC hardware.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cycles_to_seconds(cycles: u64) -> f64 {
    cycles as f64 / f64::from(CPU_HZ)
}

/// NES configuration.
#[derive(Debug, Clone, Default)]
pub struct NesConfig {
    /// iNES file contents.
    pub rom_data: Vec<u8>,
}
