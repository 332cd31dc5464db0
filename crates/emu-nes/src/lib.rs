//! Instruction-stepped NES emulator.
//!
//! The CPU runs one instruction at a time; the PPU then catches up by three
//! dots per CPU cycle consumed (NTSC ratio). One frame = 341 PPU dots ×
//! 262 scanlines = 89,342 PPU cycles, one dot less on odd frames while
//! rendering.

mod bus;
mod config;
mod error;
mod frame;
mod nes;

pub use bus::NesBus;
pub use config::{
    CPU_HZ, NesConfig, OAM_DMA_STALL, PPU_DOTS_PER_CPU_CYCLE, cycles_to_seconds,
};
pub use error::NesError;
pub use frame::IndexedFrame;
pub use nes::Nes;
pub use ricoh_ppu_2c02::{FB_HEIGHT, FB_WIDTH, FrameSink};
