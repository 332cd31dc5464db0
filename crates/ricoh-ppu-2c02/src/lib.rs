//! Ricoh 2C02 picture processing unit.
//!
//! Dot-based: one [`Ppu::tick`] is one PPU dot. A frame is 341 dots by 262
//! scanlines, shortened by one dot on odd frames while rendering.
//!
//! ## Scanline layout
//! - 0-239: visible
//! - 240: post-render (idle)
//! - 241-260: vertical blank
//! - 261: pre-render
//!
//! The PPU reaches pattern memory through [`ChrMemory`], implemented by the
//! cartridge, and hands every composed pixel to a [`FrameSink`] as a
//! 6-bit palette index. Turning indices into RGB is the sink's business.

mod chr;
mod frame;
mod mirroring;
mod ppu;

pub use chr::ChrMemory;
pub use frame::FrameSink;
pub use mirroring::{Mirroring, mirror_nametable, mirror_palette};
pub use ppu::{FB_HEIGHT, FB_WIDTH, Ppu};
