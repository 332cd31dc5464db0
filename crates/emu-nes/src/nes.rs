//! Top-level NES system.
//!
//! The CPU is the timing master: each `step()` runs one instruction (or one
//! stall cycle, or one interrupt entry) and the PPU then catches up by three
//! dots per CPU cycle consumed. OAM DMA is started between the two, once the
//! instruction that wrote $4014 has completed.

use emu_core::{Bus, Cpu, Observable, Value, parse_address};
use log::{debug, trace};
use mos_6502::Mos6502;
use nes_cartridge::{Mapper, parse_ines};
use ricoh_ppu_2c02::FrameSink;

use crate::bus::NesBus;
use crate::config::{NesConfig, OAM_DMA_STALL, PPU_DOTS_PER_CPU_CYCLE};
use crate::error::NesError;
use crate::frame::IndexedFrame;

/// NES system, generic over where finished pixels go.
pub struct Nes<S: FrameSink = IndexedFrame> {
    cpu: Mos6502,
    bus: NesBus,
    sink: S,
}

impl Nes {
    /// Create a new NES from the given configuration, drawing into an
    /// [`IndexedFrame`].
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM data is invalid or the reset vector
    /// cannot be read.
    pub fn new(config: &NesConfig) -> Result<Self, NesError> {
        Self::with_sink(config, IndexedFrame::new())
    }

    /// Palette indices of the last rendered pixels (256x240).
    #[must_use]
    pub fn framebuffer(&self) -> &IndexedFrame {
        &self.sink
    }
}

impl<S: FrameSink> Nes<S> {
    /// Create a new NES that hands every pixel to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM data is invalid or the reset vector
    /// cannot be read.
    pub fn with_sink(config: &NesConfig, sink: S) -> Result<Self, NesError> {
        let mapper = parse_ines(&config.rom_data)?;
        Self::from_mapper(mapper, sink)
    }

    /// Create a new NES around an already-built mapper and reset the CPU.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset vector cannot be read.
    pub fn from_mapper(mapper: Box<dyn Mapper>, sink: S) -> Result<Self, NesError> {
        debug!("nes: {} (mapper {})", mapper.name(), mapper.id());
        let mut bus = NesBus::new(mapper);
        let mut cpu = Mos6502::new();
        cpu.reset(&mut bus)?;
        Ok(Self { cpu, bus, sink })
    }

    /// Press the reset button: PPU back to power-on, CPU through the reset
    /// vector. RAM and cartridge state survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset vector cannot be read.
    pub fn reset(&mut self) -> Result<(), NesError> {
        self.bus.ppu.reset();
        self.bus.oam_dma_page = None;
        self.cpu.reset(&mut self.bus)?;
        Ok(())
    }

    /// Run one CPU step and catch the PPU up.
    ///
    /// Returns the CPU cycles consumed.
    ///
    /// # Errors
    ///
    /// Any bus fault or jammed opcode aborts the step.
    pub fn step(&mut self) -> Result<u32, NesError> {
        let cycles = self.cpu.step(&mut self.bus)?;

        if let Some(page) = self.bus.oam_dma_page.take() {
            self.oam_dma(page)?;
        }

        for _ in 0..cycles * PPU_DOTS_PER_CPU_CYCLE {
            self.bus
                .ppu
                .tick(self.bus.cartridge.as_mut(), &mut self.sink)?;
            if self.bus.ppu.take_nmi() {
                trace!(
                    "nes: NMI at scan_line {} clock {}",
                    self.bus.ppu.scan_line(),
                    self.bus.ppu.clock()
                );
                self.cpu.nmi();
            }
        }

        Ok(cycles)
    }

    /// Copy page `page` of CPU memory into OAM and stall the CPU.
    ///
    /// The copy lands at the current OAMADDR and wraps within OAM. The
    /// stall is paid by the following steps, one cycle each.
    fn oam_dma(&mut self, page: u8) -> Result<(), NesError> {
        let base = u16::from(page) << 8;
        let start = self.bus.ppu.oam_addr();
        for i in 0..=0xFFu8 {
            let value = self.bus.read(base | u16::from(i))?;
            self.bus.ppu.write_oam(start.wrapping_add(i), value);
        }

        let stall = OAM_DMA_STALL + u32::from(self.cpu.cycles() % 2 == 1);
        self.cpu.stall(stall);
        debug!("nes: OAM DMA from ${base:04X}, {stall} cycle stall");
        Ok(())
    }

    /// Step until the PPU starts a new frame.
    ///
    /// Returns the CPU cycles consumed.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step.
    pub fn run_frame(&mut self) -> Result<u64, NesError> {
        self.run_frame_bounded(u64::MAX)
    }

    /// Like [`Self::run_frame`], but gives up after `max_steps` steps.
    ///
    /// # Errors
    ///
    /// Returns [`NesError::StepLimit`] if the frame does not finish in time,
    /// or the first failing step.
    pub fn run_frame_bounded(&mut self, max_steps: u64) -> Result<u64, NesError> {
        let frame = self.bus.ppu.frame();
        let mut cycles = 0u64;
        let mut steps = 0u64;
        while self.bus.ppu.frame() == frame {
            if steps == max_steps {
                return Err(NesError::StepLimit(max_steps));
            }
            cycles += u64::from(self.step()?);
            steps += 1;
        }
        Ok(cycles)
    }

    /// Reference to the CPU.
    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    /// Mutable reference to the CPU.
    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    /// Reference to the bus.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable reference to the bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Reference to the frame sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable reference to the frame sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Completed PPU frames since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame()
    }
}

impl<S: FrameSink> Observable for Nes<S> {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            self.bus.ppu.query(rest)
        } else if let Some(rest) = path.strip_prefix("apu.") {
            self.bus.apu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest)
                .and_then(|a| self.bus.peek(a))
                .map(Value::U8)
        } else {
            match path {
                "cycles" => Some(self.cpu.cycles().into()),
                "frame_count" => Some(self.frame_count().into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "ppu.<2c02_paths>",
            "apu.status",
            "apu.frame_counter",
            "memory.<address>",
            "cycles",
            "frame_count",
        ]
    }
}
