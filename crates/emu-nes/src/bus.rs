//! NES bus: CPU address routing.
//!
//! Implements `emu_core::Bus` for the NES. Routes CPU addresses to
//! internal RAM, PPU registers, APU, controllers, and cartridge.
//!
//! The NES is fully memory-mapped; there is no separate I/O address space.

use emu_core::{Bus, BusError};
use nes_cartridge::Mapper;
use ricoh_apu_2a03::Apu;
use ricoh_ppu_2c02::Ppu;

/// The NES bus, implementing `emu_core::Bus`.
pub struct NesBus {
    /// 2K internal RAM ($0000-$07FF, mirrored to $1FFF).
    pub ram: [u8; 2048],
    /// PPU (2C02).
    pub ppu: Ppu,
    /// APU register file.
    pub apu: Apu,
    /// Cartridge mapper.
    pub cartridge: Box<dyn Mapper>,
    /// OAM DMA pending page (set when $4014 is written).
    pub oam_dma_page: Option<u8>,
}

impl NesBus {
    #[must_use]
    pub fn new(cartridge: Box<dyn Mapper>) -> Self {
        Self {
            ram: [0; 2048],
            ppu: Ppu::new(),
            apu: Apu::new(),
            cartridge,
            oam_dma_page: None,
        }
    }

    /// Peek a byte from RAM without side effects (for observation).
    #[must_use]
    pub fn peek_ram(&self, addr: u16) -> u8 {
        self.ram[(addr & 0x07FF) as usize]
    }

    /// Side-effect-free read for inspection. Only RAM is visible; register
    /// and cartridge reads can change state, so they return `None`.
    #[must_use]
    pub fn peek(&self, addr: u16) -> Option<u8> {
        (addr < 0x2000).then(|| self.peek_ram(addr))
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> Result<u8, BusError> {
        match addr {
            0x0000..=0x1FFF => Ok(self.ram[(addr & 0x07FF) as usize]),
            0x2000..=0x3FFF => self.ppu.cpu_read(addr & 0x0007, self.cartridge.as_mut()),
            0x4015 => self.apu.read_register(addr),
            // Controller ports: nothing plugged in.
            0x4016 | 0x4017 => Ok(0),
            0x4000..=0x4014 => self.apu.read_register(addr),
            0x4018..=0x401F => Err(BusError::Unimplemented {
                region: "APU test registers",
                address: addr,
            }),
            0x4020..=0x5FFF => Err(BusError::Unimplemented {
                region: "expansion area",
                address: addr,
            }),
            0x6000..=0xFFFF => self.cartridge.cpu_read(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<(), BusError> {
        match addr {
            0x0000..=0x1FFF => {
                self.ram[(addr & 0x07FF) as usize] = value;
                Ok(())
            }
            0x2000..=0x3FFF => self
                .ppu
                .cpu_write(addr & 0x0007, value, self.cartridge.as_mut()),
            0x4014 => {
                self.oam_dma_page = Some(value);
                Ok(())
            }
            // Controller strobe: nothing plugged in.
            0x4016 => Ok(()),
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write_register(addr, value),
            0x4018..=0x401F => Err(BusError::Unimplemented {
                region: "APU test registers",
                address: addr,
            }),
            0x4020..=0x5FFF => Err(BusError::Unimplemented {
                region: "expansion area",
                address: addr,
            }),
            0x6000..=0xFFFF => self.cartridge.cpu_write(addr, value),
        }
    }
}
