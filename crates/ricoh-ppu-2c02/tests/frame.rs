//! Whole-frame behaviour through the public API.

use emu_core::{BusError, Observable, Value};
use ricoh_ppu_2c02::{ChrMemory, FB_HEIGHT, FB_WIDTH, FrameSink, Mirroring, Ppu};

struct ChrRam([u8; 0x2000]);

impl ChrMemory for ChrRam {
    fn chr_read(&mut self, address: u16) -> Result<u8, BusError> {
        Ok(self.0[usize::from(address & 0x1FFF)])
    }

    fn chr_write(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        self.0[usize::from(address & 0x1FFF)] = value;
        Ok(())
    }

    fn mirroring(&self) -> Mirroring {
        Mirroring::Vertical
    }
}

/// Rejects all pattern access, like an unmapped cartridge region.
struct BrokenChr;

impl ChrMemory for BrokenChr {
    fn chr_read(&mut self, address: u16) -> Result<u8, BusError> {
        Err(BusError::OutOfRange { address })
    }

    fn chr_write(&mut self, address: u16, _value: u8) -> Result<(), BusError> {
        Err(BusError::OutOfRange { address })
    }

    fn mirroring(&self) -> Mirroring {
        Mirroring::Horizontal
    }
}

struct CountingSink {
    pixels: Vec<u32>,
}

impl FrameSink for CountingSink {
    fn put_pixel(&mut self, x: u8, y: u8, _color: u8) {
        self.pixels[usize::from(y) * FB_WIDTH + usize::from(x)] += 1;
    }
}

fn run_to_frame(ppu: &mut Ppu, chr: &mut dyn ChrMemory, sink: &mut dyn FrameSink, frame: u64) {
    while ppu.frame() < frame {
        ppu.tick(chr, sink).unwrap();
    }
}

#[test]
fn every_visible_pixel_is_written_once_per_frame() {
    let mut chr = ChrRam([0; 0x2000]);
    let mut ppu = Ppu::new();
    let mut sink = CountingSink {
        pixels: vec![0; FB_WIDTH * FB_HEIGHT],
    };
    run_to_frame(&mut ppu, &mut chr, &mut (), 1);
    ppu.cpu_write(1, 0x1E, &mut chr).unwrap();
    run_to_frame(&mut ppu, &mut chr, &mut sink, 2);
    assert!(sink.pixels.iter().all(|&n| n == 1));
}

#[test]
fn observable_reports_position() {
    let mut chr = ChrRam([0; 0x2000]);
    let mut ppu = Ppu::new();
    run_to_frame(&mut ppu, &mut chr, &mut (), 1);
    assert_eq!(ppu.query("frame"), Some(Value::U64(1)));
    assert_eq!(ppu.query("scan_line"), Some(Value::U16(0)));
    assert_eq!(ppu.query("clock"), Some(Value::U16(0)));
    assert_eq!(ppu.query("nonsense"), None);
    for path in ppu.query_paths() {
        assert!(ppu.query(path).is_some(), "{path}");
    }
}

#[test]
fn chr_errors_propagate_from_rendering() {
    let mut ppu = Ppu::new();
    ppu.cpu_write(1, 0x08, &mut BrokenChr).unwrap();
    let mut result = Ok(());
    for _ in 0..100_000 {
        result = ppu.tick(&mut BrokenChr, &mut ());
        if result.is_err() {
            break;
        }
    }
    assert!(matches!(result, Err(BusError::OutOfRange { .. })));
}

#[test]
fn chr_ram_is_reachable_through_ppudata() {
    let mut chr = ChrRam([0; 0x2000]);
    let mut ppu = Ppu::new();
    ppu.cpu_write(6, 0x10, &mut chr).unwrap();
    ppu.cpu_write(6, 0x20, &mut chr).unwrap();
    ppu.cpu_write(7, 0x99, &mut chr).unwrap();
    assert_eq!(chr.0[0x1020], 0x99);
}
