//! Console boot tests on iNES images assembled in memory.

use emu_nes::{Nes, NesConfig, NesError};
use mos_6502::CpuError;
use nes_cartridge::RomError;

const PRG_SIZE: usize = 32 * 1024;
const CHR_SIZE: usize = 8 * 1024;

/// NROM-256 image: `code` at $8000, `chr` at the start of pattern table 0,
/// reset at $8000, NMI and IRQ at `handler`.
fn build_nrom(code: &[u8], handler: u16, chr: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 16 + PRG_SIZE + CHR_SIZE];
    rom[0..4].copy_from_slice(b"NES\x1a");
    rom[4] = 2;
    rom[5] = 1;

    let prg = &mut rom[16..16 + PRG_SIZE];
    prg[..code.len()].copy_from_slice(code);
    let [lo, hi] = handler.to_le_bytes();
    prg[0x7FFA..].copy_from_slice(&[lo, hi, 0x00, 0x80, lo, hi]);

    rom[16 + PRG_SIZE..16 + PRG_SIZE + chr.len()].copy_from_slice(chr);
    rom
}

fn boot(code: &[u8]) -> Nes {
    Nes::new(&NesConfig {
        rom_data: build_nrom(code, 0x8000, &[]),
    })
    .unwrap()
}

#[test]
fn boots_to_idle_loop_after_two_vblanks() {
    #[rustfmt::skip]
    let code = [
        0x78,             // $8000  SEI
        0xD8,             // $8001  CLD
        0xA2, 0xFF,       // $8002  LDX #$FF
        0x9A,             // $8004  TXS
        0xAD, 0x02, 0x20, // $8005  LDA $2002
        0x10, 0xFB,       // $8008  BPL $8005
        0xAD, 0x02, 0x20, // $800A  LDA $2002
        0x10, 0xFB,       // $800D  BPL $800A
        0x4C, 0x0F, 0x80, // $800F  JMP $800F
    ];
    let mut nes = boot(&code);
    assert_eq!(nes.cpu().regs.pc, 0x8000);

    for _ in 0..5 {
        nes.run_frame().unwrap();
        if nes.cpu().regs.pc == 0x800F {
            assert_eq!(nes.cpu().regs.s, 0xFF);
            return;
        }
    }
    panic!("stuck at ${:04X}", nes.cpu().regs.pc);
}

/// Loads a palette, writes "HELLO NES" to the nametable and turns
/// rendering on with NMIs enabled.
fn build_hello_rom() -> Vec<u8> {
    #[rustfmt::skip]
    let code = [
        0x78, 0xD8, 0xA2, 0xFF, 0x9A,   // $8000  SEI / CLD / LDX #$FF / TXS
        0xA9, 0x00, 0x8D, 0x01, 0x20,   // $8005  LDA #0 / STA PPUMASK
        0xAD, 0x02, 0x20, 0x10, 0xFB,   // $800A  wait vblank
        0xAD, 0x02, 0x20, 0x10, 0xFB,   // $800F  wait vblank
        0xAD, 0x02, 0x20,               // $8014  LDA PPUSTATUS (reset w)
        0xA9, 0x3F, 0x8D, 0x06, 0x20,   // $8017  PPUADDR = $3F00
        0xA9, 0x00, 0x8D, 0x06, 0x20,   // $801C
        0xA2, 0x00,                     // $8021  LDX #0
        0xBD, 0x5A, 0x80,               // $8023  LDA palette,X
        0x8D, 0x07, 0x20,               // $8026  STA PPUDATA
        0xE8, 0xE0, 0x04, 0xD0, 0xF5,   // $8029  INX / CPX #4 / BNE
        0xA9, 0x21, 0x8D, 0x06, 0x20,   // $802E  PPUADDR = $21CC
        0xA9, 0xCC, 0x8D, 0x06, 0x20,   // $8033
        0xA2, 0x00,                     // $8038  LDX #0
        0xBD, 0x5E, 0x80,               // $803A  LDA text,X
        0x8D, 0x07, 0x20,               // $803D  STA PPUDATA
        0xE8, 0xE0, 0x09, 0xD0, 0xF5,   // $8040  INX / CPX #9 / BNE
        0xA9, 0x00,                     // $8045  LDA #0
        0x8D, 0x05, 0x20,               // $8047  PPUSCROLL x
        0x8D, 0x05, 0x20,               // $804A  PPUSCROLL y
        0xA9, 0x1E, 0x8D, 0x01, 0x20,   // $804D  PPUMASK = BG + sprites, no clipping
        0xA9, 0x80, 0x8D, 0x00, 0x20,   // $8052  PPUCTRL = NMI on
        0x4C, 0x57, 0x80,               // $8057  JMP $8057
        0x0F, 0x30, 0x10, 0x00,         // $805A  palette
        0x01, 0x02, 0x03, 0x03, 0x04, 0x00, 0x05, 0x02, 0x06, // $805E  "HELLO NES"
        0x40,                           // $8067  RTI
    ];

    // Plane 0 only: every set bit is colour 1.
    #[rustfmt::skip]
    let glyphs: [[u8; 8]; 7] = [
        [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // space
        [0x88, 0x88, 0x88, 0xF8, 0x88, 0x88, 0x88, 0x00], // H
        [0xF8, 0x80, 0x80, 0xF0, 0x80, 0x80, 0xF8, 0x00], // E
        [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xF8, 0x00], // L
        [0x70, 0x88, 0x88, 0x88, 0x88, 0x88, 0x70, 0x00], // O
        [0x88, 0xC8, 0xA8, 0x98, 0x88, 0x88, 0x88, 0x00], // N
        [0x70, 0x88, 0x80, 0x70, 0x08, 0x88, 0x70, 0x00], // S
    ];
    let mut chr = Vec::new();
    for glyph in glyphs {
        chr.extend_from_slice(&glyph);
        chr.extend_from_slice(&[0; 8]);
    }

    build_nrom(&code, 0x8067, &chr)
}

#[test]
fn renders_background_text() {
    let mut nes = Nes::new(&NesConfig {
        rom_data: build_hello_rom(),
    })
    .unwrap();

    for _ in 0..10 {
        nes.run_frame().unwrap();
    }
    assert!(
        (0x8057..=0x8059).contains(&nes.cpu().regs.pc),
        "not idle: PC=${:04X}",
        nes.cpu().regs.pc
    );

    let frame = nes.framebuffer();
    // Blank tiles show the backdrop.
    assert_eq!(frame.pixel(0, 0), Some(0x0F));
    assert_eq!(frame.pixel(255, 239), Some(0x0F));
    // "H" starts at tile (12, 14); its top-left pixel is set.
    assert_eq!(frame.pixel(96, 112), Some(0x30));
    // Column 1 of the H's top row is clear.
    assert_eq!(frame.pixel(97, 112), Some(0x0F));
    // The crossbar on row 3.
    assert_eq!(frame.pixel(98, 115), Some(0x30));
}

#[test]
fn oam_dma_on_odd_cycle_stalls_514() {
    // Reset leaves 7 cycles; LDA #imm (2) + STA abs (4) ends on 13.
    let mut nes = boot(&[0xA9, 0x02, 0x8D, 0x14, 0x40]);
    nes.step().unwrap();
    nes.step().unwrap();
    assert_eq!(nes.cpu().cycles(), 13);
    assert_eq!(nes.cpu().stall_remaining(), 514);
}

#[test]
fn oam_dma_on_even_cycle_stalls_513() {
    // LDA zp (3) + STA abs (4) ends on 14.
    let mut nes = boot(&[0xA5, 0x10, 0x8D, 0x14, 0x40]);
    nes.step().unwrap();
    nes.step().unwrap();
    assert_eq!(nes.cpu().cycles(), 14);
    assert_eq!(nes.cpu().stall_remaining(), 513);
}

#[test]
fn oam_dma_copies_page_from_oam_addr() {
    #[rustfmt::skip]
    let code = [
        0xA9, 0x10, 0x8D, 0x03, 0x20, // OAMADDR = $10
        0xA9, 0x02, 0x8D, 0x14, 0x40, // OAMDMA from $0200
    ];
    let mut nes = boot(&code);
    for (i, byte) in nes.bus_mut().ram[0x200..0x300].iter_mut().enumerate() {
        *byte = (i as u8) ^ 0x5A;
    }
    for _ in 0..4 {
        nes.step().unwrap();
    }

    let ppu = &nes.bus().ppu;
    assert_eq!(ppu.read_oam(0x10), 0x5A);
    assert_eq!(ppu.read_oam(0x11), 0x01 ^ 0x5A);
    // The last 16 bytes wrap to the start of OAM.
    assert_eq!(ppu.read_oam(0x0F), 0xFF ^ 0x5A);
}

#[test]
fn stalled_steps_cost_one_cycle_each() {
    let mut nes = boot(&[0xA9, 0x02, 0x8D, 0x14, 0x40]);
    nes.step().unwrap();
    nes.step().unwrap();
    let pc = nes.cpu().regs.pc;
    let clock = nes.bus().ppu.clock();

    assert_eq!(nes.step().unwrap(), 1);
    assert_eq!(nes.cpu().regs.pc, pc);
    assert_eq!(nes.cpu().stall_remaining(), 513);
    assert_eq!((nes.bus().ppu.clock() + 341 - clock) % 341, 3);
}

#[test]
fn jam_opcode_aborts_step() {
    let mut nes = boot(&[0x02]);
    assert_eq!(
        nes.step(),
        Err(NesError::Cpu(CpuError::Jammed {
            opcode: 0x02,
            pc: 0x8000
        }))
    );
}

#[test]
fn rejects_unsupported_mapper() {
    let mut rom_data = build_nrom(&[], 0x8000, &[]);
    rom_data[6] = 0x10;
    assert!(matches!(
        Nes::new(&NesConfig { rom_data }),
        Err(NesError::Rom(RomError::UnsupportedMapper(1)))
    ));
}

#[test]
fn rejects_bad_magic() {
    let mut rom_data = build_nrom(&[], 0x8000, &[]);
    rom_data[3] = 0x00;
    assert!(matches!(
        Nes::new(&NesConfig { rom_data }),
        Err(NesError::Rom(RomError::BadMagic))
    ));
}
