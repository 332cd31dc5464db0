//! NES emulator binary.
//!
//! Headless: loads an iNES image, runs a number of frames and prints the
//! machine state. Set `RUST_LOG=trace` for a per-instruction log.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emu_core::Observable;
use emu_nes::{Nes, NesConfig, NesError, cycles_to_seconds};

/// Run an NES ROM without a display.
#[derive(Parser, Debug)]
#[command(name = "emu-nes", version, about, long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    #[arg(short, long)]
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 60)]
    frames: u64,

    /// Give up if a single frame takes more steps than this
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print PPU and APU registers after the run
    #[arg(short, long)]
    dump: bool,
}

const DUMP_PATHS: [&str; 9] = [
    "ppu.scan_line",
    "ppu.clock",
    "ppu.ctrl",
    "ppu.mask",
    "ppu.status",
    "ppu.v",
    "apu.status",
    "apu.frame_counter",
    "cycles",
];

fn run(args: &Args) -> Result<(), String> {
    let rom_data =
        fs::read(&args.rom).map_err(|e| format!("{}: {e}", args.rom.display()))?;
    let mut nes = Nes::new(&NesConfig { rom_data }).map_err(|e| e.to_string())?;

    let limit = args.max_steps.unwrap_or(u64::MAX);
    let mut cycles = 0u64;
    for _ in 0..args.frames {
        cycles += nes
            .run_frame_bounded(limit)
            .map_err(|e: NesError| format!("frame {}: {e}", nes.frame_count()))?;
    }

    let cpu = nes.cpu();
    println!(
        "{} frames, {cycles} CPU cycles ({:.3}s); PC=${:04X} A=${:02X} X=${:02X} Y=${:02X} P=${:02X} SP=${:02X}",
        nes.frame_count(),
        cycles_to_seconds(cycles),
        cpu.regs.pc,
        cpu.regs.a,
        cpu.regs.x,
        cpu.regs.y,
        cpu.regs.p.0,
        cpu.regs.s,
    );

    if args.dump {
        for path in DUMP_PATHS {
            if let Some(value) = nes.query(path) {
                println!("{path:<18} {value}");
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("emu-nes: {e}");
            ExitCode::FAILURE
        }
    }
}
