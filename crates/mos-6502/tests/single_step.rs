//! Single-instruction state vectors in the `SingleStepTests` JSON layout.
//!
//! Each case gives the full CPU and RAM state before and after one
//! instruction plus its bus activity. Only the activity count is compared:
//! this core is instruction-stepped, so it reports cycle totals rather than
//! per-cycle bus traffic.

use emu_core::{Cpu, SimpleBus};
use mos_6502::{Mos6502, Status};
use serde::Deserialize;

#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: Vec<(u16, u8, String)>,
}

#[derive(Deserialize)]
struct CpuState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

fn setup(cpu: &mut Mos6502, bus: &mut SimpleBus, state: &CpuState) {
    for &(addr, value) in &state.ram {
        bus.load(addr, &[value]);
    }
    cpu.regs.pc = state.pc;
    cpu.regs.s = state.s;
    cpu.regs.a = state.a;
    cpu.regs.x = state.x;
    cpu.regs.y = state.y;
    cpu.regs.p = Status(state.p);
}

fn compare(cpu: &Mos6502, bus: &SimpleBus, expected: &CpuState) -> Vec<String> {
    let mut errors = Vec::new();
    let regs = [
        ("pc", u32::from(cpu.regs.pc), u32::from(expected.pc)),
        ("s", u32::from(cpu.regs.s), u32::from(expected.s)),
        ("a", u32::from(cpu.regs.a), u32::from(expected.a)),
        ("x", u32::from(cpu.regs.x), u32::from(expected.x)),
        ("y", u32::from(cpu.regs.y), u32::from(expected.y)),
        ("p", u32::from(cpu.regs.p.0), u32::from(expected.p)),
    ];
    for (name, got, want) in regs {
        if got != want {
            errors.push(format!("{name}: got {got:#X}, want {want:#X}"));
        }
    }
    for &(addr, want) in &expected.ram {
        let got = bus.peek(addr);
        if got != want {
            errors.push(format!("ram[{addr:#06X}]: got {got:#04X}, want {want:#04X}"));
        }
    }
    errors
}

const CASES: &str = r#"[
  {
    "name": "a9 80 LDA immediate negative",
    "initial": {"pc": 1024, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36,
                "ram": [[1024, 169], [1025, 128]]},
    "final":   {"pc": 1026, "s": 253, "a": 128, "x": 0, "y": 0, "p": 164,
                "ram": [[1024, 169], [1025, 128]]},
    "cycles": [[1024, 169, "read"], [1025, 128, "read"]]
  },
  {
    "name": "6d ADC absolute with carry in",
    "initial": {"pc": 1024, "s": 253, "a": 255, "x": 0, "y": 0, "p": 37,
                "ram": [[1024, 109], [1025, 0], [1026, 32], [8192, 1]]},
    "final":   {"pc": 1027, "s": 253, "a": 1, "x": 0, "y": 0, "p": 37,
                "ram": [[8192, 1]]},
    "cycles": [[1024, 109, "read"], [1025, 0, "read"], [1026, 32, "read"], [8192, 1, "read"]]
  },
  {
    "name": "b1 LDA (zp),Y crossing a page",
    "initial": {"pc": 1024, "s": 253, "a": 85, "x": 0, "y": 32, "p": 36,
                "ram": [[1024, 177], [1025, 128], [128, 240], [129, 18], [4880, 0]]},
    "final":   {"pc": 1026, "s": 253, "a": 0, "x": 0, "y": 32, "p": 38,
                "ram": [[4880, 0]]},
    "cycles": [[1024, 177, "read"], [1025, 128, "read"], [128, 240, "read"],
               [129, 18, "read"], [4624, 0, "read"], [4880, 0, "read"]]
  },
  {
    "name": "91 STA (zp),Y crossing a page",
    "initial": {"pc": 1024, "s": 253, "a": 51, "x": 0, "y": 32, "p": 36,
                "ram": [[1024, 145], [1025, 128], [128, 240], [129, 18]]},
    "final":   {"pc": 1026, "s": 253, "a": 51, "x": 0, "y": 32, "p": 36,
                "ram": [[4880, 51]]},
    "cycles": [[1024, 145, "read"], [1025, 128, "read"], [128, 240, "read"],
               [129, 18, "read"], [4624, 0, "read"], [4880, 51, "write"]]
  },
  {
    "name": "e6 INC zero page wraps to zero",
    "initial": {"pc": 1024, "s": 253, "a": 0, "x": 0, "y": 0, "p": 164,
                "ram": [[1024, 230], [1025, 16], [16, 255]]},
    "final":   {"pc": 1026, "s": 253, "a": 0, "x": 0, "y": 0, "p": 38,
                "ram": [[16, 0]]},
    "cycles": [[1024, 230, "read"], [1025, 16, "read"], [16, 255, "read"],
               [16, 255, "write"], [16, 0, "write"]]
  },
  {
    "name": "28 PLP drops break, keeps unused",
    "initial": {"pc": 1024, "s": 252, "a": 0, "x": 0, "y": 0, "p": 36,
                "ram": [[1024, 40], [509, 255]]},
    "final":   {"pc": 1025, "s": 253, "a": 0, "x": 0, "y": 0, "p": 239,
                "ram": []},
    "cycles": [[1024, 40, "read"], [1025, 0, "read"], [508, 0, "read"], [509, 255, "read"]]
  },
  {
    "name": "cb AXS immediate",
    "initial": {"pc": 1024, "s": 253, "a": 15, "x": 255, "y": 0, "p": 36,
                "ram": [[1024, 203], [1025, 16]]},
    "final":   {"pc": 1026, "s": 253, "a": 15, "x": 255, "y": 0, "p": 164,
                "ram": []},
    "cycles": [[1024, 203, "read"], [1025, 16, "read"]]
  },
  {
    "name": "96 STX zp,Y wraps in zero page",
    "initial": {"pc": 1024, "s": 253, "a": 0, "x": 119, "y": 32, "p": 36,
                "ram": [[1024, 150], [1025, 240]]},
    "final":   {"pc": 1026, "s": 253, "a": 0, "x": 119, "y": 32, "p": 36,
                "ram": [[16, 119]]},
    "cycles": [[1024, 150, "read"], [1025, 240, "read"], [240, 0, "read"], [16, 119, "write"]]
  }
]"#;

#[test]
fn single_step_vectors() {
    let cases: Vec<TestCase> = serde_json::from_str(CASES).expect("vectors parse");
    let mut failures = Vec::new();

    for case in &cases {
        let mut cpu = Mos6502::new();
        let mut bus = SimpleBus::new();
        setup(&mut cpu, &mut bus, &case.initial);

        match cpu.step(&mut bus) {
            Ok(cycles) => {
                let mut errors = compare(&cpu, &bus, &case.final_state);
                if cycles as usize != case.cycles.len() {
                    errors.push(format!("cycles: got {cycles}, want {}", case.cycles.len()));
                }
                if !errors.is_empty() {
                    failures.push(format!("{}: {}", case.name, errors.join("; ")));
                }
            }
            Err(e) => failures.push(format!("{}: {e}", case.name)),
        }
    }

    assert!(failures.is_empty(), "{}", failures.join("\n"));
}
