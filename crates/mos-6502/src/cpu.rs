//! Instruction-stepped CPU core.

use emu_core::{Bus, Cpu, Observable, Value};
use log::trace;

use crate::addressing::{self, AddressingMode, Operand};
use crate::flags::{C, D, I, N, V, Z};
use crate::registers::Registers;
use crate::table::INSTRUCTIONS;
use crate::CpuError;

const NMI_VECTOR: u16 = 0xFFFA;
const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles taken by reset and by interrupt entry.
const INTERRUPT_CYCLES: u32 = 7;

/// 2A03 CPU core.
pub struct Mos6502 {
    pub regs: Registers,
    /// Total cycles since power-on.
    pub(crate) cycles: u64,
    /// Cycles left to burn before the next instruction (DMA).
    stall: u32,
    nmi_pending: bool,
    irq_pending: bool,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            cycles: 0,
            stall: 0,
            nmi_pending: false,
            irq_pending: false,
        }
    }

    /// Total cycles executed since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Suspend instruction execution for `cycles` cycles.
    pub fn stall(&mut self, cycles: u32) {
        self.stall += cycles;
    }

    /// Stall cycles still to be consumed.
    #[must_use]
    pub fn stall_remaining(&self) -> u32 {
        self.stall
    }

    fn execute(&mut self, bus: &mut dyn Bus) -> Result<u32, CpuError> {
        let start = self.cycles;
        let pc = self.regs.pc;
        let opcode = bus.read(pc)?;
        let instruction = &INSTRUCTIONS[opcode as usize];
        let operand = addressing::resolve(bus, instruction.mode, pc, self.regs.x, self.regs.y)?;

        trace!(
            "{pc:04X}  {opcode:02X} {marker}{name}  A:{a:02X} X:{x:02X} Y:{y:02X} P:{p:02X} SP:{s:02X} CYC:{start}",
            marker = if instruction.official { ' ' } else { '*' },
            name = instruction.name,
            a = self.regs.a,
            x = self.regs.x,
            y = self.regs.y,
            p = self.regs.p.0,
            s = self.regs.s,
        );

        self.regs.pc = pc.wrapping_add(u16::from(instruction.size));
        self.cycles += u64::from(instruction.cycles);
        if operand.page_crossed {
            self.cycles += u64::from(instruction.page_cycles);
        }
        (instruction.handler)(self, bus, &operand)?;

        Ok((self.cycles - start) as u32)
    }

    fn interrupt(&mut self, bus: &mut dyn Bus, vector: u16) -> Result<u32, CpuError> {
        self.push_word(bus, self.regs.pc)?;
        self.push(bus, self.regs.p.to_byte_irq())?;
        self.regs.p.set(I);
        self.regs.pc = bus.read_word(vector)?;
        self.cycles += u64::from(INTERRUPT_CYCLES);
        Ok(INTERRUPT_CYCLES)
    }

    // === Stack ===

    pub(crate) fn push(&mut self, bus: &mut dyn Bus, value: u8) -> Result<(), CpuError> {
        let addr = self.regs.push();
        Ok(bus.write(addr, value)?)
    }

    pub(crate) fn pull(&mut self, bus: &mut dyn Bus) -> Result<u8, CpuError> {
        let addr = self.regs.pop();
        Ok(bus.read(addr)?)
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn Bus, value: u16) -> Result<(), CpuError> {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi)?;
        self.push(bus, lo)
    }

    pub(crate) fn pull_word(&mut self, bus: &mut dyn Bus) -> Result<u16, CpuError> {
        let lo = self.pull(bus)?;
        let hi = self.pull(bus)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    // === ALU helpers ===

    /// A = A + value + C. SBC feeds the one's complement of its operand.
    pub(crate) fn add_with_carry(&mut self, value: u8) {
        let a = self.regs.a;
        let sum = u16::from(a) + u16::from(value) + u16::from(self.regs.p.is_set(C));
        let result = sum as u8;
        self.regs.p.set_if(C, sum > 0xFF);
        self.regs.p.set_if(V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    pub(crate) fn compare(&mut self, register: u8, value: u8) {
        self.regs.p.update_nz(register.wrapping_sub(value));
        self.regs.p.set_if(C, register >= value);
    }

    pub(crate) fn shift_left(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn shift_right(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn rotate_left(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    pub(crate) fn rotate_right(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_nz(result);
        result
    }

    /// Apply `op` to the accumulator or to memory, writing the result back.
    pub(crate) fn modify(
        &mut self,
        bus: &mut dyn Bus,
        operand: &Operand,
        op: fn(&mut Self, u8) -> u8,
    ) -> Result<u8, CpuError> {
        if operand.mode == AddressingMode::Accumulator {
            let a = self.regs.a;
            self.regs.a = op(self, a);
            Ok(self.regs.a)
        } else {
            let value = bus.read(operand.address)?;
            let result = op(self, value);
            bus.write(operand.address, result)?;
            Ok(result)
        }
    }
}

impl Cpu for Mos6502 {
    type Error = CpuError;

    fn step(&mut self, bus: &mut dyn Bus) -> Result<u32, CpuError> {
        if self.stall > 0 {
            self.stall -= 1;
            self.cycles += 1;
            return Ok(1);
        }
        if self.nmi_pending {
            self.nmi_pending = false;
            return self.interrupt(bus, NMI_VECTOR);
        }
        if self.irq_pending && !self.regs.p.is_set(I) {
            self.irq_pending = false;
            return self.interrupt(bus, IRQ_VECTOR);
        }
        self.execute(bus)
    }

    fn reset(&mut self, bus: &mut dyn Bus) -> Result<(), CpuError> {
        self.regs = Registers::new();
        self.regs.pc = bus.read_word(RESET_VECTOR)?;
        self.cycles = u64::from(INTERRUPT_CYCLES);
        self.stall = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        log::debug!("CPU reset, PC=${:04X}", self.regs.pc);
        Ok(())
    }

    fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Latched until serviced; held off while I is set.
    fn irq(&mut self) {
        self.irq_pending = true;
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }
}

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        let p = self.regs.p;
        let value = match path {
            "pc" => self.regs.pc.into(),
            "a" => self.regs.a.into(),
            "x" => self.regs.x.into(),
            "y" => self.regs.y.into(),
            "s" | "sp" => self.regs.s.into(),
            "p" => p.0.into(),
            "cycles" => self.cycles.into(),
            "stall" => u64::from(self.stall).into(),
            "flags.c" => p.is_set(C).into(),
            "flags.z" => p.is_set(Z).into(),
            "flags.i" => p.is_set(I).into(),
            "flags.d" => p.is_set(D).into(),
            "flags.v" => p.is_set(V).into(),
            "flags.n" => p.is_set(N).into(),
            _ => return None,
        };
        Some(value)
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "cycles", "stall", "flags.c", "flags.z", "flags.i",
            "flags.d", "flags.v", "flags.n",
        ]
    }
}
