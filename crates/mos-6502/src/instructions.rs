//! Opcode handlers.
//!
//! Each handler runs after the operand is resolved and PC has moved past
//! the instruction. Handlers touch memory only through the bus and add
//! cycles only for branch penalties.

use emu_core::Bus;

use crate::addressing::{Operand, pages_differ};
use crate::flags::{C, D, I, N, V, Z};
use crate::{CpuError, Mos6502, Status};

/// Signature shared by every entry in the opcode table.
pub type Handler = fn(&mut Mos6502, &mut dyn Bus, &Operand) -> Result<(), CpuError>;

type Step = Result<(), CpuError>;

// === Loads and stores ===

pub(crate) fn lda(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.a = bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn ldx(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.x = bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.x);
    Ok(())
}

pub(crate) fn ldy(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.y = bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.y);
    Ok(())
}

pub(crate) fn sta(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    Ok(bus.write(op.address, cpu.regs.a)?)
}

pub(crate) fn stx(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    Ok(bus.write(op.address, cpu.regs.x)?)
}

pub(crate) fn sty(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    Ok(bus.write(op.address, cpu.regs.y)?)
}

// === Transfers ===

pub(crate) fn tax(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.x = cpu.regs.a;
    cpu.regs.p.update_nz(cpu.regs.x);
    Ok(())
}

pub(crate) fn tay(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.y = cpu.regs.a;
    cpu.regs.p.update_nz(cpu.regs.y);
    Ok(())
}

pub(crate) fn tsx(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.x = cpu.regs.s;
    cpu.regs.p.update_nz(cpu.regs.x);
    Ok(())
}

pub(crate) fn txa(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.a = cpu.regs.x;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn txs(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.s = cpu.regs.x;
    Ok(())
}

pub(crate) fn tya(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.a = cpu.regs.y;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

// === Arithmetic and logic ===

pub(crate) fn adc(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.add_with_carry(value);
    Ok(())
}

pub(crate) fn sbc(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.add_with_carry(!value);
    Ok(())
}

pub(crate) fn and(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.a &= bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn ora(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.a |= bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn eor(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.a ^= bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn bit(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.regs.p.set_if(Z, value & cpu.regs.a == 0);
    cpu.regs.p.set_if(V, value & 0x40 != 0);
    cpu.regs.p.set_if(N, value & 0x80 != 0);
    Ok(())
}

pub(crate) fn cmp(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.compare(cpu.regs.a, value);
    Ok(())
}

pub(crate) fn cpx(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.compare(cpu.regs.x, value);
    Ok(())
}

pub(crate) fn cpy(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.compare(cpu.regs.y, value);
    Ok(())
}

// === Increments and decrements ===

pub(crate) fn inc(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?.wrapping_add(1);
    bus.write(op.address, value)?;
    cpu.regs.p.update_nz(value);
    Ok(())
}

pub(crate) fn dec(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?.wrapping_sub(1);
    bus.write(op.address, value)?;
    cpu.regs.p.update_nz(value);
    Ok(())
}

pub(crate) fn inx(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.x = cpu.regs.x.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.regs.x);
    Ok(())
}

pub(crate) fn iny(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.y = cpu.regs.y.wrapping_add(1);
    cpu.regs.p.update_nz(cpu.regs.y);
    Ok(())
}

pub(crate) fn dex(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.x = cpu.regs.x.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.regs.x);
    Ok(())
}

pub(crate) fn dey(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.y = cpu.regs.y.wrapping_sub(1);
    cpu.regs.p.update_nz(cpu.regs.y);
    Ok(())
}

// === Shifts and rotates (accumulator or memory) ===

pub(crate) fn asl(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.modify(bus, op, Mos6502::shift_left).map(drop)
}

pub(crate) fn lsr(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.modify(bus, op, Mos6502::shift_right).map(drop)
}

pub(crate) fn rol(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.modify(bus, op, Mos6502::rotate_left).map(drop)
}

pub(crate) fn ror(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.modify(bus, op, Mos6502::rotate_right).map(drop)
}

// === Jumps, calls, returns ===

pub(crate) fn jmp(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.pc = op.address;
    Ok(())
}

pub(crate) fn jsr(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.push_word(bus, cpu.regs.pc.wrapping_sub(1))?;
    cpu.regs.pc = op.address;
    Ok(())
}

pub(crate) fn rts(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.pc = cpu.pull_word(bus)?.wrapping_add(1);
    Ok(())
}

pub(crate) fn rti(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    let p = cpu.pull(bus)?;
    cpu.regs.p = Status::from_stack(p);
    cpu.regs.pc = cpu.pull_word(bus)?;
    Ok(())
}

pub(crate) fn brk(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    // The byte after BRK is padding and is skipped on return.
    let ret = cpu.regs.pc.wrapping_add(1);
    cpu.push_word(bus, ret)?;
    cpu.push(bus, cpu.regs.p.to_byte_brk())?;
    cpu.regs.p.set(I);
    cpu.regs.pc = bus.read_word(0xFFFE)?;
    Ok(())
}

// === Branches ===

pub(crate) fn bcc(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, C, false);
    Ok(())
}

pub(crate) fn bcs(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, C, true);
    Ok(())
}

pub(crate) fn bne(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, Z, false);
    Ok(())
}

pub(crate) fn beq(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, Z, true);
    Ok(())
}

pub(crate) fn bpl(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, N, false);
    Ok(())
}

pub(crate) fn bmi(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, N, true);
    Ok(())
}

pub(crate) fn bvc(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, V, false);
    Ok(())
}

pub(crate) fn bvs(cpu: &mut Mos6502, _bus: &mut dyn Bus, op: &Operand) -> Step {
    branch(cpu, op, V, true);
    Ok(())
}

/// Branch when `flag` equals `when_set`. Taken branches cost one extra
/// cycle, two if the target is on another page.
fn branch(cpu: &mut Mos6502, op: &Operand, flag: u8, when_set: bool) {
    if cpu.regs.p.is_set(flag) == when_set {
        cpu.cycles += 1;
        if pages_differ(cpu.regs.pc, op.address) {
            cpu.cycles += 1;
        }
        cpu.regs.pc = op.address;
    }
}

// === Stack ===

pub(crate) fn pha(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.push(bus, cpu.regs.a)
}

pub(crate) fn php(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.push(bus, cpu.regs.p.to_byte_brk())
}

pub(crate) fn pla(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.a = cpu.pull(bus)?;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn plp(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    let p = cpu.pull(bus)?;
    cpu.regs.p = Status::from_stack(p);
    Ok(())
}

// === Flags ===

pub(crate) fn clc(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.clear(C);
    Ok(())
}

pub(crate) fn cld(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.clear(D);
    Ok(())
}

pub(crate) fn cli(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.clear(I);
    Ok(())
}

pub(crate) fn clv(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.clear(V);
    Ok(())
}

pub(crate) fn sec(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.set(C);
    Ok(())
}

pub(crate) fn sed(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.set(D);
    Ok(())
}

pub(crate) fn sei(cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    cpu.regs.p.set(I);
    Ok(())
}

/// Every NOP variant, including the multi-byte ones. The operand is skipped
/// without a bus read.
pub(crate) fn nop(_cpu: &mut Mos6502, _bus: &mut dyn Bus, _op: &Operand) -> Step {
    Ok(())
}

// === Undocumented: read-modify-write combos ===

pub(crate) fn slo(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = cpu.modify(bus, op, Mos6502::shift_left)?;
    cpu.regs.a |= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn rla(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = cpu.modify(bus, op, Mos6502::rotate_left)?;
    cpu.regs.a &= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn sre(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = cpu.modify(bus, op, Mos6502::shift_right)?;
    cpu.regs.a ^= value;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn rra(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = cpu.modify(bus, op, Mos6502::rotate_right)?;
    cpu.add_with_carry(value);
    Ok(())
}

pub(crate) fn dcp(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?.wrapping_sub(1);
    bus.write(op.address, value)?;
    cpu.compare(cpu.regs.a, value);
    Ok(())
}

pub(crate) fn isc(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?.wrapping_add(1);
    bus.write(op.address, value)?;
    cpu.add_with_carry(!value);
    Ok(())
}

// === Undocumented: loads, stores, immediates ===

pub(crate) fn lax(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.regs.a = value;
    cpu.regs.x = value;
    cpu.regs.p.update_nz(value);
    Ok(())
}

pub(crate) fn sax(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    Ok(bus.write(op.address, cpu.regs.a & cpu.regs.x)?)
}

pub(crate) fn anc(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.a &= bus.read(op.address)?;
    cpu.regs.p.update_nz(cpu.regs.a);
    cpu.regs.p.set_if(C, cpu.regs.a & 0x80 != 0);
    Ok(())
}

pub(crate) fn alr(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = cpu.regs.a & bus.read(op.address)?;
    cpu.regs.a = cpu.shift_right(value);
    Ok(())
}

pub(crate) fn arr(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = cpu.regs.a & bus.read(op.address)?;
    let carry_in = if cpu.regs.p.is_set(C) { 0x80 } else { 0 };
    let result = (value >> 1) | carry_in;
    cpu.regs.a = result;
    cpu.regs.p.update_nz(result);
    cpu.regs.p.set_if(C, result & 0x40 != 0);
    cpu.regs.p.set_if(V, ((result >> 6) ^ (result >> 5)) & 1 != 0);
    Ok(())
}

/// AXS (SBX): X = (A & X) - M, setting C like CMP.
pub(crate) fn axs(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    let ax = cpu.regs.a & cpu.regs.x;
    cpu.regs.x = ax.wrapping_sub(value);
    cpu.regs.p.set_if(C, ax >= value);
    cpu.regs.p.update_nz(cpu.regs.x);
    Ok(())
}

/// XAA (ANE) is analog on real silicon; $EE is the commonly observed magic.
pub(crate) fn xaa(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)?;
    cpu.regs.a = (cpu.regs.a | 0xEE) & cpu.regs.x & value;
    cpu.regs.p.update_nz(cpu.regs.a);
    Ok(())
}

pub(crate) fn las(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    let value = bus.read(op.address)? & cpu.regs.s;
    cpu.regs.a = value;
    cpu.regs.x = value;
    cpu.regs.s = value;
    cpu.regs.p.update_nz(value);
    Ok(())
}

pub(crate) fn ahx(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    unstable_store(bus, op, cpu.regs.a & cpu.regs.x, cpu.regs.y)
}

pub(crate) fn shx(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    unstable_store(bus, op, cpu.regs.x, cpu.regs.y)
}

pub(crate) fn shy(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    unstable_store(bus, op, cpu.regs.y, cpu.regs.x)
}

pub(crate) fn tas(cpu: &mut Mos6502, bus: &mut dyn Bus, op: &Operand) -> Step {
    cpu.regs.s = cpu.regs.a & cpu.regs.x;
    unstable_store(bus, op, cpu.regs.s, cpu.regs.y)
}

/// SHA/SHX/SHY/TAS store `value & (base_high + 1)`. When indexing crossed a
/// page, the stored value also replaces the high byte of the target.
fn unstable_store(bus: &mut dyn Bus, op: &Operand, value: u8, index: u8) -> Step {
    let base = op.address.wrapping_sub(u16::from(index));
    let high = ((base >> 8) as u8).wrapping_add(1);
    let stored = value & high;
    let address = if op.page_crossed {
        (u16::from(stored) << 8) | (op.address & 0x00FF)
    } else {
        op.address
    };
    Ok(bus.write(address, stored)?)
}

pub(crate) fn kil(cpu: &mut Mos6502, bus: &mut dyn Bus, _op: &Operand) -> Step {
    let pc = cpu.regs.pc.wrapping_sub(1);
    let opcode = bus.read(pc)?;
    Err(CpuError::Jammed { opcode, pc })
}
