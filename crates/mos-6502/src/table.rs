//! Static 256-entry instruction descriptor table.
//!
//! One entry per opcode byte, undocumented opcodes included. Cycle counts
//! are base costs; `page_cycles` is added when an indexed operand crosses a
//! page. Branch penalties are applied by the branch handlers.

use crate::addressing::AddressingMode;
use crate::addressing::AddressingMode::{
    Absolute as Abs, AbsoluteX as Abx, AbsoluteY as Aby, Accumulator as Acc, Immediate as Imm,
    Implied as Imp, IndexedIndirect as Izx, Indirect as Ind, IndirectIndexed as Izy,
    Relative as Rel, ZeroPage as Zpg, ZeroPageX as Zpx, ZeroPageY as Zpy,
};
#[allow(clippy::wildcard_imports)]
use crate::instructions::*;

/// Decoded opcode descriptor.
#[derive(Clone, Copy)]
pub struct Instruction {
    /// Mnemonic as printed in traces.
    pub name: &'static str,
    pub mode: AddressingMode,
    /// Length in bytes, opcode included.
    pub size: u8,
    pub cycles: u8,
    pub page_cycles: u8,
    /// Documented by MOS. Undocumented ones are marked in traces.
    pub official: bool,
    pub handler: Handler,
}

/// The full opcode table, indexed by opcode byte.
pub static INSTRUCTIONS: [Instruction; 256] = build();

const fn build() -> [Instruction; 256] {
    let mut table = [Instruction {
        name: "KIL",
        mode: Imp,
        size: 1,
        cycles: 2,
        page_cycles: 0,
        official: false,
        handler: kil,
    }; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = Instruction {
            name: NAMES[i],
            mode: MODES[i],
            size: MODES[i].size(),
            cycles: CYCLES[i],
            page_cycles: PAGE_CYCLES[i],
            official: OFFICIAL[i],
            handler: HANDLERS[i],
        };
        i += 1;
    }
    table
}

#[rustfmt::skip]
const MODES: [AddressingMode; 256] = [
    Imp, Izx, Imp, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Acc, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, Aby, Abx, Abx, Abx, Abx,
    Abs, Izx, Imp, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Acc, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, Aby, Abx, Abx, Abx, Abx,
    Imp, Izx, Imp, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Acc, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, Aby, Abx, Abx, Abx, Abx,
    Imp, Izx, Imp, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Acc, Imm, Ind, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, Aby, Abx, Abx, Abx, Abx,
    Imm, Izx, Imm, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpy, Zpy, Imp, Aby, Imp, Aby, Abx, Abx, Aby, Aby,
    Imm, Izx, Imm, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpy, Zpy, Imp, Aby, Imp, Aby, Abx, Abx, Aby, Aby,
    Imm, Izx, Imm, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, Aby, Abx, Abx, Abx, Abx,
    Imm, Izx, Imm, Izx, Zpg, Zpg, Zpg, Zpg, Imp, Imm, Imp, Imm, Abs, Abs, Abs, Abs,
    Rel, Izy, Imp, Izy, Zpx, Zpx, Zpx, Zpx, Imp, Aby, Imp, Aby, Abx, Abx, Abx, Abx,
];

#[rustfmt::skip]
const CYCLES: [u8; 256] = [
    7, 6, 2, 8, 3, 3, 5, 5, 3, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 4, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 3, 2, 2, 2, 3, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 4, 2, 2, 2, 5, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 6, 2, 6, 4, 4, 4, 4, 2, 5, 2, 5, 5, 5, 5, 5,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 5, 2, 5, 4, 4, 4, 4, 2, 4, 2, 4, 4, 4, 4, 4,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
];

#[rustfmt::skip]
const PAGE_CYCLES: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    1, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0,
];

#[rustfmt::skip]
const NAMES: [&str; 256] = [
    "BRK", "ORA", "KIL", "SLO", "NOP", "ORA", "ASL", "SLO",
    "PHP", "ORA", "ASL", "ANC", "NOP", "ORA", "ASL", "SLO",
    "BPL", "ORA", "KIL", "SLO", "NOP", "ORA", "ASL", "SLO",
    "CLC", "ORA", "NOP", "SLO", "NOP", "ORA", "ASL", "SLO",
    "JSR", "AND", "KIL", "RLA", "BIT", "AND", "ROL", "RLA",
    "PLP", "AND", "ROL", "ANC", "BIT", "AND", "ROL", "RLA",
    "BMI", "AND", "KIL", "RLA", "NOP", "AND", "ROL", "RLA",
    "SEC", "AND", "NOP", "RLA", "NOP", "AND", "ROL", "RLA",
    "RTI", "EOR", "KIL", "SRE", "NOP", "EOR", "LSR", "SRE",
    "PHA", "EOR", "LSR", "ALR", "JMP", "EOR", "LSR", "SRE",
    "BVC", "EOR", "KIL", "SRE", "NOP", "EOR", "LSR", "SRE",
    "CLI", "EOR", "NOP", "SRE", "NOP", "EOR", "LSR", "SRE",
    "RTS", "ADC", "KIL", "RRA", "NOP", "ADC", "ROR", "RRA",
    "PLA", "ADC", "ROR", "ARR", "JMP", "ADC", "ROR", "RRA",
    "BVS", "ADC", "KIL", "RRA", "NOP", "ADC", "ROR", "RRA",
    "SEI", "ADC", "NOP", "RRA", "NOP", "ADC", "ROR", "RRA",
    "NOP", "STA", "NOP", "SAX", "STY", "STA", "STX", "SAX",
    "DEY", "NOP", "TXA", "XAA", "STY", "STA", "STX", "SAX",
    "BCC", "STA", "KIL", "AHX", "STY", "STA", "STX", "SAX",
    "TYA", "STA", "TXS", "TAS", "SHY", "STA", "SHX", "AHX",
    "LDY", "LDA", "LDX", "LAX", "LDY", "LDA", "LDX", "LAX",
    "TAY", "LDA", "TAX", "LAX", "LDY", "LDA", "LDX", "LAX",
    "BCS", "LDA", "KIL", "LAX", "LDY", "LDA", "LDX", "LAX",
    "CLV", "LDA", "TSX", "LAS", "LDY", "LDA", "LDX", "LAX",
    "CPY", "CMP", "NOP", "DCP", "CPY", "CMP", "DEC", "DCP",
    "INY", "CMP", "DEX", "AXS", "CPY", "CMP", "DEC", "DCP",
    "BNE", "CMP", "KIL", "DCP", "NOP", "CMP", "DEC", "DCP",
    "CLD", "CMP", "NOP", "DCP", "NOP", "CMP", "DEC", "DCP",
    "CPX", "SBC", "NOP", "ISB", "CPX", "SBC", "INC", "ISB",
    "INX", "SBC", "NOP", "SBC", "CPX", "SBC", "INC", "ISB",
    "BEQ", "SBC", "KIL", "ISB", "NOP", "SBC", "INC", "ISB",
    "SED", "SBC", "NOP", "ISB", "NOP", "SBC", "INC", "ISB",
];

#[rustfmt::skip]
const OFFICIAL: [bool; 256] = [
    true, true, false, false, false, true, true, false,
    true, true, true, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, true, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    false, true, false, false, true, true, true, false,
    true, false, true, false, true, true, true, false,
    true, true, false, false, true, true, true, false,
    true, true, true, false, false, true, false, false,
    true, true, true, false, true, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, true, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, true, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, true, true, true, false,
    true, true, true, false, true, true, true, false,
    true, true, false, false, false, true, true, false,
    true, true, false, false, false, true, true, false,
];

#[rustfmt::skip]
const HANDLERS: [Handler; 256] = [
    brk, ora, kil, slo, nop, ora, asl, slo,
    php, ora, asl, anc, nop, ora, asl, slo,
    bpl, ora, kil, slo, nop, ora, asl, slo,
    clc, ora, nop, slo, nop, ora, asl, slo,
    jsr, and, kil, rla, bit, and, rol, rla,
    plp, and, rol, anc, bit, and, rol, rla,
    bmi, and, kil, rla, nop, and, rol, rla,
    sec, and, nop, rla, nop, and, rol, rla,
    rti, eor, kil, sre, nop, eor, lsr, sre,
    pha, eor, lsr, alr, jmp, eor, lsr, sre,
    bvc, eor, kil, sre, nop, eor, lsr, sre,
    cli, eor, nop, sre, nop, eor, lsr, sre,
    rts, adc, kil, rra, nop, adc, ror, rra,
    pla, adc, ror, arr, jmp, adc, ror, rra,
    bvs, adc, kil, rra, nop, adc, ror, rra,
    sei, adc, nop, rra, nop, adc, ror, rra,
    nop, sta, nop, sax, sty, sta, stx, sax,
    dey, nop, txa, xaa, sty, sta, stx, sax,
    bcc, sta, kil, ahx, sty, sta, stx, sax,
    tya, sta, txs, tas, shy, sta, shx, ahx,
    ldy, lda, ldx, lax, ldy, lda, ldx, lax,
    tay, lda, tax, lax, ldy, lda, ldx, lax,
    bcs, lda, kil, lax, ldy, lda, ldx, lax,
    clv, lda, tsx, las, ldy, lda, ldx, lax,
    cpy, cmp, nop, dcp, cpy, cmp, dec, dcp,
    iny, cmp, dex, axs, cpy, cmp, dec, dcp,
    bne, cmp, kil, dcp, nop, cmp, dec, dcp,
    cld, cmp, nop, dcp, nop, cmp, dec, dcp,
    cpx, sbc, nop, isc, cpx, sbc, inc, isc,
    inx, sbc, nop, sbc, cpx, sbc, inc, isc,
    beq, sbc, kil, isc, nop, sbc, inc, isc,
    sed, sbc, nop, isc, nop, sbc, inc, isc,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_opcode_count() {
        assert_eq!(INSTRUCTIONS.iter().filter(|i| i.official).count(), 151);
    }

    #[test]
    fn descriptors_line_up() {
        let lda = &INSTRUCTIONS[0xBD];
        assert_eq!((lda.name, lda.mode, lda.size), ("LDA", AddressingMode::AbsoluteX, 3));
        assert_eq!((lda.cycles, lda.page_cycles), (4, 1));

        let sta = &INSTRUCTIONS[0x9D];
        assert_eq!((sta.cycles, sta.page_cycles), (5, 0));

        let jmp = &INSTRUCTIONS[0x6C];
        assert_eq!((jmp.mode, jmp.size, jmp.cycles), (AddressingMode::Indirect, 3, 5));

        let dcp = &INSTRUCTIONS[0xD3];
        assert_eq!((dcp.name, dcp.cycles, dcp.official), ("DCP", 8, false));
    }

    #[test]
    fn jam_opcodes_are_marked() {
        for opcode in [0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2] {
            assert_eq!(INSTRUCTIONS[opcode].name, "KIL", "opcode {opcode:#04X}");
        }
    }
}
