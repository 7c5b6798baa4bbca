// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Z80 instruction template table.
//!
//! One row per instruction or parametrized instruction family. Columns:
//! instruction set, instruction text, Z80 T-states, Amstrad CPC NOPs and
//! opcode bytes. Conditional rows carry `taken/not-taken` timings. MSX
//! timings are not listed: they are the Z80 timing plus one wait state per
//! M1 cycle and are derived when the table is loaded.
//!
//! Opcode tokens: `n` immediate byte, `o` index displacement, `e` relative
//! jump offset. One token may be parametrized as `base+[factor*]axis[+...]`;
//! see [`crate::z80::opcodes`] for the axes.

use super::InstructionSet;

/// A raw table row, expanded into concrete instructions at load time.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRow {
    pub set: InstructionSet,
    pub instruction: &'static str,
    pub z80: &'static str,
    pub cpc: &'static str,
    pub opcode: &'static str,
}

const fn row(
    set: InstructionSet,
    instruction: &'static str,
    z80: &'static str,
    cpc: &'static str,
    opcode: &'static str,
) -> TemplateRow {
    TemplateRow {
        set,
        instruction,
        z80,
        cpc,
        opcode,
    }
}

const S: InstructionSet = InstructionSet::Z80;
const N: InstructionSet = InstructionSet::Z80N;

pub static OPCODE_TABLE: &[TemplateRow] = &[
    // 8-bit loads
    row(S, "LD r,r'", "4", "1", "40+8*r+r'"),
    row(S, "LD r,n", "7", "2", "06+8*r n"),
    row(S, "LD r,(HL)", "7", "2", "46+8*r"),
    row(S, "LD r,(IX+o)", "19", "5", "DD 46+8*r o"),
    row(S, "LD r,(IY+o)", "19", "5", "FD 46+8*r o"),
    row(S, "LD (HL),r", "7", "2", "70+r"),
    row(S, "LD (IX+o),r", "19", "5", "DD 70+r o"),
    row(S, "LD (IY+o),r", "19", "5", "FD 70+r o"),
    row(S, "LD (HL),n", "10", "3", "36 n"),
    row(S, "LD (IX+o),n", "19", "6", "DD 36 o n"),
    row(S, "LD (IY+o),n", "19", "6", "FD 36 o n"),
    row(S, "LD A,(BC)", "7", "2", "0A"),
    row(S, "LD A,(DE)", "7", "2", "1A"),
    row(S, "LD A,(nn)", "13", "4", "3A n n"),
    row(S, "LD (BC),A", "7", "2", "02"),
    row(S, "LD (DE),A", "7", "2", "12"),
    row(S, "LD (nn),A", "13", "4", "32 n n"),
    row(S, "LD A,I", "9", "3", "ED 57"),
    row(S, "LD A,R", "9", "3", "ED 5F"),
    row(S, "LD I,A", "9", "3", "ED 47"),
    row(S, "LD R,A", "9", "3", "ED 4F"),
    // Undocumented index register halves
    row(S, "LD r,p", "8", "2", "DD 40+8*r+p"),
    row(S, "LD p,r", "8", "2", "DD 40+8*p+r"),
    row(S, "LD p,n", "11", "3", "DD 06+8*p n"),
    row(S, "LD r,q", "8", "2", "FD 40+8*r+q"),
    row(S, "LD q,r", "8", "2", "FD 40+8*q+r"),
    row(S, "LD q,n", "11", "3", "FD 06+8*q n"),
    // 16-bit loads
    row(S, "LD BC,nn", "10", "3", "01 n n"),
    row(S, "LD DE,nn", "10", "3", "11 n n"),
    row(S, "LD HL,nn", "10", "3", "21 n n"),
    row(S, "LD SP,nn", "10", "3", "31 n n"),
    row(S, "LD IX,nn", "14", "4", "DD 21 n n"),
    row(S, "LD IY,nn", "14", "4", "FD 21 n n"),
    row(S, "LD HL,(nn)", "16", "5", "2A n n"),
    row(S, "LD BC,(nn)", "20", "6", "ED 4B n n"),
    row(S, "LD DE,(nn)", "20", "6", "ED 5B n n"),
    row(S, "LD SP,(nn)", "20", "6", "ED 7B n n"),
    row(S, "LD IX,(nn)", "20", "6", "DD 2A n n"),
    row(S, "LD IY,(nn)", "20", "6", "FD 2A n n"),
    row(S, "LD (nn),HL", "16", "5", "22 n n"),
    row(S, "LD (nn),BC", "20", "6", "ED 43 n n"),
    row(S, "LD (nn),DE", "20", "6", "ED 53 n n"),
    row(S, "LD (nn),SP", "20", "6", "ED 73 n n"),
    row(S, "LD (nn),IX", "20", "6", "DD 22 n n"),
    row(S, "LD (nn),IY", "20", "6", "FD 22 n n"),
    row(S, "LD SP,HL", "6", "2", "F9"),
    row(S, "LD SP,IX", "10", "3", "DD F9"),
    row(S, "LD SP,IY", "10", "3", "FD F9"),
    row(S, "PUSH BC", "11", "4", "C5"),
    row(S, "PUSH DE", "11", "4", "D5"),
    row(S, "PUSH HL", "11", "4", "E5"),
    row(S, "PUSH AF", "11", "4", "F5"),
    row(S, "PUSH IX", "15", "5", "DD E5"),
    row(S, "PUSH IY", "15", "5", "FD E5"),
    row(S, "POP BC", "10", "3", "C1"),
    row(S, "POP DE", "10", "3", "D1"),
    row(S, "POP HL", "10", "3", "E1"),
    row(S, "POP AF", "10", "3", "F1"),
    row(S, "POP IX", "14", "4", "DD E1"),
    row(S, "POP IY", "14", "4", "FD E1"),
    // Exchange, block transfer and search
    row(S, "EX DE,HL", "4", "1", "EB"),
    row(S, "EX AF,AF'", "4", "1", "08"),
    row(S, "EXX", "4", "1", "D9"),
    row(S, "EX (SP),HL", "19", "6", "E3"),
    row(S, "EX (SP),IX", "23", "7", "DD E3"),
    row(S, "EX (SP),IY", "23", "7", "FD E3"),
    row(S, "LDI", "16", "5", "ED A0"),
    row(S, "LDIR", "21/16", "6/5", "ED B0"),
    row(S, "LDD", "16", "5", "ED A8"),
    row(S, "LDDR", "21/16", "6/5", "ED B8"),
    row(S, "CPI", "16", "4", "ED A1"),
    row(S, "CPIR", "21/16", "6/4", "ED B1"),
    row(S, "CPD", "16", "4", "ED A9"),
    row(S, "CPDR", "21/16", "6/4", "ED B9"),
    // 8-bit arithmetic and logic
    row(S, "ADD A,r", "4", "1", "80+r"),
    row(S, "ADD A,n", "7", "2", "C6 n"),
    row(S, "ADD A,(HL)", "7", "2", "86"),
    row(S, "ADD A,(IX+o)", "19", "5", "DD 86 o"),
    row(S, "ADD A,(IY+o)", "19", "5", "FD 86 o"),
    row(S, "ADD A,p", "8", "2", "DD 80+p"),
    row(S, "ADD A,q", "8", "2", "FD 80+q"),
    row(S, "ADC A,r", "4", "1", "88+r"),
    row(S, "ADC A,n", "7", "2", "CE n"),
    row(S, "ADC A,(HL)", "7", "2", "8E"),
    row(S, "ADC A,(IX+o)", "19", "5", "DD 8E o"),
    row(S, "ADC A,(IY+o)", "19", "5", "FD 8E o"),
    row(S, "ADC A,p", "8", "2", "DD 88+p"),
    row(S, "ADC A,q", "8", "2", "FD 88+q"),
    row(S, "SUB r", "4", "1", "90+r"),
    row(S, "SUB n", "7", "2", "D6 n"),
    row(S, "SUB (HL)", "7", "2", "96"),
    row(S, "SUB (IX+o)", "19", "5", "DD 96 o"),
    row(S, "SUB (IY+o)", "19", "5", "FD 96 o"),
    row(S, "SUB p", "8", "2", "DD 90+p"),
    row(S, "SUB q", "8", "2", "FD 90+q"),
    row(S, "SBC A,r", "4", "1", "98+r"),
    row(S, "SBC A,n", "7", "2", "DE n"),
    row(S, "SBC A,(HL)", "7", "2", "9E"),
    row(S, "SBC A,(IX+o)", "19", "5", "DD 9E o"),
    row(S, "SBC A,(IY+o)", "19", "5", "FD 9E o"),
    row(S, "SBC A,p", "8", "2", "DD 98+p"),
    row(S, "SBC A,q", "8", "2", "FD 98+q"),
    row(S, "AND r", "4", "1", "A0+r"),
    row(S, "AND n", "7", "2", "E6 n"),
    row(S, "AND (HL)", "7", "2", "A6"),
    row(S, "AND (IX+o)", "19", "5", "DD A6 o"),
    row(S, "AND (IY+o)", "19", "5", "FD A6 o"),
    row(S, "AND p", "8", "2", "DD A0+p"),
    row(S, "AND q", "8", "2", "FD A0+q"),
    row(S, "XOR r", "4", "1", "A8+r"),
    row(S, "XOR n", "7", "2", "EE n"),
    row(S, "XOR (HL)", "7", "2", "AE"),
    row(S, "XOR (IX+o)", "19", "5", "DD AE o"),
    row(S, "XOR (IY+o)", "19", "5", "FD AE o"),
    row(S, "XOR p", "8", "2", "DD A8+p"),
    row(S, "XOR q", "8", "2", "FD A8+q"),
    row(S, "OR r", "4", "1", "B0+r"),
    row(S, "OR n", "7", "2", "F6 n"),
    row(S, "OR (HL)", "7", "2", "B6"),
    row(S, "OR (IX+o)", "19", "5", "DD B6 o"),
    row(S, "OR (IY+o)", "19", "5", "FD B6 o"),
    row(S, "OR p", "8", "2", "DD B0+p"),
    row(S, "OR q", "8", "2", "FD B0+q"),
    row(S, "CP r", "4", "1", "B8+r"),
    row(S, "CP n", "7", "2", "FE n"),
    row(S, "CP (HL)", "7", "2", "BE"),
    row(S, "CP (IX+o)", "19", "5", "DD BE o"),
    row(S, "CP (IY+o)", "19", "5", "FD BE o"),
    row(S, "CP p", "8", "2", "DD B8+p"),
    row(S, "CP q", "8", "2", "FD B8+q"),
    row(S, "INC r", "4", "1", "04+8*r"),
    row(S, "INC (HL)", "11", "3", "34"),
    row(S, "INC (IX+o)", "23", "6", "DD 34 o"),
    row(S, "INC (IY+o)", "23", "6", "FD 34 o"),
    row(S, "INC p", "8", "2", "DD 04+8*p"),
    row(S, "INC q", "8", "2", "FD 04+8*q"),
    row(S, "DEC r", "4", "1", "05+8*r"),
    row(S, "DEC (HL)", "11", "3", "35"),
    row(S, "DEC (IX+o)", "23", "6", "DD 35 o"),
    row(S, "DEC (IY+o)", "23", "6", "FD 35 o"),
    row(S, "DEC p", "8", "2", "DD 05+8*p"),
    row(S, "DEC q", "8", "2", "FD 05+8*q"),
    // General purpose and CPU control
    row(S, "DAA", "4", "1", "27"),
    row(S, "CPL", "4", "1", "2F"),
    row(S, "NEG", "8", "2", "ED 44"),
    row(S, "CCF", "4", "1", "3F"),
    row(S, "SCF", "4", "1", "37"),
    row(S, "NOP", "4", "1", "00"),
    row(S, "HALT", "4", "1", "76"),
    row(S, "DI", "4", "1", "F3"),
    row(S, "EI", "4", "1", "FB"),
    row(S, "IM 0", "8", "2", "ED 46"),
    row(S, "IM 1", "8", "2", "ED 56"),
    row(S, "IM 2", "8", "2", "ED 5E"),
    // 16-bit arithmetic
    row(S, "ADD HL,BC", "11", "3", "09"),
    row(S, "ADD HL,DE", "11", "3", "19"),
    row(S, "ADD HL,HL", "11", "3", "29"),
    row(S, "ADD HL,SP", "11", "3", "39"),
    row(S, "ADC HL,BC", "15", "4", "ED 4A"),
    row(S, "ADC HL,DE", "15", "4", "ED 5A"),
    row(S, "ADC HL,HL", "15", "4", "ED 6A"),
    row(S, "ADC HL,SP", "15", "4", "ED 7A"),
    row(S, "SBC HL,BC", "15", "4", "ED 42"),
    row(S, "SBC HL,DE", "15", "4", "ED 52"),
    row(S, "SBC HL,HL", "15", "4", "ED 62"),
    row(S, "SBC HL,SP", "15", "4", "ED 72"),
    row(S, "ADD IX,BC", "15", "4", "DD 09"),
    row(S, "ADD IX,DE", "15", "4", "DD 19"),
    row(S, "ADD IX,IX", "15", "4", "DD 29"),
    row(S, "ADD IX,SP", "15", "4", "DD 39"),
    row(S, "ADD IY,BC", "15", "4", "FD 09"),
    row(S, "ADD IY,DE", "15", "4", "FD 19"),
    row(S, "ADD IY,IY", "15", "4", "FD 29"),
    row(S, "ADD IY,SP", "15", "4", "FD 39"),
    row(S, "INC BC", "6", "2", "03"),
    row(S, "INC DE", "6", "2", "13"),
    row(S, "INC HL", "6", "2", "23"),
    row(S, "INC SP", "6", "2", "33"),
    row(S, "INC IX", "10", "3", "DD 23"),
    row(S, "INC IY", "10", "3", "FD 23"),
    row(S, "DEC BC", "6", "2", "0B"),
    row(S, "DEC DE", "6", "2", "1B"),
    row(S, "DEC HL", "6", "2", "2B"),
    row(S, "DEC SP", "6", "2", "3B"),
    row(S, "DEC IX", "10", "3", "DD 2B"),
    row(S, "DEC IY", "10", "3", "FD 2B"),
    // Rotate and shift
    row(S, "RLCA", "4", "1", "07"),
    row(S, "RLA", "4", "1", "17"),
    row(S, "RRCA", "4", "1", "0F"),
    row(S, "RRA", "4", "1", "1F"),
    row(S, "RLC r", "8", "2", "CB 00+r"),
    row(S, "RLC (HL)", "15", "4", "CB 06"),
    row(S, "RLC (IX+o)", "23", "7", "DD CB o 06"),
    row(S, "RLC (IY+o)", "23", "7", "FD CB o 06"),
    row(S, "RRC r", "8", "2", "CB 08+r"),
    row(S, "RRC (HL)", "15", "4", "CB 0E"),
    row(S, "RRC (IX+o)", "23", "7", "DD CB o 0E"),
    row(S, "RRC (IY+o)", "23", "7", "FD CB o 0E"),
    row(S, "RL r", "8", "2", "CB 10+r"),
    row(S, "RL (HL)", "15", "4", "CB 16"),
    row(S, "RL (IX+o)", "23", "7", "DD CB o 16"),
    row(S, "RL (IY+o)", "23", "7", "FD CB o 16"),
    row(S, "RR r", "8", "2", "CB 18+r"),
    row(S, "RR (HL)", "15", "4", "CB 1E"),
    row(S, "RR (IX+o)", "23", "7", "DD CB o 1E"),
    row(S, "RR (IY+o)", "23", "7", "FD CB o 1E"),
    row(S, "SLA r", "8", "2", "CB 20+r"),
    row(S, "SLA (HL)", "15", "4", "CB 26"),
    row(S, "SLA (IX+o)", "23", "7", "DD CB o 26"),
    row(S, "SLA (IY+o)", "23", "7", "FD CB o 26"),
    row(S, "SRA r", "8", "2", "CB 28+r"),
    row(S, "SRA (HL)", "15", "4", "CB 2E"),
    row(S, "SRA (IX+o)", "23", "7", "DD CB o 2E"),
    row(S, "SRA (IY+o)", "23", "7", "FD CB o 2E"),
    row(S, "SLL r", "8", "2", "CB 30+r"),
    row(S, "SLL (HL)", "15", "4", "CB 36"),
    row(S, "SLL (IX+o)", "23", "7", "DD CB o 36"),
    row(S, "SLL (IY+o)", "23", "7", "FD CB o 36"),
    row(S, "SRL r", "8", "2", "CB 38+r"),
    row(S, "SRL (HL)", "15", "4", "CB 3E"),
    row(S, "SRL (IX+o)", "23", "7", "DD CB o 3E"),
    row(S, "SRL (IY+o)", "23", "7", "FD CB o 3E"),
    row(S, "RLD", "18", "5", "ED 6F"),
    row(S, "RRD", "18", "5", "ED 67"),
    // Bit set, reset and test
    row(S, "BIT b,r", "8", "2", "CB 40+8*b+r"),
    row(S, "BIT b,(HL)", "12", "3", "CB 46+8*b"),
    row(S, "BIT b,(IX+o)", "20", "6", "DD CB o 46+8*b"),
    row(S, "BIT b,(IY+o)", "20", "6", "FD CB o 46+8*b"),
    row(S, "SET b,r", "8", "2", "CB C0+8*b+r"),
    row(S, "SET b,(HL)", "15", "4", "CB C6+8*b"),
    row(S, "SET b,(IX+o)", "23", "7", "DD CB o C6+8*b"),
    row(S, "SET b,(IY+o)", "23", "7", "FD CB o C6+8*b"),
    row(S, "RES b,r", "8", "2", "CB 80+8*b+r"),
    row(S, "RES b,(HL)", "15", "4", "CB 86+8*b"),
    row(S, "RES b,(IX+o)", "23", "7", "DD CB o 86+8*b"),
    row(S, "RES b,(IY+o)", "23", "7", "FD CB o 86+8*b"),
    // Jump
    row(S, "JP nn", "10", "3", "C3 n n"),
    row(S, "JP NZ,nn", "10", "3", "C2 n n"),
    row(S, "JP Z,nn", "10", "3", "CA n n"),
    row(S, "JP NC,nn", "10", "3", "D2 n n"),
    row(S, "JP C,nn", "10", "3", "DA n n"),
    row(S, "JP PO,nn", "10", "3", "E2 n n"),
    row(S, "JP PE,nn", "10", "3", "EA n n"),
    row(S, "JP P,nn", "10", "3", "F2 n n"),
    row(S, "JP M,nn", "10", "3", "FA n n"),
    row(S, "JP (HL)", "4", "1", "E9"),
    row(S, "JP (IX)", "8", "2", "DD E9"),
    row(S, "JP (IY)", "8", "2", "FD E9"),
    row(S, "JR e", "12", "3", "18 e"),
    row(S, "JR NZ,e", "12/7", "3/2", "20 e"),
    row(S, "JR Z,e", "12/7", "3/2", "28 e"),
    row(S, "JR NC,e", "12/7", "3/2", "30 e"),
    row(S, "JR C,e", "12/7", "3/2", "38 e"),
    row(S, "DJNZ e", "13/8", "4/3", "10 e"),
    // Call and return
    row(S, "CALL nn", "17", "5", "CD n n"),
    row(S, "CALL NZ,nn", "17/10", "5/3", "C4 n n"),
    row(S, "CALL Z,nn", "17/10", "5/3", "CC n n"),
    row(S, "CALL NC,nn", "17/10", "5/3", "D4 n n"),
    row(S, "CALL C,nn", "17/10", "5/3", "DC n n"),
    row(S, "CALL PO,nn", "17/10", "5/3", "E4 n n"),
    row(S, "CALL PE,nn", "17/10", "5/3", "EC n n"),
    row(S, "CALL P,nn", "17/10", "5/3", "F4 n n"),
    row(S, "CALL M,nn", "17/10", "5/3", "FC n n"),
    row(S, "RET", "10", "3", "C9"),
    row(S, "RET NZ", "11/5", "4/2", "C0"),
    row(S, "RET Z", "11/5", "4/2", "C8"),
    row(S, "RET NC", "11/5", "4/2", "D0"),
    row(S, "RET C", "11/5", "4/2", "D8"),
    row(S, "RET PO", "11/5", "4/2", "E0"),
    row(S, "RET PE", "11/5", "4/2", "E8"),
    row(S, "RET P", "11/5", "4/2", "F0"),
    row(S, "RET M", "11/5", "4/2", "F8"),
    row(S, "RETI", "14", "4", "ED 4D"),
    row(S, "RETN", "14", "4", "ED 45"),
    row(S, "RST 00H", "11", "4", "C7"),
    row(S, "RST 08H", "11", "4", "CF"),
    row(S, "RST 10H", "11", "4", "D7"),
    row(S, "RST 18H", "11", "4", "DF"),
    row(S, "RST 20H", "11", "4", "E7"),
    row(S, "RST 28H", "11", "4", "EF"),
    row(S, "RST 30H", "11", "4", "F7"),
    row(S, "RST 38H", "11", "4", "FF"),
    // Input and output
    row(S, "IN A,(n)", "11", "3", "DB n"),
    row(S, "IN (C)", "12", "4", "ED 70"),
    row(S, "IN F,(C)", "12", "4", "ED 70"),
    row(S, "IN r,(C)", "12", "4", "ED 40+8*r"),
    row(S, "INI", "16", "5", "ED A2"),
    row(S, "INIR", "21/16", "6/5", "ED B2"),
    row(S, "IND", "16", "5", "ED AA"),
    row(S, "INDR", "21/16", "6/5", "ED BA"),
    row(S, "OUT (n),A", "11", "3", "D3 n"),
    row(S, "OUT (C),r", "12", "4", "ED 41+8*r"),
    row(S, "OUT (C),0", "12", "4", "ED 71"),
    row(S, "OUTI", "16", "5", "ED A3"),
    row(S, "OTIR", "21/16", "6/5", "ED B3"),
    row(S, "OUTD", "16", "5", "ED AB"),
    row(S, "OTDR", "21/16", "6/5", "ED BB"),
    // ZX Spectrum Next (Z80N) extensions
    row(N, "LDIX", "16", "-", "ED A4"),
    row(N, "LDWS", "14", "-", "ED A5"),
    row(N, "LDIRX", "21/16", "-", "ED B4"),
    row(N, "LDDX", "16", "-", "ED AC"),
    row(N, "LDDRX", "21/16", "-", "ED BC"),
    row(N, "LDPIRX", "21/16", "-", "ED B7"),
    row(N, "OUTINB", "16", "-", "ED 90"),
    row(N, "MUL D,E", "8", "-", "ED 30"),
    row(N, "SWAPNIB", "8", "-", "ED 23"),
    row(N, "MIRROR A", "8", "-", "ED 24"),
    row(N, "NEXTREG n,n", "20", "-", "ED 91 n n"),
    row(N, "NEXTREG n,A", "17", "-", "ED 92 n"),
    row(N, "PIXELDN", "8", "-", "ED 93"),
    row(N, "PIXELAD", "8", "-", "ED 94"),
    row(N, "SETAE", "8", "-", "ED 95"),
    row(N, "TEST n", "11", "-", "ED 27 n"),
    row(N, "BSLA DE,B", "8", "-", "ED 28"),
    row(N, "BSRA DE,B", "8", "-", "ED 29"),
    row(N, "BSRL DE,B", "8", "-", "ED 2A"),
    row(N, "BSRF DE,B", "8", "-", "ED 2B"),
    row(N, "BRLC DE,B", "8", "-", "ED 2C"),
    row(N, "ADD HL,A", "8", "-", "ED 31"),
    row(N, "ADD DE,A", "8", "-", "ED 32"),
    row(N, "ADD BC,A", "8", "-", "ED 33"),
    row(N, "ADD HL,nn", "16", "-", "ED 34 n n"),
    row(N, "ADD DE,nn", "16", "-", "ED 35 n n"),
    row(N, "ADD BC,nn", "16", "-", "ED 36 n n"),
    row(N, "PUSH nn", "23", "-", "ED 8A n n"),
    row(N, "JP (C)", "13", "-", "ED 98"),
];
