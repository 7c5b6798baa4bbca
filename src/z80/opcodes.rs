// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction templates and their expansion into concrete instructions.
//!
//! A template whose opcode carries an addend marker (`CB 00+r`,
//! `CB 40+8*b+r`, `DD 80+p`, ...) stands for a family of instructions that
//! differ in one or more operands. Expansion substitutes each enumerated
//! operand name into the instruction text and computes the opcode byte as
//! `base + factor * addend` for every axis. Timing and size are never
//! touched by expansion.
//!
//! Families with a bit axis also keep their partially substituted forms:
//! the bit left symbolic (`BIT b,B`) and, when combined with a register,
//! the register left symbolic (`BIT 3,r`). Their parametrized byte is
//! unknown. A bit index given as a symbol then matches the symbolic form
//! instead of an arbitrary concrete one.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use crate::core::meterable::UNKNOWN_BYTE;
use crate::core::timing::{Timing, Timings};
use crate::core::text_utils::{split_mnemonic, split_operands};

use super::table::{TemplateRow, OPCODE_TABLE};
use super::{is_condition, InstructionSet};

/// Enumerable operand axis of a parametrized template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// General 8-bit register.
    R,
    /// Second general 8-bit register (`LD r,r'`).
    RPrime,
    /// IX high/low half.
    P,
    /// IY high/low half.
    Q,
    /// Bit index.
    Bit,
}

const REGISTERS: &[(&str, u8)] = &[
    ("B", 0),
    ("C", 1),
    ("D", 2),
    ("E", 3),
    ("H", 4),
    ("L", 5),
    ("A", 7),
];
const REGISTERS_IX: &[(&str, u8)] = &[
    ("B", 0),
    ("C", 1),
    ("D", 2),
    ("E", 3),
    ("IXH", 4),
    ("IXL", 5),
    ("A", 7),
];
const REGISTERS_IY: &[(&str, u8)] = &[
    ("B", 0),
    ("C", 1),
    ("D", 2),
    ("E", 3),
    ("IYH", 4),
    ("IYL", 5),
    ("A", 7),
];
const IX_HALVES: &[(&str, u8)] = &[("IXH", 4), ("IXL", 5)];
const IY_HALVES: &[(&str, u8)] = &[("IYH", 4), ("IYL", 5)];
const BITS: &[(&str, u8)] = &[
    ("0", 0),
    ("1", 1),
    ("2", 2),
    ("3", 3),
    ("4", 4),
    ("5", 5),
    ("6", 6),
    ("7", 7),
];

impl Axis {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "r" => Some(Axis::R),
            "r'" => Some(Axis::RPrime),
            "p" => Some(Axis::P),
            "q" => Some(Axis::Q),
            "b" => Some(Axis::Bit),
            _ => None,
        }
    }

    /// Placeholder text standing for this axis in the instruction text.
    pub fn placeholder(self) -> &'static str {
        match self {
            Axis::R => "r",
            Axis::RPrime => "r'",
            Axis::P => "p",
            Axis::Q => "q",
            Axis::Bit => "b",
        }
    }

    /// Operand names and addends enumerated by this axis.
    ///
    /// Under an index prefix (with no `(IX+o)` operand) the H and L slots
    /// address the index register halves instead.
    pub fn values(self, index: Option<IndexPrefix>) -> &'static [(&'static str, u8)] {
        match (self, index) {
            (Axis::R | Axis::RPrime, None) => REGISTERS,
            (Axis::R | Axis::RPrime, Some(IndexPrefix::Ix)) => REGISTERS_IX,
            (Axis::R | Axis::RPrime, Some(IndexPrefix::Iy)) => REGISTERS_IY,
            (Axis::P, _) => IX_HALVES,
            (Axis::Q, _) => IY_HALVES,
            (Axis::Bit, _) => BITS,
        }
    }
}

/// Index prefix under which plain H/L register slots mean index halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexPrefix {
    Ix,
    Iy,
}

/// One `factor*axis` term of an addend marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term {
    pub factor: u8,
    pub axis: Axis,
}

/// One opcode byte of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpcodeToken {
    /// Literal hex byte or operand placeholder (`n`, `o`, `e`).
    Fixed(String),
    /// `base + Σ factor * addend`.
    Parametrized { base: u8, terms: Vec<Term> },
}

impl OpcodeToken {
    fn parse(text: &str) -> Option<Self> {
        let Some((base, rest)) = text.split_once('+') else {
            return Some(OpcodeToken::Fixed(text.to_string()));
        };
        let base = u8::from_str_radix(base, 16).ok()?;
        let mut terms = Vec::new();
        for term in rest.split('+') {
            let (factor, axis) = match term.split_once('*') {
                Some((factor, axis)) => (factor.parse::<u8>().ok()?, axis),
                None => (1, term),
            };
            terms.push(Term {
                factor,
                axis: Axis::parse(axis)?,
            });
        }
        Some(OpcodeToken::Parametrized { base, terms })
    }
}

/// A table row parsed into its parts; may still describe a family.
#[derive(Clone, Debug)]
pub struct InstructionTemplate {
    pub set: InstructionSet,
    pub mnemonic: String,
    pub operands: Vec<String>,
    pub timings: Timings,
    pub opcode: Vec<OpcodeToken>,
    pub size: usize,
}

impl InstructionTemplate {
    /// Parse a raw table row. Returns `None` for a malformed row.
    pub fn from_row(row: &TemplateRow) -> Option<Self> {
        let (mnemonic, operands) = split_mnemonic(row.instruction);
        let opcode = row
            .opcode
            .split_whitespace()
            .map(OpcodeToken::parse)
            .collect::<Option<Vec<_>>>()?;
        let z80 = Timing::parse(row.z80)?;
        let cpc = Timing::parse(row.cpc)?;
        let m1 = Timing::single(m1_cycles(row.opcode));
        let msx = if row.set == InstructionSet::Z80 {
            z80 + m1
        } else {
            Timing::ZERO
        };
        Some(Self {
            set: row.set,
            mnemonic: mnemonic.to_string(),
            operands: split_operands(operands),
            timings: Timings::new(z80, msx, cpc),
            size: opcode.len(),
            opcode,
        })
    }

    fn parametrized(&self) -> Option<(u8, &[Term])> {
        self.opcode.iter().find_map(|token| match token {
            OpcodeToken::Parametrized { base, terms } => Some((*base, terms.as_slice())),
            OpcodeToken::Fixed(_) => None,
        })
    }

    /// Opcode bytes with the parametrized token replaced by `byte`, or by
    /// the unknown-byte placeholder.
    fn render_opcode(&self, byte: Option<u8>) -> Vec<String> {
        self.opcode
            .iter()
            .map(|token| match (token, byte) {
                (OpcodeToken::Fixed(text), _) => text.clone(),
                (OpcodeToken::Parametrized { .. }, Some(byte)) => format!("{byte:02X}"),
                (OpcodeToken::Parametrized { .. }, None) => UNKNOWN_BYTE.to_string(),
            })
            .collect()
    }

    fn index_prefix(&self) -> Option<IndexPrefix> {
        let prefix = match self.opcode.first() {
            Some(OpcodeToken::Fixed(byte)) if byte == "DD" => IndexPrefix::Ix,
            Some(OpcodeToken::Fixed(byte)) if byte == "FD" => IndexPrefix::Iy,
            _ => return None,
        };
        let displaced = self
            .operands
            .iter()
            .any(|op| op.contains("IX+o") || op.contains("IY+o"));
        (!displaced).then_some(prefix)
    }

    /// Expand into concrete instructions. A template without an addend
    /// marker yields itself.
    ///
    /// Forms with a symbolic bit come first, so that among equal scores
    /// they win over the concrete variants.
    pub fn expand(&self) -> Vec<Instruction> {
        let Some((base, terms)) = self.parametrized() else {
            let opcode = self.render_opcode(None);
            return vec![Instruction::new(self, self.operands.clone(), opcode)];
        };

        let index = self.index_prefix();
        let (bits, others): (Vec<Term>, Vec<Term>) =
            terms.iter().copied().partition(|term| term.axis == Axis::Bit);
        let mut out = Vec::new();

        if !bits.is_empty() {
            self.expand_partial(&others, index, &mut out);
        }
        let mut operands = self.operands.clone();
        self.expand_terms(terms, index, 0, &mut operands, &mut |operands, addend| {
            let Some(byte) = base.checked_add(addend) else {
                tracing::warn!(template = %self.mnemonic, "opcode addend overflows a byte");
                return;
            };
            out.push(Instruction::new(self, operands.to_vec(), self.render_opcode(Some(byte))));
        });
        if !bits.is_empty() && !others.is_empty() {
            self.expand_partial(&bits, index, &mut out);
        }
        out
    }

    /// Substitute only `terms`, leaving the other axes symbolic.
    fn expand_partial(&self, terms: &[Term], index: Option<IndexPrefix>, out: &mut Vec<Instruction>) {
        let mut operands = self.operands.clone();
        self.expand_terms(terms, index, 0, &mut operands, &mut |operands, _| {
            out.push(Instruction::new(self, operands.to_vec(), self.render_opcode(None)));
        });
    }

    fn expand_terms(
        &self,
        terms: &[Term],
        index: Option<IndexPrefix>,
        addend: u8,
        operands: &mut Vec<String>,
        emit: &mut dyn FnMut(&[String], u8),
    ) {
        let Some((term, rest)) = terms.split_first() else {
            emit(operands, addend);
            return;
        };
        let placeholder = term.axis.placeholder();
        for &(name, value) in term.axis.values(index) {
            let saved = operands.clone();
            for operand in operands.iter_mut() {
                if operand == placeholder {
                    *operand = name.to_string();
                }
            }
            let addend = addend.wrapping_add(term.factor.wrapping_mul(value));
            self.expand_terms(rest, index, addend, operands, emit);
            *operands = saved;
        }
    }
}

/// Number of M1 (opcode fetch) cycles, from the prefix bytes.
fn m1_cycles(opcode: &str) -> i32 {
    match opcode.split_whitespace().next() {
        Some("CB" | "ED" | "DD" | "FD") => 2,
        _ => 1,
    }
}

/// Control transfer shape of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowKind {
    Jump,
    Call,
    Ret,
}

impl FlowKind {
    fn of(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "JP" | "JR" | "DJNZ" => Some(FlowKind::Jump),
            "CALL" | "RST" => Some(FlowKind::Call),
            "RET" | "RETI" | "RETN" => Some(FlowKind::Ret),
            _ => None,
        }
    }
}

/// A concrete instruction produced by template expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub set: InstructionSet,
    pub mnemonic: String,
    pub operands: Vec<String>,
    pub timings: Timings,
    pub opcode: Vec<String>,
    pub size: usize,
    pub flow: Option<FlowKind>,
    pub conditional: bool,
}

impl Instruction {
    fn new(template: &InstructionTemplate, operands: Vec<String>, opcode: Vec<String>) -> Self {
        let flow = FlowKind::of(&template.mnemonic);
        let condition_operand = flow.is_some()
            && operands
                .first()
                .is_some_and(|op| is_condition(op) && (operands.len() == 2 || template.mnemonic == "RET"));
        Self {
            set: template.set,
            mnemonic: template.mnemonic.clone(),
            conditional: condition_operand || template.timings.is_conditional(),
            operands,
            timings: template.timings,
            opcode,
            size: template.size,
            flow,
        }
    }

    /// Mnemonic and operands, as listed in the table (`LD A,n`).
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            self.mnemonic.clone()
        } else {
            format!("{} {}", self.mnemonic, self.operands.join(","))
        }
    }

    /// Opcode value for single-byte instructions.
    pub fn single_byte_opcode(&self) -> Option<u8> {
        match self.opcode.as_slice() {
            [byte] => u8::from_str_radix(byte, 16).ok(),
            _ => None,
        }
    }
}

/// The fully expanded instruction table.
#[derive(Debug)]
pub struct OpcodeTable {
    instructions: Vec<Arc<Instruction>>,
    by_mnemonic: HashMap<String, Vec<Arc<Instruction>>>,
    by_opcode: HashMap<u8, Arc<Instruction>>,
}

impl OpcodeTable {
    /// Expand every row. Duplicate instruction texts keep the first entry.
    pub fn load(rows: &[TemplateRow]) -> Self {
        let mut instructions = Vec::new();
        let mut by_mnemonic: HashMap<String, Vec<Arc<Instruction>>> = HashMap::new();
        let mut by_opcode = HashMap::new();
        let mut seen = HashSet::new();

        for row in rows {
            let Some(template) = InstructionTemplate::from_row(row) else {
                tracing::warn!(instruction = row.instruction, "skipping malformed table row");
                continue;
            };
            for instruction in template.expand() {
                if !seen.insert((instruction.set, instruction.text())) {
                    continue;
                }
                let instruction = Arc::new(instruction);
                if instruction.set == InstructionSet::Z80 {
                    if let Some(byte) = instruction.single_byte_opcode() {
                        by_opcode.entry(byte).or_insert_with(|| Arc::clone(&instruction));
                    }
                }
                by_mnemonic
                    .entry(instruction.mnemonic.clone())
                    .or_default()
                    .push(Arc::clone(&instruction));
                instructions.push(instruction);
            }
        }

        tracing::debug!(
            rows = rows.len(),
            instructions = instructions.len(),
            "opcode table expanded"
        );
        Self {
            instructions,
            by_mnemonic,
            by_opcode,
        }
    }

    /// The built-in table, expanded once per process.
    pub fn standard() -> &'static OpcodeTable {
        static TABLE: OnceLock<OpcodeTable> = OnceLock::new();
        TABLE.get_or_init(|| OpcodeTable::load(OPCODE_TABLE))
    }

    pub fn instructions(&self) -> &[Arc<Instruction>] {
        &self.instructions
    }

    /// Every instruction sharing a mnemonic, in table order.
    pub fn candidates(&self, mnemonic: &str) -> &[Arc<Instruction>] {
        self.by_mnemonic
            .get(mnemonic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The single-byte base instruction with the given opcode value.
    pub fn by_opcode(&self, opcode: u8) -> Option<&Arc<Instruction>> {
        self.by_opcode.get(&opcode)
    }
}
