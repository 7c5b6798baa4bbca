// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Zilog Z80 instruction set support.
//!
//! This module provides:
//! - The instruction template table and its expansion into concrete instructions
//! - The operand scorer used to recognize source text against the table
//! - Dialect pseudo-instructions (sjasmplus fake instructions)
//! - Register and condition name helpers

pub mod fake;
pub mod opcodes;
pub mod scorer;
pub mod table;

pub use opcodes::{FlowKind, Instruction, OpcodeTable};
pub use scorer::{score_instruction, ScoreOptions, PARTIAL_MATCH};

/// Instruction set an opcode belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionSet {
    /// Documented and undocumented Zilog Z80 instructions.
    Z80,
    /// ZX Spectrum Next extensions.
    Z80N,
}

/// Check if an identifier is a Z80 register name.
///
/// Valid 8-bit registers: A, B, C, D, E, H, L, I, R, F (only in `IN F,(C)`)
/// Valid 16-bit registers: AF, AF', BC, DE, HL, SP, IX, IY
/// Index register halves in all their spellings are registers too.
pub fn is_register(ident: &str) -> bool {
    matches!(
        ident,
        "A" | "B" | "C" | "D" | "E" | "H" | "L" | "I" | "R" | "F"
            | "AF" | "AF'" | "BC" | "DE" | "HL" | "SP" | "IX" | "IY"
    ) || index_half(ident).is_some()
}

/// Check if an identifier is a Z80 condition code.
pub fn is_condition(name: &str) -> bool {
    negate_condition(name).is_some()
}

/// Logical complement of a condition code.
pub fn negate_condition(name: &str) -> Option<&'static str> {
    match name {
        "NZ" => Some("Z"),
        "Z" => Some("NZ"),
        "NC" => Some("C"),
        "C" => Some("NC"),
        "PO" => Some("PE"),
        "PE" => Some("PO"),
        "P" => Some("M"),
        "M" => Some("P"),
        _ => None,
    }
}

/// One half of an index register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexHalf {
    IxHigh,
    IxLow,
    IyHigh,
    IyLow,
}

impl IndexHalf {
    pub fn canonical(self) -> &'static str {
        match self {
            IndexHalf::IxHigh => "IXH",
            IndexHalf::IxLow => "IXL",
            IndexHalf::IyHigh => "IYH",
            IndexHalf::IyLow => "IYL",
        }
    }
}

/// Resolve the many spellings assemblers have used for index register halves.
pub fn index_half(name: &str) -> Option<IndexHalf> {
    match name {
        "IXH" | "XH" | "HX" | "IXU" | "HIX" => Some(IndexHalf::IxHigh),
        "IXL" | "XL" | "LX" | "LIX" => Some(IndexHalf::IxLow),
        "IYH" | "YH" | "HY" | "IYU" | "HIY" => Some(IndexHalf::IyHigh),
        "IYL" | "YL" | "LY" | "LIY" => Some(IndexHalf::IyLow),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_z80_registers() {
        for name in ["A", "B", "H", "L", "I", "R", "BC", "DE", "HL", "SP", "IX", "IY", "AF", "AF'"] {
            assert!(is_register(name), "{name}");
        }
        assert!(is_register("XH"));
        assert!(is_register("LY"));

        assert!(!is_register("LD"));
        assert!(!is_register("JP"));
        assert!(!is_register("AX"));
        assert!(!is_register("NZ"));
    }

    #[test]
    fn negates_every_condition() {
        for cond in ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"] {
            let negated = negate_condition(cond).expect("condition");
            assert_ne!(negated, cond);
            assert_eq!(negate_condition(negated), Some(cond));
        }
        assert!(!is_condition("A"));
    }

    #[test]
    fn resolves_index_half_aliases() {
        assert_eq!(index_half("HX"), Some(IndexHalf::IxHigh));
        assert_eq!(index_half("IXU"), Some(IndexHalf::IxHigh));
        assert_eq!(index_half("YL"), Some(IndexHalf::IyLow));
        assert_eq!(index_half("IX"), None);
        assert_eq!(IndexHalf::IyHigh.canonical(), "IYH");
    }
}
