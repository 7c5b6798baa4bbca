// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand matching of source text against instruction templates.
//!
//! A score of 0 rejects the template, 1 is an exact match and anything in
//! between is an accepted but low-confidence match used to rank templates
//! that share a mnemonic.

use crate::core::expr::{parse_number, parse_value};
use crate::core::text_utils::strip_wrapping;

use super::opcodes::Instruction;
use super::{index_half, is_condition, is_register};

/// Score given to an operand that cannot be evaluated (a label, a constant
/// or an expression) standing in for an immediate, offset or address.
pub const PARTIAL_MATCH: f64 = 0.75;

/// Mnemonics whose single operand may be written with a redundant
/// accumulator (`SUB A,B`, `RLC A,(HL)`).
const EXPLICIT_ACCUMULATOR: &[&str] = &[
    "SUB", "AND", "XOR", "OR", "CP", "RLC", "RRC", "RL", "RR", "SLA", "SRA", "SLL", "SRL",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreOptions {
    /// Only parentheses denote indirection; `[HL]` is rejected.
    pub strict_indirection: bool,
}

/// Score source operands against a concrete instruction.
pub fn score_instruction(
    mnemonic: &str,
    operands: &[String],
    instruction: &Instruction,
    options: ScoreOptions,
) -> f64 {
    if mnemonic != instruction.mnemonic {
        return 0.0;
    }
    score_operands(mnemonic, &instruction.operands, operands, options)
}

/// Score source operands against the expected operands of a template.
pub fn score_operands(
    mnemonic: &str,
    expected: &[String],
    candidate: &[String],
    options: ScoreOptions,
) -> f64 {
    let reconciled;
    let candidate = if expected.len() == candidate.len() {
        candidate
    } else if mnemonic != "LD" && expected.len() == 2 && candidate.len() == 1 {
        reconciled = [String::from("A"), candidate[0].clone()];
        &reconciled[..]
    } else if EXPLICIT_ACCUMULATOR.contains(&mnemonic)
        && expected.len() == 1
        && candidate.len() == 2
        && candidate[0] == "A"
    {
        &candidate[1..]
    } else {
        return 0.0;
    };

    let mut score = 1.0;
    for (expected, candidate) in expected.iter().zip(candidate) {
        score *= score_operand(expected, candidate, true, options);
        if score == 0.0 {
            return 0.0;
        }
    }
    score
}

fn score_operand(expected: &str, candidate: &str, allow_indirection: bool, options: ScoreOptions) -> f64 {
    if is_verbatim(expected) {
        return exact(expected == candidate);
    }

    if allow_indirection {
        if let Some(inner) = strip_wrapping(expected, b'(', b')') {
            return match indirection(candidate, options) {
                Some(candidate) => score_operand(inner, candidate, false, options),
                None => 0.0,
            };
        }
    }

    if let Some(score) = named_shape(expected, candidate) {
        return score;
    }

    if let Some(value) = parse_number(expected) {
        if let Some(actual) = parse_value(candidate) {
            return exact(actual == value);
        }
    }

    generic(candidate, allow_indirection, options)
}

/// Register and condition names that only match themselves.
fn is_verbatim(expected: &str) -> bool {
    matches!(
        expected,
        "A" | "B" | "C" | "D" | "E" | "H" | "L" | "I" | "R" | "F"
            | "AF" | "AF'" | "BC" | "DE" | "HL" | "SP" | "IX" | "IY"
    ) || is_condition(expected)
}

fn exact(matched: bool) -> f64 {
    if matched {
        1.0
    } else {
        0.0
    }
}

/// Inner text of a source indirection.
fn indirection(candidate: &str, options: ScoreOptions) -> Option<&str> {
    strip_wrapping(candidate, b'(', b')').or_else(|| {
        if options.strict_indirection {
            None
        } else {
            strip_wrapping(candidate, b'[', b']')
        }
    })
}

fn named_shape(expected: &str, candidate: &str) -> Option<f64> {
    for register in ["IX", "IY"] {
        if expected.strip_prefix(register) == Some("+o") {
            return Some(exact(index_offset(register, candidate)));
        }
    }
    let half = index_half(expected)?;
    Some(exact(index_half(candidate) == Some(half)))
}

/// `IX`, `IX+offset` or `IX-offset`.
fn index_offset(register: &str, candidate: &str) -> bool {
    match candidate.strip_prefix(register) {
        Some("") => true,
        Some(rest) => {
            let offset = rest.strip_prefix('+').or_else(|| rest.strip_prefix('-'));
            offset.is_some_and(|offset| !offset.is_empty())
        }
        None => false,
    }
}

fn generic(candidate: &str, allow_indirection: bool, options: ScoreOptions) -> f64 {
    let bare = strip_wrapping(candidate, b'(', b')')
        .or_else(|| strip_wrapping(candidate, b'[', b']'))
        .unwrap_or(candidate);
    if bare.is_empty() || is_register(bare) {
        return 0.0;
    }
    if allow_indirection && indirection(candidate, options).is_some() {
        return 0.0;
    }
    PARTIAL_MATCH
}
