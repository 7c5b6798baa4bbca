// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Data directives: byte lists, word lists and fills.

use std::sync::Arc;

use crate::core::expr::parse_value;
use crate::core::meterable::{Directive, Meterable, Repeated, UNKNOWN_BYTE};
use crate::z80::OpcodeTable;

use super::{Meter, Statement};

const BYTE_DIRECTIVES: &[&str] = &["DB", "DEFB", "DM", "DEFM", "BYTE", ".DB", ".BYTE"];
const WORD_DIRECTIVES: &[&str] = &["DW", "DEFW", "WORD", ".DW"];
const FILL_DIRECTIVES: &[&str] = &["DS", "DEFS", "BLOCK", ".DS"];

/// Largest fill the meter will expand.
const MAX_FILL: i64 = 0x10000;

pub fn is_directive(word: &str) -> bool {
    BYTE_DIRECTIVES.contains(&word)
        || WORD_DIRECTIVES.contains(&word)
        || FILL_DIRECTIVES.contains(&word)
}

fn hex_byte(value: i64) -> String {
    format!("{:02X}", value & 0xFF)
}

/// Characters of a quoted string operand.
fn string_literal(operand: &str) -> Option<&str> {
    let bytes = operand.as_bytes();
    let quote = *bytes.first()?;
    if bytes.len() < 2 || (quote != b'"' && quote != b'\'') || bytes[bytes.len() - 1] != quote {
        return None;
    }
    Some(&operand[1..operand.len() - 1])
}

fn byte_list(operands: &[String]) -> Vec<String> {
    let mut bytes = Vec::new();
    for operand in operands {
        match string_literal(operand) {
            Some(text) => bytes.extend(text.bytes().map(|b| hex_byte(b.into()))),
            None => bytes.push(match parse_value(operand) {
                Some(value) => hex_byte(value),
                None => UNKNOWN_BYTE.to_string(),
            }),
        }
    }
    bytes
}

fn word_list(operands: &[String]) -> Vec<String> {
    let mut bytes = Vec::with_capacity(operands.len() * 2);
    for operand in operands {
        match parse_value(operand) {
            Some(value) => {
                bytes.push(hex_byte(value));
                bytes.push(hex_byte(value >> 8));
            }
            None => {
                bytes.push(UNKNOWN_BYTE.to_string());
                bytes.push(UNKNOWN_BYTE.to_string());
            }
        }
    }
    bytes
}

impl Meter {
    pub(super) fn parse_directive(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let mnemonic = statement.mnemonic;
        let bytes = if BYTE_DIRECTIVES.contains(&mnemonic) {
            byte_list(&statement.operands)
        } else if WORD_DIRECTIVES.contains(&mnemonic) {
            word_list(&statement.operands)
        } else if FILL_DIRECTIVES.contains(&mnemonic) {
            return self.parse_fill(statement);
        } else {
            return None;
        };
        Some(Meterable::Directive(Directive {
            text: statement.text.to_string(),
            bytes,
        }))
    }

    /// `DS count[,fill]`. The fill byte defaults to zero; with
    /// `directives_as_instructions` a known fill becomes that many copies
    /// of the single-byte instruction it encodes. A count that is symbolic
    /// or out of range keeps the line as an empty directive.
    fn parse_fill(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let count = statement
            .operands
            .first()
            .and_then(|operand| parse_value(operand))
            .filter(|count| (0..=MAX_FILL).contains(count))
            .and_then(|count| usize::try_from(count).ok());
        let Some(count) = count else {
            tracing::debug!(text = statement.text, "fill count unknown, size left at zero");
            return Some(Meterable::Directive(Directive {
                text: statement.text.to_string(),
                bytes: Vec::new(),
            }));
        };
        let fill = match statement.operands.get(1) {
            Some(operand) => parse_value(operand),
            None => Some(0),
        };

        if self.config.directives_as_instructions && count > 0 {
            let opcode = fill.map(|value| (value & 0xFF) as u8);
            if let Some(ins) = opcode.and_then(|opcode| OpcodeTable::standard().by_opcode(opcode)) {
                return Some(Repeated::wrap(Meterable::Instruction(Arc::clone(ins)), count));
            }
        }

        let byte = fill.map_or_else(|| UNKNOWN_BYTE.to_string(), hex_byte);
        Some(Meterable::Directive(Directive {
            text: statement.text.to_string(),
            bytes: vec![byte; count],
        }))
    }
}
