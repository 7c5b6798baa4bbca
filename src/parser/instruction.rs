// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::sync::Arc;

use crate::core::meterable::Meterable;
use crate::z80::{score_instruction, Instruction};

use super::{Meter, Statement};

impl Meter {
    /// Best-scoring instruction for a statement. An exact match ends the
    /// search; among partial matches the first highest score wins.
    pub(crate) fn find_instruction(&self, statement: &Statement<'_>) -> Option<(&Arc<Instruction>, f64)> {
        let candidates = self.instructions.get(statement.mnemonic)?;
        let mut best: Option<(&Arc<Instruction>, f64)> = None;
        for candidate in candidates {
            let score = score_instruction(
                statement.mnemonic,
                &statement.operands,
                candidate,
                self.score_options,
            );
            if score >= 1.0 {
                return Some((candidate, score));
            }
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => score > 0.0,
            };
            if better {
                best = Some((candidate, score));
            }
        }
        best
    }

    pub(super) fn parse_canonical(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let (instruction, _) = self.find_instruction(statement)?;
        Some(Meterable::Instruction(Arc::clone(instruction)))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::{Config, Syntax};
    use crate::core::timing::Timing;
    use crate::parser::{Meter, Statement};
    use crate::z80::{OpcodeTable, PARTIAL_MATCH};

    fn find(meter: &Meter, text: &str) -> Option<(String, f64)> {
        let statement = Statement::new(text);
        meter
            .find_instruction(&statement)
            .map(|(ins, score)| (ins.text(), score))
    }

    #[test]
    fn loads_immediate_into_accumulator() {
        let meter = Meter::default();
        let m = meter.parse_instruction("LD A,5").expect("recognized");
        assert_eq!(m.size(), 2);
        assert_eq!(m.bytes(), vec!["3E", "n"]);
        assert_eq!(m.timings().z80, Timing::single(7));
        assert_eq!(m.timings().cpc, Timing::single(2));
    }

    #[test]
    fn expanded_register_form_matches_exactly() {
        let meter = Meter::default();
        assert_eq!(find(&meter, "RLC B"), Some(("RLC B".to_string(), 1.0)));
        let m = meter.parse_instruction("rlc b").expect("recognized");
        assert_eq!(m.bytes(), vec!["CB", "00"]);
    }

    #[test]
    fn every_concrete_instruction_finds_itself() {
        let meter = Meter::new(Config::default().with_platform(crate::core::config::Platform::ZxNext));
        for ins in OpcodeTable::standard().instructions() {
            let text = ins.text();
            if text.bytes().any(|c| c.is_ascii_lowercase()) {
                continue;
            }
            assert_eq!(find(&meter, &text), Some((text.clone(), 1.0)), "{text}");
        }
    }

    #[test]
    fn symbolic_bit_index_leaves_its_byte_unknown() {
        let meter = Meter::default();
        assert_eq!(find(&meter, "BIT FLAG,B"), Some(("BIT b,B".to_string(), PARTIAL_MATCH)));
        let m = meter.parse_instruction("bit flag,b").expect("recognized");
        assert_eq!(m.bytes(), vec!["CB", "n"]);
        assert_eq!(m.timings().z80, Timing::single(8));
        let m = meter.parse_instruction("set ready,(ix+2)").expect("recognized");
        assert_eq!(m.bytes(), vec!["DD", "CB", "o", "n"]);
        let m = meter.parse_instruction("BIT 3,B").expect("recognized");
        assert_eq!(m.bytes(), vec!["CB", "58"]);
        assert_eq!(find(&meter, "BIT 3,REG"), Some(("BIT 3,r".to_string(), PARTIAL_MATCH)));
    }

    #[test]
    fn table_order_breaks_ties() {
        let meter = Meter::default();
        assert_eq!(find(&meter, "IN (C)"), Some(("IN (C)".to_string(), 1.0)));
        assert_eq!(find(&meter, "IN F,(C)"), Some(("IN F,(C)".to_string(), 1.0)));
        assert_eq!(find(&meter, "IN B,(C)"), Some(("IN B,(C)".to_string(), 1.0)));
        assert_eq!(find(&meter, "IN A,(PORT)"), Some(("IN A,(n)".to_string(), PARTIAL_MATCH)));
    }

    #[test]
    fn distinguishes_immediate_from_indirect() {
        let meter = Meter::default();
        assert_eq!(find(&meter, "LD HL,LABEL").map(|(t, _)| t), Some("LD HL,nn".to_string()));
        assert_eq!(find(&meter, "LD HL,(LABEL)").map(|(t, _)| t), Some("LD HL,(nn)".to_string()));
        assert_eq!(find(&meter, "LD A,(IX+3)").map(|(t, _)| t), Some("LD A,(IX+o)".to_string()));
        assert_eq!(find(&meter, "JP (HL)").map(|(t, _)| t), Some("JP (HL)".to_string()));
        assert_eq!(find(&meter, "LD A,IXH").map(|(t, _)| t), Some("LD A,IXH".to_string()));
        assert_eq!(find(&meter, "LD XL,B").map(|(t, _)| t), Some("LD IXL,B".to_string()));
    }

    #[test]
    fn accepts_accumulator_shorthands() {
        let meter = Meter::default();
        assert_eq!(find(&meter, "ADD B").map(|(t, _)| t), Some("ADD A,B".to_string()));
        assert_eq!(find(&meter, "AND A,C").map(|(t, _)| t), Some("AND C".to_string()));
    }

    #[test]
    fn brackets_follow_dialect() {
        let default = Meter::default();
        assert!(default.parse_instruction("LD A,[HL]").is_some());
        let glass = Meter::new(Config::default().with_syntax(Syntax::Glass));
        assert!(glass.find_instruction(&Statement::new("LD A,[HL]")).is_none());
    }

    #[test]
    fn rejects_nonsense() {
        let meter = Meter::default();
        assert!(find(&meter, "LD").is_none());
        assert!(find(&meter, "LD A,B,C").is_none());
        assert!(find(&meter, "JP Q,LOOP").is_none());
        assert!(find(&meter, "XYZZY").is_none());
        assert!(meter.parse_instruction("").is_none());
    }
}
