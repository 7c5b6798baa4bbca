// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Dialect pseudo-instructions: fake instructions, register lists and
//! negated conditions.

use crate::core::meterable::Meterable;
use crate::core::text_utils::normalize_instruction;
use crate::z80::fake::{rewrite_negated_condition, split_register_list, FAKE_INSTRUCTIONS};
use crate::z80::scorer::score_operands;

use super::{collect_all, LineParser, Meter, Statement};

const CANONICAL: &[LineParser] = &[LineParser::Instruction];

impl Meter {
    /// Index of the best-matching fake instruction.
    fn find_fake(&self, statement: &Statement<'_>) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (mnemonic, expected)) in self.fakes.iter().enumerate() {
            if mnemonic != statement.mnemonic {
                continue;
            }
            let score = score_operands(mnemonic, expected, &statement.operands, self.score_options);
            if score >= 1.0 {
                return Some(idx);
            }
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => score > 0.0,
            };
            if better {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub(super) fn parse_fake(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let idx = self.find_fake(statement)?;
        self.fake_cache[idx]
            .get_or_init(|| {
                let fake = &FAKE_INSTRUCTIONS[idx];
                let expanded = collect_all(fake.expansion.iter().map(|text| {
                    self.parse_with(&normalize_instruction(text), CANONICAL)
                }));
                if expanded.is_none() {
                    tracing::warn!(instruction = fake.instruction, "fake instruction expansion failed");
                }
                expanded
            })
            .clone()
    }

    pub(super) fn parse_register_list(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let parts = split_register_list(statement.mnemonic, &statement.operands)?;
        collect_all(parts.iter().map(|text| self.parse_with(text, CANONICAL)))
    }

    pub(super) fn parse_negated_condition(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let rewritten = rewrite_negated_condition(statement.mnemonic, &statement.operands)?;
        self.parse_with(&rewritten, CANONICAL)
    }
}
