// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use crate::core::config::MacroDefinition;
use crate::core::meterable::{Collection, FixedCost, Meterable, UNKNOWN_BYTE};
use crate::core::text_utils::normalize_instruction;
use crate::core::timing::{Timing, Timings};

use super::{Meter, Statement};

impl Meter {
    /// User macros. The body is parsed without the macro parser, so a
    /// macro can never expand into itself.
    pub(super) fn parse_macro(&self, statement: &Statement<'_>) -> Option<Meterable> {
        let definition = self.macros.get(statement.mnemonic)?;
        let body = self.parse_macro_body(definition);
        if !definition.has_overrides() {
            return Some(Meterable::Collection(body));
        }
        Some(Meterable::Fixed(apply_overrides(definition, &body, statement.text)))
    }

    fn parse_macro_body(&self, definition: &MacroDefinition) -> Collection {
        let parsers = self.parsers_without_macros();
        let mut body = Collection::new();
        for line in &definition.instructions {
            match self.parse_with(&normalize_instruction(line), &parsers) {
                Some(meterable) => body.add(meterable),
                None => tracing::debug!(name = %definition.name, line = %line, "unrecognized macro line"),
            }
        }
        body
    }
}

fn apply_overrides(definition: &MacroDefinition, body: &Collection, text: &str) -> FixedCost {
    let body = Meterable::Collection(body.clone());
    let base = body.timings();
    let pick = |explicit: Option<Timing>, fallback: Timing| explicit.or(definition.ts).unwrap_or(fallback);
    let timings = Timings::new(
        pick(definition.z80, base.z80),
        pick(definition.msx, base.msx),
        pick(definition.cpc, base.cpc),
    );
    let size = definition.size.unwrap_or_else(|| body.size());
    let bytes = body.bytes();
    FixedCost {
        text: text.to_string(),
        timings,
        size,
        bytes: if bytes.len() == size && !bytes.is_empty() {
            bytes
        } else {
            vec![UNKNOWN_BYTE.to_string(); size]
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::core::config::{Config, MacroDefinition};
    use crate::core::timing::Timing;
    use crate::parser::Meter;

    fn meter_with(macros: Vec<MacroDefinition>) -> Meter {
        Meter::new(Config {
            macros,
            ..Config::default()
        })
    }

    fn body(name: &str, lines: &[&str]) -> MacroDefinition {
        MacroDefinition {
            name: name.to_string(),
            instructions: lines.iter().map(|line| line.to_string()).collect(),
            ..MacroDefinition::default()
        }
    }

    #[test]
    fn body_is_parsed_as_instructions() {
        let meter = meter_with(vec![body("CLEAR", &["xor a", "ld (hl),a", "bogus"])]);
        let m = meter.parse_instruction("clear").expect("macro");
        assert_eq!(m.bytes(), vec!["AF", "77"]);
        assert_eq!(m.timings().z80, Timing::single(11));
        assert_eq!(m.flatten().len(), 2);
    }

    #[test]
    fn overrides_replace_body_costs() {
        let mut definition = body("WAIT", &["nop", "nop"]);
        definition.z80 = Some(Timing::single(100));
        definition.ts = Some(Timing::single(50));
        let meter = meter_with(vec![definition]);
        let m = meter.parse_instruction("WAIT 3").expect("macro");
        assert!(!m.is_composed());
        assert_eq!(m.timings().z80, Timing::single(100));
        assert_eq!(m.timings().msx, Timing::single(50));
        assert_eq!(m.size(), 2);
        assert_eq!(m.bytes(), vec!["00", "00"]);
    }

    #[test]
    fn size_override_uses_unknown_bytes() {
        let definition = MacroDefinition {
            name: "BLOB".to_string(),
            size: Some(3),
            ..MacroDefinition::default()
        };
        let meter = meter_with(vec![definition]);
        let m = meter.parse_instruction("blob").expect("macro");
        assert_eq!(m.bytes(), vec!["n", "n", "n"]);
        assert_eq!(m.timings().z80, Timing::ZERO);
    }

    #[test]
    fn macros_cannot_expand_themselves() {
        let meter = meter_with(vec![body("LOOPY", &["loopy", "nop"])]);
        let m = meter.parse_instruction("LOOPY").expect("macro");
        assert_eq!(m.size(), 1);
    }
}
