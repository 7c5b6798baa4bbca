// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Source recognition.
//!
//! A [`Meter`] owns everything derived from one configuration snapshot:
//! the platform-filtered instruction index, the macro table and the fake
//! instruction cache. Each source statement goes through a chain of line
//! parsers; the first one that recognizes it wins.

mod directive;
mod fake;
mod instruction;
mod macros;
mod repetition;

use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::{Config, MacroDefinition};
use crate::core::hint::{HintMode, TimingHint};
use crate::core::meterable::{Collection, FixedCost, Hinted, Meterable, Repeated};
use crate::core::source::SourceLine;
use crate::core::text_utils::{normalize_instruction, split_mnemonic, split_operands};
use crate::core::total::{at_exit_total, default_total, execution_flow_total, TotalTiming};
use crate::z80::fake::FAKE_INSTRUCTIONS;
use crate::z80::{Instruction, OpcodeTable, ScoreOptions};

use self::repetition::BlockStack;

pub use self::directive::is_directive;

/// One statement split into mnemonic and operands.
#[derive(Debug, Clone)]
pub(crate) struct Statement<'a> {
    pub text: &'a str,
    pub mnemonic: &'a str,
    pub operands: Vec<String>,
}

impl<'a> Statement<'a> {
    pub fn new(text: &'a str) -> Self {
        let (mnemonic, operands) = split_mnemonic(text);
        Self {
            text,
            mnemonic,
            operands: split_operands(operands),
        }
    }
}

/// A link in the line parser chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineParser {
    Fake,
    RegisterList,
    NegatedCondition,
    Macro,
    Instruction,
    Directive,
}

/// Totals for one parsed block.
#[derive(Clone, Debug)]
pub struct Totals<'a> {
    pub default: TotalTiming<'a>,
    pub execution_flow: Option<TotalTiming<'a>>,
    pub at_exit: Option<TotalTiming<'a>>,
}

impl<'a> Totals<'a> {
    /// At-exit, else execution flow, else the plain sum.
    pub fn best(&self) -> &TotalTiming<'a> {
        self.at_exit
            .as_ref()
            .or(self.execution_flow.as_ref())
            .unwrap_or(&self.default)
    }
}

pub struct Meter {
    config: Config,
    score_options: ScoreOptions,
    parsers: Vec<LineParser>,
    instructions: HashMap<String, Vec<Arc<Instruction>>>,
    macros: HashMap<String, MacroDefinition>,
    fakes: Vec<(String, Vec<String>)>,
    fake_cache: Vec<OnceCell<Option<Meterable>>>,
}

impl Meter {
    pub fn new(config: Config) -> Self {
        let table = OpcodeTable::standard();
        let mut instructions: HashMap<String, Vec<Arc<Instruction>>> = HashMap::new();
        for ins in table.instructions() {
            if config.platform.supports(ins.set) {
                instructions
                    .entry(ins.mnemonic.clone())
                    .or_default()
                    .push(Arc::clone(ins));
            }
        }

        let macros = config
            .macros
            .iter()
            .map(|definition| (definition.name.clone(), definition.clone()))
            .collect();

        let fakes = FAKE_INSTRUCTIONS
            .iter()
            .map(|fake| {
                let (mnemonic, operands) = split_mnemonic(fake.instruction);
                (mnemonic.to_string(), split_operands(operands))
            })
            .collect();
        let fake_cache = FAKE_INSTRUCTIONS.iter().map(|_| OnceCell::new()).collect();

        let features = &config.features;
        let mut parsers = Vec::new();
        if features.fake_instructions {
            parsers.push(LineParser::Fake);
        }
        if features.register_lists {
            parsers.push(LineParser::RegisterList);
        }
        if features.negative_conditions {
            parsers.push(LineParser::NegatedCondition);
        }
        parsers.extend([LineParser::Macro, LineParser::Instruction, LineParser::Directive]);

        tracing::debug!(
            platform = config.platform.as_str(),
            syntax = config.syntax.as_str(),
            mnemonics = instructions.len(),
            macros = config.macros.len(),
            parsers = ?parsers,
            "meter engine built"
        );

        Self {
            score_options: ScoreOptions {
                strict_indirection: !features.bracket_indirection,
            },
            config,
            parsers,
            instructions,
            macros,
            fakes,
            fake_cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recognize one instruction, pseudo-instruction, macro or directive.
    pub fn parse_instruction(&self, text: &str) -> Option<Meterable> {
        let text = normalize_instruction(text);
        self.parse_with(&text, &self.parsers)
    }

    /// Run `text` (already normalized) through the given parser chain.
    pub(crate) fn parse_with(&self, text: &str, parsers: &[LineParser]) -> Option<Meterable> {
        if text.is_empty() {
            return None;
        }
        let statement = Statement::new(text);
        let parsed = parsers.iter().find_map(|parser| match parser {
            LineParser::Fake => self.parse_fake(&statement),
            LineParser::RegisterList => self.parse_register_list(&statement),
            LineParser::NegatedCondition => self.parse_negated_condition(&statement),
            LineParser::Macro => self.parse_macro(&statement),
            LineParser::Instruction => self.parse_canonical(&statement),
            LineParser::Directive => self.parse_directive(&statement),
        });
        match &parsed {
            Some(meterable) => tracing::trace!(text, size = meterable.size(), "recognized"),
            None => tracing::trace!(text, "no match"),
        }
        parsed
    }

    /// Parser chain without the macro parser, for macro bodies.
    pub(crate) fn parsers_without_macros(&self) -> Vec<LineParser> {
        self.parsers
            .iter()
            .copied()
            .filter(|parser| *parser != LineParser::Macro)
            .collect()
    }

    /// Split raw text with this engine's dialect and keyword knowledge.
    pub fn split_text(&self, text: &str) -> Vec<SourceLine> {
        SourceLine::split_text(text, &self.config.features, &|word| self.is_keyword(word))
    }

    fn is_keyword(&self, word: &str) -> bool {
        let (begin, end) = self.config.syntax.repetition_markers();
        self.instructions.contains_key(word)
            || self.macros.contains_key(word)
            || self.fakes.iter().any(|(mnemonic, _)| mnemonic == word)
            || is_directive(word)
            || begin.contains(&word)
            || end.contains(&word)
    }

    /// Parse raw editor text.
    pub fn parse_text(&self, text: &str) -> Option<Meterable> {
        self.parse_lines(&self.split_text(text))
    }

    /// Parse source lines into one meterable. A single recognized line is
    /// returned as is; several form a collection. Unrecognized lines
    /// contribute nothing.
    pub fn parse_lines(&self, lines: &[SourceLine]) -> Option<Meterable> {
        let (begin, end) = self.config.syntax.repetition_markers();
        let mut blocks = BlockStack::new();

        for line in lines {
            let (mnemonic, operands) = split_mnemonic(&line.instruction);
            if begin.contains(&mnemonic) {
                blocks.open(repetition::parse_count(operands));
                continue;
            }
            if end.contains(&mnemonic) {
                blocks.close();
                continue;
            }
            if let Some(meterable) = self.parse_line(line) {
                blocks.add(Repeated::wrap(meterable, line.repeat));
            }
        }

        let root = blocks.finish();
        match root.len() {
            0 => None,
            1 => root.members().first().cloned(),
            _ => Some(Meterable::Collection(root)),
        }
    }

    fn parse_line(&self, line: &SourceLine) -> Option<Meterable> {
        let hint = self.hint_for(line);
        if line.instruction.is_empty() {
            // A comment-only line carrying a hint stands for its own cost.
            return match (hint, self.config.timing_hints) {
                (Some(hint), HintMode::Any | HintMode::IgnoreCommentedOut) => {
                    Some(Meterable::Fixed(FixedCost::new("", hint.timings(), 0)))
                }
                _ => None,
            };
        }
        let meterable = self.parse_with(&line.instruction, &self.parsers)?;
        Some(match hint {
            Some(hint)
                if self.config.timing_hints != HintMode::Subroutines
                    || meterable.flow().is_some() =>
            {
                Hinted::wrap(meterable, hint)
            }
            _ => meterable,
        })
    }

    fn hint_for(&self, line: &SourceLine) -> Option<TimingHint> {
        let comment = line.comment.as_deref()?;
        match self.config.timing_hints {
            HintMode::Disabled => None,
            HintMode::Subroutines | HintMode::Any => TimingHint::parse(comment),
            HintMode::IgnoreCommentedOut => {
                let hint = TimingHint::parse(comment)?;
                let code = TimingHint::strip(comment);
                if self.parse_instruction(code).is_some() {
                    tracing::trace!(comment, "ignoring hint on commented-out code");
                    return None;
                }
                Some(hint)
            }
        }
    }

    /// Every total applicable to `root`.
    pub fn totals<'a>(&self, root: &'a Meterable) -> Totals<'a> {
        Totals {
            default: default_total(root),
            execution_flow: execution_flow_total(root, &self.config.execution_flow),
            at_exit: at_exit_total(root, &self.config.at_exit),
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Meter::new(Config::default())
    }
}

/// Build a collection from parsed parts, failing if any part fails.
pub(crate) fn collect_all<I>(parts: I) -> Option<Meterable>
where
    I: IntoIterator<Item = Option<Meterable>>,
{
    let collection = parts.into_iter().collect::<Option<Collection>>()?;
    Some(Meterable::Collection(collection))
}
