// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Inline timing hints (`; [z80=11/5] [cpc=3]`) carried by trailing comments.

use std::sync::OnceLock;

use regex::Regex;

use super::timing::{HardwareModel, Timing, Timings};

const HINT_PATTERN: &str = r"\[(ts?|z80|cpc|msx|m1)\s*=\s*((?:-\s*)?\d+(?:/(?:-\s*)?\d+)?)\]";

fn hint_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HINT_PATTERN).ok()).as_ref()
}

/// Where hints are honored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HintMode {
    #[default]
    Disabled,
    /// Only on jump, call and return lines.
    Subroutines,
    /// On every line, including comment-only lines.
    Any,
    /// Like `Any`, unless the comment is commented-out code.
    IgnoreCommentedOut,
}

impl HintMode {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "disabled" | "none" => Some(HintMode::Disabled),
            "subroutines" => Some(HintMode::Subroutines),
            "any" => Some(HintMode::Any),
            "ignoreCommentedOut" => Some(HintMode::IgnoreCommentedOut),
            _ => None,
        }
    }
}

/// Timing overrides parsed from one comment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingHint {
    pub z80: Option<Timing>,
    pub msx: Option<Timing>,
    pub cpc: Option<Timing>,
    /// `t`/`ts`: applies to every model without its own tag.
    pub generic: Option<Timing>,
}

impl TimingHint {
    /// Collect every well-formed hint in the comment. Returns `None` when
    /// the comment holds no usable hint.
    pub fn parse(comment: &str) -> Option<Self> {
        let mut hint = TimingHint::default();
        let mut found = false;
        for caps in hint_regex()?.captures_iter(comment) {
            let Some(value) = Timing::parse(&caps[2]) else {
                continue;
            };
            let slot = match &caps[1] {
                "t" | "ts" => &mut hint.generic,
                "z80" => &mut hint.z80,
                "msx" | "m1" => &mut hint.msx,
                "cpc" => &mut hint.cpc,
                _ => continue,
            };
            *slot = Some(value);
            found = true;
        }
        found.then_some(hint)
    }

    /// Comment text up to the first hint.
    pub fn strip(comment: &str) -> &str {
        match hint_regex().and_then(|re| re.find(comment)) {
            Some(m) => &comment[..m.start()],
            None => comment,
        }
    }

    pub fn for_model(&self, model: HardwareModel) -> Option<Timing> {
        let explicit = match model {
            HardwareModel::Z80 => self.z80,
            HardwareModel::Msx => self.msx,
            HardwareModel::Cpc => self.cpc,
        };
        explicit.or(self.generic)
    }

    /// Hinted values for every model, zero where no tag applies.
    pub fn timings(&self) -> Timings {
        Timings::new(
            self.for_model(HardwareModel::Z80).unwrap_or_default(),
            self.for_model(HardwareModel::Msx).unwrap_or_default(),
            self.for_model(HardwareModel::Cpc).unwrap_or_default(),
        )
    }

    /// Add the hint to `base`. The not-taken value only applies to
    /// conditional instructions; otherwise the taken value goes to both slots.
    pub fn apply(&self, base: Timings, conditional: bool) -> Timings {
        base + self.timings().map(|hint| {
            if conditional {
                hint
            } else {
                Timing::single(hint.taken)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_model_tags() {
        let hint = TimingHint::parse("call it [z80=17] [cpc=5/3] [m1=19]").expect("hint");
        assert_eq!(hint.z80, Some(Timing::single(17)));
        assert_eq!(hint.cpc, Some(Timing::new(5, 3)));
        assert_eq!(hint.msx, Some(Timing::single(19)));
        assert_eq!(hint.generic, None);
    }

    #[test]
    fn generic_tag_fills_missing_models() {
        let hint = TimingHint::parse("[ts=10] [cpc=3]").expect("hint");
        assert_eq!(hint.for_model(HardwareModel::Z80), Some(Timing::single(10)));
        assert_eq!(hint.for_model(HardwareModel::Msx), Some(Timing::single(10)));
        assert_eq!(hint.for_model(HardwareModel::Cpc), Some(Timing::single(3)));
    }

    #[test]
    fn accepts_negative_values_and_blanks() {
        let hint = TimingHint::parse("[t = - 4/-2]").expect("hint");
        assert_eq!(hint.generic, Some(Timing::new(-4, -2)));
    }

    #[test]
    fn ignores_malformed_tokens() {
        assert_eq!(TimingHint::parse("just a comment"), None);
        assert_eq!(TimingHint::parse("[foo=3] [z80=x]"), None);
        let hint = TimingHint::parse("[z80=] [cpc=2]").expect("hint");
        assert_eq!(hint.z80, None);
        assert_eq!(hint.cpc, Some(Timing::single(2)));
    }

    #[test]
    fn applies_not_taken_only_to_conditionals() {
        let hint = TimingHint::parse("[z80=10/4]").expect("hint");
        let base = Timings::new(Timing::new(11, 5), Timing::ZERO, Timing::ZERO);
        assert_eq!(hint.apply(base, true).z80, Timing::new(21, 9));
        let base = Timings::new(Timing::single(17), Timing::ZERO, Timing::ZERO);
        assert_eq!(hint.apply(base, false).z80, Timing::single(27));
    }

    #[test]
    fn strips_hint_from_comment() {
        assert_eq!(TimingHint::strip("ld a,b [t=4]"), "ld a,b ");
        assert_eq!(TimingHint::strip("plain"), "plain");
    }

    #[test]
    fn parses_modes() {
        assert_eq!(HintMode::parse("any"), Some(HintMode::Any));
        assert_eq!(HintMode::parse("ignoreCommentedOut"), Some(HintMode::IgnoreCommentedOut));
        assert_eq!(HintMode::parse("sometimes"), None);
    }
}
