// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Source lines as handed to the meter.

use super::config::SyntaxFeatures;
use super::text_utils::{is_ident_char, is_ident_start, normalize_instruction, split_comment, split_unquoted};

/// One parsed unit of source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLine {
    pub label: Option<String>,
    /// Times the line executes; set by the host, never parsed.
    pub repeat: usize,
    /// Uppercased, blank-collapsed instruction text; empty for label or
    /// comment-only lines.
    pub instruction: String,
    /// Trailing comment without its `;`, case preserved.
    pub comment: Option<String>,
}

impl SourceLine {
    pub fn new(instruction: &str) -> Self {
        Self {
            label: None,
            repeat: 1,
            instruction: normalize_instruction(instruction),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.instruction.is_empty() && self.comment.is_none()
    }

    /// Split raw editor text into source lines.
    ///
    /// Labels end with `:`; under `colonless_labels` an identifier in column
    /// one is a label too, unless `is_keyword` claims it. Comments go to the
    /// last statement of a physical line. Blank lines are dropped.
    pub fn split_text(
        text: &str,
        features: &SyntaxFeatures,
        is_keyword: &dyn Fn(&str) -> bool,
    ) -> Vec<SourceLine> {
        let mut lines = Vec::new();
        for raw in text.lines() {
            let (code, comment) = split_comment(raw);
            let comment = comment
                .strip_prefix(';')
                .map(|comment| comment.trim().to_string());
            let (label, code) = split_label(code, features, is_keyword);

            let statements = match features.line_separator {
                Some(separator) => split_unquoted(code, separator),
                None => vec![code],
            };
            let last = statements.len() - 1;
            for (idx, statement) in statements.into_iter().enumerate() {
                let line = SourceLine {
                    label: if idx == 0 { label.clone() } else { None },
                    repeat: 1,
                    instruction: normalize_instruction(statement),
                    comment: if idx == last { comment.clone() } else { None },
                };
                if idx < last && line.instruction.is_empty() {
                    continue;
                }
                if !line.is_blank() {
                    lines.push(line);
                }
            }
        }
        lines
    }
}

fn split_label<'a>(
    code: &'a str,
    features: &SyntaxFeatures,
    is_keyword: &dyn Fn(&str) -> bool,
) -> (Option<String>, &'a str) {
    let bytes = code.as_bytes();
    let trimmed_start = bytes.iter().take_while(|c| c.is_ascii_whitespace()).count();
    let rest = &code[trimmed_start..];
    let rest_bytes = rest.as_bytes();
    if !rest_bytes.first().is_some_and(|&c| is_ident_start(c)) {
        return (None, code);
    }
    let end = rest_bytes.iter().take_while(|&&c| is_ident_char(c)).count();
    let name = &rest[..end];
    let after = &rest[end..];

    if let Some(after) = after.strip_prefix(':') {
        // `::` marks an exported label in some dialects
        let after = after.strip_prefix(':').unwrap_or(after);
        return (Some(name.to_string()), after);
    }
    let column_one = trimmed_start == 0;
    let separated = after.is_empty() || after.starts_with(|c: char| c.is_ascii_whitespace());
    if features.colonless_labels
        && column_one
        && separated
        && !is_keyword(&name.to_ascii_uppercase())
    {
        return (Some(name.to_string()), after);
    }
    (None, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Syntax;

    fn keywords(word: &str) -> bool {
        matches!(word, "NOP" | "LD" | "RET" | "DB")
    }

    fn split(text: &str, syntax: Syntax) -> Vec<SourceLine> {
        SourceLine::split_text(text, &syntax.features(), &keywords)
    }

    #[test]
    fn strips_colon_labels_and_comments() {
        let lines = split("loop: ld a , b ; copy [t=2]\n\n", Syntax::Glass);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label.as_deref(), Some("loop"));
        assert_eq!(lines[0].instruction, "LD A , B");
        assert_eq!(lines[0].comment.as_deref(), Some("copy [t=2]"));
        assert_eq!(lines[0].repeat, 1);
    }

    #[test]
    fn column_one_labels_need_dialect_support() {
        let lines = split("start nop\nnop", Syntax::Default);
        assert_eq!(lines[0].label.as_deref(), Some("start"));
        assert_eq!(lines[0].instruction, "NOP");
        assert_eq!(lines[1].label, None);
        assert_eq!(lines[1].instruction, "NOP");

        let lines = split("start nop", Syntax::Glass);
        assert_eq!(lines[0].label, None);
        assert_eq!(lines[0].instruction, "START NOP");
    }

    #[test]
    fn splits_statements_on_dialect_separator() {
        let lines = split("  nop : ld a,':' : ret ; done", Syntax::Sjasmplus);
        let texts: Vec<&str> = lines.iter().map(|l| l.instruction.as_str()).collect();
        assert_eq!(texts, ["NOP", "LD A,':'", "RET"]);
        assert_eq!(lines[0].comment, None);
        assert_eq!(lines[2].comment.as_deref(), Some("done"));

        let lines = split(" nop \\ nop", Syntax::Pasmo);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn keeps_comment_only_lines() {
        let lines = split("  ; [z80=10]", Syntax::Default);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].instruction.is_empty());
        assert_eq!(lines[0].comment.as_deref(), Some("[z80=10]"));
    }

    #[test]
    fn keeps_quoted_case() {
        let lines = split(" db \"Hi\"", Syntax::Default);
        assert_eq!(lines[0].instruction, "DB \"Hi\"");
    }
}
