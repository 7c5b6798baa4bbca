// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Shared text utilities for normalizing and splitting source text.

/// Check if a byte is a valid identifier start character (letter or underscore).
#[inline]
pub fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'.' || c == b'@'
}

/// Check if a byte is a valid identifier continuation character.
#[inline]
pub fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.' || c == b'$' || c == b'@'
}

/// Quote tracking shared by every splitter in this module.
///
/// Fed byte offsets of character starts; delimiters are all ASCII, so a
/// multi-byte character is never mistaken for one.
///
/// `AF'` is the only place a single quote appears outside a literal, so an
/// apostrophe directly after `AF` never opens a string.
#[derive(Default)]
struct QuoteState {
    in_single: bool,
    in_double: bool,
    escape: bool,
}

impl QuoteState {
    /// Feed the byte at `idx`; returns true while inside a quoted literal
    /// (including the delimiters).
    fn step(&mut self, bytes: &[u8], idx: usize) -> bool {
        let c = bytes[idx];
        if self.escape {
            self.escape = false;
            return true;
        }
        match c {
            b'\\' if self.in_single || self.in_double => {
                self.escape = true;
                true
            }
            b'\'' if !self.in_double => {
                if !self.in_single && is_af_shadow(bytes, idx) {
                    return false;
                }
                self.in_single = !self.in_single;
                true
            }
            b'"' if !self.in_single => {
                self.in_double = !self.in_double;
                true
            }
            _ => self.in_single || self.in_double,
        }
    }

    fn quoted(&self) -> bool {
        self.in_single || self.in_double
    }
}

fn is_af_shadow(bytes: &[u8], idx: usize) -> bool {
    idx >= 2
        && bytes[idx - 2].eq_ignore_ascii_case(&b'A')
        && bytes[idx - 1].eq_ignore_ascii_case(&b'F')
        && (idx < 3 || !is_ident_char(bytes[idx - 3]))
}

/// Split a line into code and comment parts at the first unquoted semicolon.
pub fn split_comment(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut quotes = QuoteState::default();
    for idx in 0..bytes.len() {
        let quoted = quotes.step(bytes, idx);
        if bytes[idx] == b';' && !quoted {
            return (&line[..idx], &line[idx..]);
        }
    }
    (line, "")
}

/// Split a line at every unquoted occurrence of `separator`.
pub fn split_unquoted(line: &str, separator: char) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut quotes = QuoteState::default();
    let mut parts = Vec::new();
    let mut start = 0usize;
    for (idx, c) in line.char_indices() {
        let quoted = quotes.step(bytes, idx);
        if !quoted && c == separator {
            parts.push(&line[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    parts.push(&line[start..]);
    parts
}

/// Normalize instruction text: uppercase and collapse blanks outside quoted
/// literals, trim both ends.
pub fn normalize_instruction(text: &str) -> String {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut quotes = QuoteState::default();
    let mut out = String::with_capacity(bytes.len());
    let mut pending_space = false;
    for (idx, c) in text.char_indices() {
        let quoted = quotes.step(bytes, idx);
        if !quoted && c.is_ascii_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if quoted {
            out.push(c);
        } else {
            out.push(c.to_ascii_uppercase());
        }
    }
    out
}

/// Split normalized instruction text into mnemonic and operand text.
pub fn split_mnemonic(text: &str) -> (&str, &str) {
    match text.find(' ') {
        Some(idx) => (&text[..idx], text[idx + 1..].trim()),
        None => (text, ""),
    }
}

/// Split operand text at top-level commas (outside quotes and brackets).
///
/// Blanks outside quoted literals are removed from each operand, so
/// `( IX + 5 )` and `(IX+5)` compare equal.
pub fn split_operands(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    let mut quotes = QuoteState::default();
    let mut depth = 0i32;
    let mut operands = Vec::new();
    let mut current = String::new();
    for (idx, c) in text.char_indices() {
        let quoted = quotes.step(bytes, idx);
        if quoted {
            current.push(c);
            continue;
        }
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth <= 0 => {
                operands.push(std::mem::take(&mut current));
                continue;
            }
            _ if c.is_ascii_whitespace() => continue,
            _ => {}
        }
        current.push(c);
    }
    operands.push(current);
    operands
}

/// Returns the contents of an operand fully wrapped in `open`/`close`.
///
/// `(1+2)*(3)` is not wrapped: the first bracket closes before the end.
pub fn strip_wrapping(operand: &str, open: u8, close: u8) -> Option<&str> {
    let bytes = operand.as_bytes();
    if bytes.len() < 2 || bytes[0] != open || bytes[bytes.len() - 1] != close {
        return None;
    }
    let mut quotes = QuoteState::default();
    let mut depth = 0i32;
    for idx in 0..bytes.len() {
        if quotes.step(bytes, idx) {
            continue;
        }
        if bytes[idx] == open {
            depth += 1;
        } else if bytes[idx] == close {
            depth -= 1;
            if depth == 0 && idx != bytes.len() - 1 {
                return None;
            }
        }
    }
    if depth == 0 && !quotes.quoted() {
        Some(&operand[1..operand.len() - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comment() {
        assert_eq!(split_comment("code ; comment"), ("code ", "; comment"));
        assert_eq!(split_comment("no comment"), ("no comment", ""));
        assert_eq!(
            split_comment("\"str;ing\" ; comment"),
            ("\"str;ing\" ", "; comment")
        );
        assert_eq!(
            split_comment("'c;har' ; comment"),
            ("'c;har' ", "; comment")
        );
        assert_eq!(
            split_comment("ex af,af' ; swap"),
            ("ex af,af' ", "; swap")
        );
    }

    #[test]
    fn normalizes_case_and_blanks_outside_quotes() {
        assert_eq!(normalize_instruction("  ld   a , 5 "), "LD A , 5");
        assert_eq!(normalize_instruction("db 'a  b',0"), "DB 'a  b',0");
        assert_eq!(normalize_instruction("ex af,af'"), "EX AF,AF'");
    }

    #[test]
    fn splits_operands_at_top_level_commas() {
        assert_eq!(split_operands("A , ( IX + 5 )"), vec!["A", "(IX+5)"]);
        assert_eq!(split_operands("'a,b',2"), vec!["'a,b'", "2"]);
        assert_eq!(split_operands("AF,AF'"), vec!["AF", "AF'"]);
        assert!(split_operands("").is_empty());
    }

    #[test]
    fn keeps_non_ascii_text_intact() {
        assert_eq!(normalize_instruction("db \"é\",ü"), "DB \"é\",ü");
        assert_eq!(split_operands("\"é,ß\" , 1"), vec!["\"é,ß\"", "1"]);
        assert_eq!(split_unquoted("nop ¦ 'é' ¦ ret", '¦'), vec!["nop ", " 'é' ", " ret"]);
    }

    #[test]
    fn splits_mnemonic() {
        assert_eq!(split_mnemonic("LD A,5"), ("LD", "A,5"));
        assert_eq!(split_mnemonic("NOP"), ("NOP", ""));
    }

    #[test]
    fn strips_only_full_wrapping() {
        assert_eq!(strip_wrapping("(HL)", b'(', b')'), Some("HL"));
        assert_eq!(strip_wrapping("[HL]", b'[', b']'), Some("HL"));
        assert_eq!(strip_wrapping("(1+2)*(3)", b'(', b')'), None);
        assert_eq!(strip_wrapping("HL", b'(', b')'), None);
    }

    #[test]
    fn splits_on_unquoted_separator() {
        assert_eq!(split_unquoted("NOP : NOP", ':'), vec!["NOP ", " NOP"]);
        assert_eq!(split_unquoted("DB ':'", ':'), vec!["DB ':'"]);
    }
}
