// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Literal evaluation for operands and data directives.
//!
//! Only literals are evaluated. Symbols and arithmetic are left alone: the
//! meter never needs an operand's value except to pick a bit index, an RST
//! page or a data byte, and every caller has a fallback for `None`.

/// Parse a numeric literal in any of the common Z80 assembler notations.
///
/// Supported forms:
/// - Decimal: `42`, `42d`
/// - Hex: `0x2A`, `$2A`, `#2A`, `&2A`, `2Ah`
/// - Octal: `052`, `@52`, `52o`, `52q`
/// - Binary: `%101010`, `101010b`, `0b101010`
///
/// A leading `-` (optionally followed by blanks) negates the value.
pub fn parse_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (is_neg, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    if text.is_empty() {
        return None;
    }

    let text: String = text.chars().filter(|&c| c != '_').collect();
    let text = text.as_str();

    // Prefixes first, so a trailing-letter heuristic never reinterprets
    // a prefixed literal such as $BB or %0101.
    let val = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        radix(hex, 16)?
    } else if let Some(hex) = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix('#'))
        .or_else(|| text.strip_prefix('&'))
    {
        radix(hex, 16)?
    } else if let Some(bin) = text.strip_prefix('%') {
        radix(bin, 2)?
    } else if let Some(oct) = text.strip_prefix('@') {
        radix(oct, 8)?
    } else if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    } else if let Some(hex) = text.strip_suffix(['h', 'H']) {
        radix(hex, 16)?
    } else if let Some(bin) = text.strip_suffix(['b', 'B']) {
        if bin.chars().all(|c| c == '0' || c == '1') {
            radix(bin, 2)?
        } else {
            return None;
        }
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        radix(bin, 2)?
    } else if let Some(oct) = text.strip_suffix(['o', 'O', 'q', 'Q']) {
        radix(oct, 8)?
    } else if let Some(dec) = text.strip_suffix(['d', 'D']) {
        radix(dec, 10)?
    } else if text.len() > 1 && text.starts_with('0') {
        // C-style octal; falls back to decimal for digits 8 and 9
        radix(&text[1..], 8).or_else(|| radix(text, 10))?
    } else {
        radix(text, 10)?
    };

    Some(if is_neg { -val } else { val })
}

fn radix(digits: &str, base: u32) -> Option<i64> {
    if digits.is_empty() {
        return None;
    }
    i64::from_str_radix(digits, base).ok()
}

/// Evaluate a data operand: a numeric literal or a one-character quoted
/// literal (`'A'` / `"A"`).
pub fn parse_value(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(ch) = char_literal(text) {
        return Some(ch as i64);
    }
    parse_number(text)
}

fn char_literal(text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    if bytes.len() == 3 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[2] == bytes[0] {
        return Some(bytes[1]);
    }
    None
}

/// Returns true if the text is a literal (as opposed to a symbol or an
/// expression that needs a symbol table).
pub fn is_literal(text: &str) -> bool {
    parse_value(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_number_decimal() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("-10"), Some(-10));
        assert_eq!(parse_number("- 10"), Some(-10));
        assert_eq!(parse_number("42d"), Some(42));
    }

    #[test]
    fn parse_number_hex() {
        assert_eq!(parse_number("0x2A"), Some(42));
        assert_eq!(parse_number("$2A"), Some(42));
        assert_eq!(parse_number("#2A"), Some(42));
        assert_eq!(parse_number("&2A"), Some(42));
        assert_eq!(parse_number("2Ah"), Some(42));
        assert_eq!(parse_number("38H"), Some(0x38));
        assert_eq!(parse_number("0FFH"), Some(0xFF));
    }

    #[test]
    fn parse_number_octal() {
        assert_eq!(parse_number("052"), Some(42));
        assert_eq!(parse_number("@52"), Some(42));
        assert_eq!(parse_number("52o"), Some(42));
        assert_eq!(parse_number("52Q"), Some(42));
        assert_eq!(parse_number("09"), Some(9));
    }

    #[test]
    fn parse_number_binary() {
        assert_eq!(parse_number("%101010"), Some(42));
        assert_eq!(parse_number("101010b"), Some(42));
        assert_eq!(parse_number("0b101010"), Some(42));
    }

    #[test]
    fn rejects_symbols_and_expressions() {
        assert_eq!(parse_number("LABEL"), None);
        assert_eq!(parse_number("B"), None);
        assert_eq!(parse_number("$"), None);
        assert_eq!(parse_number("1+2"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("12G"), None);
    }

    proptest! {
        #[test]
        fn parse_number_decimal_round_trip(value in any::<u32>()) {
            prop_assert_eq!(parse_number(&value.to_string()), Some(i64::from(value)));
            prop_assert_eq!(parse_number(&format!("-{value}")), Some(-i64::from(value)));
        }

        #[test]
        fn parse_number_hex_round_trip(value in any::<u32>()) {
            for text in [
                format!("0x{value:X}"),
                format!("${value:X}"),
                format!("#{value:x}"),
                format!("&{value:X}"),
                format!("0{value:X}h"),
            ] {
                prop_assert_eq!(parse_number(&text), Some(i64::from(value)), "{}", text);
            }
        }

        #[test]
        fn parse_number_binary_round_trip(value in any::<u16>()) {
            for text in [format!("%{value:b}"), format!("{value:b}b"), format!("0b{value:b}")] {
                prop_assert_eq!(parse_number(&text), Some(i64::from(value)), "{}", text);
            }
        }

        #[test]
        fn parse_number_octal_round_trip(value in any::<u32>()) {
            for text in [format!("@{value:o}"), format!("{value:o}o"), format!("{value:o}q")] {
                prop_assert_eq!(parse_number(&text), Some(i64::from(value)), "{}", text);
            }
        }
    }

    #[test]
    fn parse_value_accepts_char_literals() {
        assert_eq!(parse_value("'A'"), Some(65));
        assert_eq!(parse_value("\"0\""), Some(48));
        assert_eq!(parse_value("'AB'"), None);
        assert!(is_literal("10h"));
        assert!(!is_literal("FOO"));
    }
}
