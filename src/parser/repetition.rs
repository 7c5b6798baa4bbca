// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Block repetition (`REPT n` ... `ENDR`, `DUP n` ... `EDUP`).

use crate::core::expr::parse_value;
use crate::core::meterable::{Collection, Meterable, Repeated};
use crate::core::text_utils::split_operands;

/// Counts beyond the 64K address space are clamped.
const MAX_COUNT: i64 = 0x10000;

/// Repeat count of a block opener; anything unusable counts once.
pub(super) fn parse_count(operands: &str) -> usize {
    let operands = split_operands(operands);
    match operands.first().and_then(|count| parse_value(count)) {
        Some(count) if count > 0 => usize::try_from(count.min(MAX_COUNT)).unwrap_or(1),
        _ => 1,
    }
}

/// Open repetition blocks, innermost last.
pub(super) struct BlockStack {
    root: Collection,
    open: Vec<(Collection, usize)>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self {
            root: Collection::new(),
            open: Vec::new(),
        }
    }

    pub fn add(&mut self, meterable: Meterable) {
        match self.open.last_mut() {
            Some((block, _)) => block.add(meterable),
            None => self.root.add(meterable),
        }
    }

    pub fn open(&mut self, count: usize) {
        self.open.push((Collection::new(), count));
    }

    /// Close the innermost block. A stray closer is ignored.
    pub fn close(&mut self) {
        let Some((block, count)) = self.open.pop() else {
            tracing::trace!("ignoring block end without an open block");
            return;
        };
        if block.is_empty() {
            return;
        }
        let body = Meterable::Collection(block);
        self.add(Repeated::wrap(body, count));
    }

    /// Close every block left open and return the outermost collection.
    pub fn finish(mut self) -> Collection {
        while !self.open.is_empty() {
            self.close();
        }
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::meterable::FixedCost;
    use crate::core::timing::{Timing, Timings};

    fn unit() -> Meterable {
        let one = Timing::single(1);
        Meterable::Fixed(FixedCost::new("X", Timings::new(one, one, one), 1))
    }

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("$10"), 16);
        assert_eq!(parse_count("COUNT"), 1);
        assert_eq!(parse_count("0"), 1);
        assert_eq!(parse_count("-2"), 1);
        assert_eq!(parse_count(""), 1);
        assert_eq!(parse_count("999999999"), 0x10000);
    }

    #[test]
    fn nested_blocks_multiply() {
        let mut blocks = BlockStack::new();
        blocks.open(2);
        blocks.add(unit());
        blocks.open(3);
        blocks.add(unit());
        blocks.close();
        blocks.close();
        blocks.add(unit());
        let root = Meterable::Collection(blocks.finish());
        assert_eq!(root.size(), 2 * (1 + 3) + 1);
        assert_eq!(root.flatten().len(), 9);
    }

    #[test]
    fn unclosed_blocks_close_at_end() {
        let mut blocks = BlockStack::new();
        blocks.open(4);
        blocks.add(unit());
        let root = blocks.finish();
        assert_eq!(root.len(), 1);
        assert_eq!(Meterable::Collection(root).size(), 4);
    }

    #[test]
    fn stray_closer_is_ignored() {
        let mut blocks = BlockStack::new();
        blocks.close();
        blocks.add(unit());
        assert_eq!(blocks.finish().len(), 1);
    }
}
