// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Composable cost values.
//!
//! Every parsed line becomes a [`Meterable`]: a leaf (instruction, data
//! directive, fixed-cost leaf) or a composition wrapping other meterables
//! (collection, repetition, timing-hint overlay). Compositions never
//! mutate what they wrap.

use std::cell::OnceCell;
use std::sync::Arc;

use crate::z80::{FlowKind, Instruction};

use super::hint::TimingHint;
use super::timing::Timings;

/// Placeholder for a byte whose value is not known.
pub const UNKNOWN_BYTE: &str = "n";

/// Unrolled repetitions stop at this many leaves or bytes, the size of the
/// Z80 address space. Sizes and timings are computed from counts and are
/// not limited.
pub const MAX_UNROLLED: usize = 0x10000;

#[derive(Clone, Debug)]
pub enum Meterable {
    Instruction(Arc<Instruction>),
    Directive(Directive),
    Fixed(FixedCost),
    Collection(Collection),
    Repeated(Repeated),
    Hinted(Hinted),
}

impl Meterable {
    pub fn timings(&self) -> Timings {
        match self {
            Meterable::Instruction(ins) => ins.timings,
            Meterable::Directive(_) => Timings::ZERO,
            Meterable::Fixed(fixed) => fixed.timings,
            Meterable::Collection(collection) => collection.aggregate().timings,
            Meterable::Repeated(repeated) => repeated.inner.timings().scaled(repeated.count),
            Meterable::Hinted(hinted) => hinted.timings(),
        }
    }

    /// Encoded bytes as two-digit hex strings; unknown bytes are
    /// placeholders (`n`, `o`, `e`). At most [`MAX_UNROLLED`] bytes.
    pub fn bytes(&self) -> Vec<String> {
        match self {
            Meterable::Instruction(ins) => ins.opcode.clone(),
            Meterable::Directive(directive) => directive.bytes.clone(),
            Meterable::Fixed(fixed) => fixed.bytes.clone(),
            Meterable::Collection(collection) => collection.aggregate().bytes.clone(),
            Meterable::Repeated(repeated) => {
                let inner = repeated.inner.bytes();
                let total = inner.len().saturating_mul(repeated.count).min(MAX_UNROLLED);
                inner.iter().cycle().take(total).cloned().collect()
            }
            Meterable::Hinted(hinted) => hinted.inner.bytes(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Meterable::Instruction(ins) => ins.size,
            Meterable::Directive(directive) => directive.bytes.len(),
            Meterable::Fixed(fixed) => fixed.size,
            Meterable::Collection(collection) => collection.aggregate().size,
            Meterable::Repeated(repeated) => repeated.inner.size().saturating_mul(repeated.count),
            Meterable::Hinted(hinted) => hinted.inner.size(),
        }
    }

    /// Instruction text label.
    pub fn text(&self) -> String {
        match self {
            Meterable::Instruction(ins) => ins.text(),
            Meterable::Directive(directive) => directive.text.clone(),
            Meterable::Fixed(fixed) => fixed.text.clone(),
            Meterable::Collection(_) | Meterable::Repeated(_) => self
                .flatten()
                .iter()
                .map(|leaf| leaf.text())
                .collect::<Vec<_>>()
                .join("\n"),
            Meterable::Hinted(hinted) => hinted.inner.text(),
        }
    }

    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Meterable::Instruction(ins) => Some(ins.as_ref()),
            Meterable::Hinted(hinted) => hinted.inner.instruction(),
            _ => None,
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self, Meterable::Collection(_) | Meterable::Repeated(_))
    }

    pub fn flow(&self) -> Option<FlowKind> {
        self.instruction().and_then(|ins| ins.flow)
    }

    /// True when taken and not-taken costs differ.
    pub fn is_conditional(&self) -> bool {
        match self {
            Meterable::Instruction(ins) => ins.conditional,
            Meterable::Hinted(hinted) => hinted.inner.is_conditional(),
            _ => self.timings().is_conditional(),
        }
    }

    /// True for a jump or return whose condition may fail.
    pub fn is_conditional_exit(&self) -> bool {
        matches!(self.flow(), Some(FlowKind::Jump | FlowKind::Ret)) && self.is_conditional()
    }

    /// True for a jump or return that always transfers control.
    pub fn is_unconditional_exit(&self) -> bool {
        matches!(self.flow(), Some(FlowKind::Jump | FlowKind::Ret)) && !self.is_conditional()
    }

    /// Leaves in source order, repetitions unrolled up to
    /// [`MAX_UNROLLED`] leaves.
    pub fn flatten(&self) -> Vec<&Meterable> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Meterable>) {
        if out.len() >= MAX_UNROLLED {
            return;
        }
        match self {
            Meterable::Collection(collection) => {
                for member in &collection.members {
                    member.flatten_into(out);
                }
            }
            Meterable::Repeated(repeated) if !repeated.inner.is_composed() => {
                let room = MAX_UNROLLED - out.len();
                out.extend(std::iter::repeat(&*repeated.inner).take(repeated.count.min(room)));
            }
            Meterable::Repeated(repeated) => {
                let inner = repeated.inner.flatten();
                if inner.is_empty() {
                    return;
                }
                for _ in 0..repeated.count {
                    let room = MAX_UNROLLED - out.len();
                    if room == 0 {
                        break;
                    }
                    out.extend(inner.iter().copied().take(room));
                }
            }
            _ => out.push(self),
        }
    }

    /// Visit every leaf once, in source order, with the number of times it
    /// executes. Repetitions multiply the count and are never unrolled; the
    /// last leaf visited is the last one executed.
    pub fn for_each_leaf<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Meterable, usize),
    {
        self.walk_leaves(1, visit);
    }

    fn walk_leaves<'a, F>(&'a self, times: usize, visit: &mut F)
    where
        F: FnMut(&'a Meterable, usize),
    {
        match self {
            Meterable::Collection(collection) => {
                for member in &collection.members {
                    member.walk_leaves(times, visit);
                }
            }
            Meterable::Repeated(repeated) => {
                repeated
                    .inner
                    .walk_leaves(times.saturating_mul(repeated.count), visit);
            }
            _ => visit(self, times),
        }
    }

    /// Number of leaves executed, without unrolling.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0usize;
        self.for_each_leaf(&mut |_, times| count = count.saturating_add(times));
        count
    }
}

/// Data declaration: bytes and no execution cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub text: String,
    pub bytes: Vec<String>,
}

/// Leaf with caller-supplied cost (macro overrides, comment-only hints).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedCost {
    pub text: String,
    pub timings: Timings,
    pub size: usize,
    pub bytes: Vec<String>,
}

impl FixedCost {
    /// Bytes default to `size` unknown placeholders.
    pub fn new(text: impl Into<String>, timings: Timings, size: usize) -> Self {
        Self {
            text: text.into(),
            timings,
            size,
            bytes: vec![UNKNOWN_BYTE.to_string(); size],
        }
    }
}

#[derive(Clone, Debug)]
struct Aggregate {
    timings: Timings,
    size: usize,
    bytes: Vec<String>,
}

/// Ordered members; totals are computed on first use and dropped on `add`.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    members: Vec<Meterable>,
    cache: OnceCell<Aggregate>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, member: Meterable) {
        self.members.push(member);
        self.cache = OnceCell::new();
    }

    pub fn members(&self) -> &[Meterable] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn aggregate(&self) -> &Aggregate {
        self.cache.get_or_init(|| {
            let mut aggregate = Aggregate {
                timings: Timings::ZERO,
                size: 0,
                bytes: Vec::new(),
            };
            for member in &self.members {
                aggregate.timings += member.timings();
                aggregate.size = aggregate.size.saturating_add(member.size());
                let room = MAX_UNROLLED - aggregate.bytes.len();
                if room > 0 {
                    aggregate.bytes.extend(member.bytes().into_iter().take(room));
                }
            }
            aggregate
        })
    }
}

impl FromIterator<Meterable> for Collection {
    fn from_iter<I: IntoIterator<Item = Meterable>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
            cache: OnceCell::new(),
        }
    }
}

/// A meterable executed `count` (at least 2) times.
#[derive(Clone, Debug)]
pub struct Repeated {
    inner: Box<Meterable>,
    count: usize,
}

impl Repeated {
    /// Wrap `inner`; counts of 1 or less leave it unwrapped.
    pub fn wrap(inner: Meterable, count: usize) -> Meterable {
        if count <= 1 {
            return inner;
        }
        Meterable::Repeated(Repeated {
            inner: Box::new(inner),
            count,
        })
    }

    pub fn inner(&self) -> &Meterable {
        &self.inner
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Timing-hint overlay. Flattens as a single leaf.
#[derive(Clone, Debug)]
pub struct Hinted {
    inner: Box<Meterable>,
    hint: TimingHint,
}

impl Hinted {
    pub fn wrap(inner: Meterable, hint: TimingHint) -> Meterable {
        Meterable::Hinted(Hinted {
            inner: Box::new(inner),
            hint,
        })
    }

    pub fn inner(&self) -> &Meterable {
        &self.inner
    }

    fn timings(&self) -> Timings {
        self.hint
            .apply(self.inner.timings(), self.inner.is_conditional())
    }
}
