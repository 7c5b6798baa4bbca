// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Cycle counts per hardware timing model.

use std::fmt;
use std::ops::{Add, AddAssign};

/// Hardware timing model an instruction cost is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HardwareModel {
    /// Plain Z80 T-states.
    Z80,
    /// Z80 with one wait state per M1 cycle (MSX).
    Msx,
    /// Amstrad CPC NOP-equivalents.
    Cpc,
}

impl HardwareModel {
    pub const ALL: [HardwareModel; 3] = [HardwareModel::Z80, HardwareModel::Msx, HardwareModel::Cpc];

    pub fn as_str(self) -> &'static str {
        match self {
            HardwareModel::Z80 => "z80",
            HardwareModel::Msx => "msx",
            HardwareModel::Cpc => "cpc",
        }
    }

    /// Unit the model counts in.
    pub fn unit(self) -> &'static str {
        match self {
            HardwareModel::Cpc => "NOPs",
            _ => "clock cycles",
        }
    }
}

/// Taken / not-taken cycle pair. Unconditional instructions carry equal values.
///
/// Sums and multiples saturate instead of overflowing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    pub taken: i32,
    pub not_taken: i32,
}

impl Timing {
    pub const ZERO: Timing = Timing {
        taken: 0,
        not_taken: 0,
    };

    pub const fn new(taken: i32, not_taken: i32) -> Self {
        Self { taken, not_taken }
    }

    pub const fn single(value: i32) -> Self {
        Self::new(value, value)
    }

    pub fn is_conditional(self) -> bool {
        self.taken != self.not_taken
    }

    /// Cost of `count` executions, saturating at the `i32` bounds.
    pub fn scaled(self, count: usize) -> Self {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        Self::new(
            self.taken.saturating_mul(count),
            self.not_taken.saturating_mul(count),
        )
    }

    /// Parse `"12"` or `"12/7"`; `"-"` reads as zero (model not applicable).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == "-" {
            return Some(Self::ZERO);
        }
        match text.split_once('/') {
            Some((taken, not_taken)) => Some(Self::new(
                parse_signed(taken)?,
                parse_signed(not_taken)?,
            )),
            None => parse_signed(text).map(Self::single),
        }
    }
}

fn parse_signed(text: &str) -> Option<i32> {
    let text = text.trim();
    match text.strip_prefix('-') {
        Some(rest) => rest.trim_start().parse::<i32>().ok().map(|v| -v),
        None => text.parse::<i32>().ok(),
    }
}

impl Add for Timing {
    type Output = Timing;

    fn add(self, rhs: Timing) -> Timing {
        Timing::new(
            self.taken.saturating_add(rhs.taken),
            self.not_taken.saturating_add(rhs.not_taken),
        )
    }
}

impl AddAssign for Timing {
    fn add_assign(&mut self, rhs: Timing) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_conditional() {
            write!(f, "{}/{}", self.taken, self.not_taken)
        } else {
            write!(f, "{}", self.taken)
        }
    }
}

/// One timing pair per hardware model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timings {
    pub z80: Timing,
    pub msx: Timing,
    pub cpc: Timing,
}

impl Timings {
    pub const ZERO: Timings = Timings {
        z80: Timing::ZERO,
        msx: Timing::ZERO,
        cpc: Timing::ZERO,
    };

    pub const fn new(z80: Timing, msx: Timing, cpc: Timing) -> Self {
        Self { z80, msx, cpc }
    }

    pub fn get(&self, model: HardwareModel) -> Timing {
        match model {
            HardwareModel::Z80 => self.z80,
            HardwareModel::Msx => self.msx,
            HardwareModel::Cpc => self.cpc,
        }
    }

    pub fn map(self, f: impl Fn(Timing) -> Timing) -> Self {
        Self::new(f(self.z80), f(self.msx), f(self.cpc))
    }

    pub fn scaled(self, count: usize) -> Self {
        self.map(|t| t.scaled(count))
    }

    /// True when any model has distinct taken/not-taken values.
    pub fn is_conditional(&self) -> bool {
        HardwareModel::ALL
            .iter()
            .any(|&model| self.get(model).is_conditional())
    }

    /// Both slots set to the taken value.
    pub fn when_taken(self) -> Self {
        self.map(|t| Timing::single(t.taken))
    }

    /// Both slots set to the not-taken value.
    pub fn when_not_taken(self) -> Self {
        self.map(|t| Timing::single(t.not_taken))
    }
}

impl Add for Timings {
    type Output = Timings;

    fn add(self, rhs: Timings) -> Timings {
        Timings::new(self.z80 + rhs.z80, self.msx + rhs.msx, self.cpc + rhs.cpc)
    }
}

impl AddAssign for Timings {
    fn add_assign(&mut self, rhs: Timings) {
        *self = *self + rhs;
    }
}
