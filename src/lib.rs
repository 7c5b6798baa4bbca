// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Z80 assembly timing and size meter.
//!
//! Source lines are recognized against the Z80 instruction table (plus
//! dialect pseudo-instructions, user macros and data directives) and
//! composed into a [`Meterable`] tree whose timings and bytes can be
//! queried per hardware model.

pub mod cli;
pub mod core;
pub mod parser;
pub mod z80;

pub use crate::core::config::{Config, ConfigError, Platform, Syntax};
pub use crate::core::meterable::Meterable;
pub use crate::core::source::SourceLine;
pub use crate::core::timing::{HardwareModel, Timing, Timings};
pub use crate::parser::{Meter, Totals};
