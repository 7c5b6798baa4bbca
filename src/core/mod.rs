// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU-independent cost model, configuration and text handling.

pub mod config;
pub mod expr;
pub mod hint;
pub mod meterable;
pub mod source;
pub mod text_utils;
pub mod timing;
pub mod total;
