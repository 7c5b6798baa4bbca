// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Meter configuration snapshot and its JSON settings surface.

use serde_json::Value;
use thiserror::Error;

use crate::z80::InstructionSet;

use super::hint::HintMode;
use super::timing::{HardwareModel, Timing};
use super::total::{AtExitSettings, ExecutionFlowSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown platform '{0}' (expected z80, msx, cpc or zxnext)")]
    UnknownPlatform(String),
    #[error("unknown syntax '{0}' (expected default, sjasmplus, glass or pasmo)")]
    UnknownSyntax(String),
    #[error("unknown timing hint mode '{0}'")]
    UnknownHintMode(String),
    #[error("macro #{0} has no name")]
    UnnamedMacro(usize),
    #[error("macro '{name}': invalid {key} timing '{value}'")]
    InvalidMacroTiming {
        name: String,
        key: &'static str,
        value: String,
    },
}

/// Target machine: decides the instruction sets and the primary timing model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    #[default]
    Z80,
    Msx,
    Cpc,
    ZxNext,
}

impl Platform {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "z80" => Some(Platform::Z80),
            "msx" => Some(Platform::Msx),
            "cpc" => Some(Platform::Cpc),
            "zxnext" | "next" => Some(Platform::ZxNext),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Z80 => "z80",
            Platform::Msx => "msx",
            Platform::Cpc => "cpc",
            Platform::ZxNext => "zxnext",
        }
    }

    pub fn primary_model(self) -> HardwareModel {
        match self {
            Platform::Msx => HardwareModel::Msx,
            Platform::Cpc => HardwareModel::Cpc,
            Platform::Z80 | Platform::ZxNext => HardwareModel::Z80,
        }
    }

    pub fn supports(self, set: InstructionSet) -> bool {
        match set {
            InstructionSet::Z80 => true,
            InstructionSet::Z80N => self == Platform::ZxNext,
        }
    }
}

/// Assembler dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Syntax {
    #[default]
    Default,
    Sjasmplus,
    Glass,
    Pasmo,
}

impl Syntax {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "default" => Some(Syntax::Default),
            "sjasmplus" => Some(Syntax::Sjasmplus),
            "glass" => Some(Syntax::Glass),
            "pasmo" => Some(Syntax::Pasmo),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Default => "default",
            Syntax::Sjasmplus => "sjasmplus",
            Syntax::Glass => "glass",
            Syntax::Pasmo => "pasmo",
        }
    }

    /// Block-repetition opening and closing pseudo-ops.
    pub fn repetition_markers(self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Syntax::Default => (&["REPT", "DUP"], &["ENDR", "EDUP", "ENDM"]),
            Syntax::Sjasmplus => (&["DUP", "REPT"], &["EDUP", "ENDR"]),
            Syntax::Glass | Syntax::Pasmo => (&["REPT"], &["ENDM"]),
        }
    }

    pub fn features(self) -> SyntaxFeatures {
        let sjasmplus = self == Syntax::Sjasmplus;
        SyntaxFeatures {
            fake_instructions: sjasmplus,
            register_lists: sjasmplus,
            negative_conditions: sjasmplus,
            bracket_indirection: !matches!(self, Syntax::Glass | Syntax::Pasmo),
            line_separator: match self {
                Syntax::Sjasmplus => Some(':'),
                Syntax::Pasmo => Some('\\'),
                Syntax::Default | Syntax::Glass => None,
            },
            colonless_labels: matches!(self, Syntax::Default | Syntax::Pasmo),
        }
    }
}

/// Dialect switches; start from [`Syntax::features`] and may be overridden.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntaxFeatures {
    pub fake_instructions: bool,
    pub register_lists: bool,
    pub negative_conditions: bool,
    pub bracket_indirection: bool,
    pub line_separator: Option<char>,
    pub colonless_labels: bool,
}

impl Default for SyntaxFeatures {
    fn default() -> Self {
        Syntax::Default.features()
    }
}

/// User macro: either a body of instructions or fixed costs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,
    pub instructions: Vec<String>,
    pub z80: Option<Timing>,
    pub msx: Option<Timing>,
    pub cpc: Option<Timing>,
    /// Fallback for models without their own timing.
    pub ts: Option<Timing>,
    pub size: Option<usize>,
}

impl MacroDefinition {
    pub fn has_overrides(&self) -> bool {
        self.z80.is_some()
            || self.msx.is_some()
            || self.cpc.is_some()
            || self.ts.is_some()
            || self.size.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub platform: Platform,
    pub syntax: Syntax,
    pub features: SyntaxFeatures,
    pub directives_as_instructions: bool,
    pub timing_hints: HintMode,
    pub execution_flow: ExecutionFlowSettings,
    pub at_exit: AtExitSettings,
    pub macros: Vec<MacroDefinition>,
}

impl Config {
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Select a dialect and reset its feature switches.
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self.features = syntax.features();
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Value = serde_json::from_str(text)?;
        let mut config = Config::default();
        config.update_from_settings(&settings)?;
        Ok(config)
    }

    /// Apply a settings object, either bare or under a `z80meter` key.
    /// Keys that are absent keep their current value.
    pub fn update_from_settings(&mut self, settings: &Value) -> Result<(), ConfigError> {
        let root = settings.get("z80meter").unwrap_or(settings);
        let Some(object) = root.as_object() else {
            tracing::warn!("ignoring settings that are not a JSON object");
            return Ok(());
        };
        for key in object.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "ignoring unknown setting");
            }
        }

        if let Some(platform) = root.get("platform").and_then(Value::as_str) {
            self.platform = Platform::parse(platform)
                .ok_or_else(|| ConfigError::UnknownPlatform(platform.to_string()))?;
        }
        if let Some(syntax) = root.get("syntax").and_then(Value::as_str) {
            let syntax =
                Syntax::parse(syntax).ok_or_else(|| ConfigError::UnknownSyntax(syntax.to_string()))?;
            self.syntax = syntax;
            self.features = syntax.features();
        }
        if let Some(features) = root.get("syntaxFeatures") {
            self.update_features(features);
        }
        if let Some(enabled) = root.get("directivesAsInstructions").and_then(Value::as_bool) {
            self.directives_as_instructions = enabled;
        }
        if let Some(mode) = root.get("timingHints").and_then(Value::as_str) {
            self.timing_hints =
                HintMode::parse(mode).ok_or_else(|| ConfigError::UnknownHintMode(mode.to_string()))?;
        }
        if let Some(flow) = root.get("executionFlow") {
            let settings = &mut self.execution_flow;
            read_bool(flow, "enabled", &mut settings.enabled);
            read_usize(flow, "threshold", &mut settings.threshold);
            read_bool(flow, "stopOnUnconditionalJump", &mut settings.stop_on_unconditional_jump);
            read_bool(flow, "requireConditional", &mut settings.require_conditional);
        }
        if let Some(exit) = root.get("atExit") {
            let settings = &mut self.at_exit;
            read_bool(exit, "ret", &mut settings.ret);
            read_bool(exit, "jp", &mut settings.jp);
            read_bool(exit, "call", &mut settings.call);
            read_usize(exit, "threshold", &mut settings.threshold);
            read_bool(exit, "stopOnUnconditionalJump", &mut settings.stop_on_unconditional_jump);
            read_bool(exit, "requireConditional", &mut settings.require_conditional);
        }
        if let Some(macros) = root.get("macros").and_then(Value::as_array) {
            self.macros = macros
                .iter()
                .enumerate()
                .map(|(idx, value)| read_macro(idx, value))
                .collect::<Result<_, _>>()?;
        }
        Ok(())
    }

    fn update_features(&mut self, value: &Value) {
        let features = &mut self.features;
        read_bool(value, "fakeInstructions", &mut features.fake_instructions);
        read_bool(value, "registerLists", &mut features.register_lists);
        read_bool(value, "negativeConditions", &mut features.negative_conditions);
        read_bool(value, "bracketIndirection", &mut features.bracket_indirection);
        read_bool(value, "colonlessLabels", &mut features.colonless_labels);
        match value.get("lineSeparator") {
            Some(Value::Null) => features.line_separator = None,
            Some(Value::String(text)) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (None, _) => features.line_separator = None,
                    (Some(c), None) if c.is_ascii() => features.line_separator = Some(c),
                    _ => tracing::warn!(separator = %text, "line separator must be one ASCII character"),
                }
            }
            Some(_) => tracing::warn!("line separator must be a string or null"),
            None => {}
        }
    }
}

const KNOWN_KEYS: &[&str] = &[
    "platform",
    "syntax",
    "syntaxFeatures",
    "directivesAsInstructions",
    "timingHints",
    "executionFlow",
    "atExit",
    "macros",
];

fn read_bool(value: &Value, key: &str, slot: &mut bool) {
    if let Some(flag) = value.get(key).and_then(Value::as_bool) {
        *slot = flag;
    }
}

fn read_usize(value: &Value, key: &str, slot: &mut usize) {
    if let Some(number) = value.get(key).and_then(Value::as_u64) {
        *slot = number as usize;
    }
}

fn read_macro(idx: usize, value: &Value) -> Result<MacroDefinition, ConfigError> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ConfigError::UnnamedMacro(idx))?
        .to_ascii_uppercase();

    let instructions = match value.get("instructions") {
        Some(Value::String(text)) => vec![text.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let timing = |key: &'static str| -> Result<Option<Timing>, ConfigError> {
        let text = match value.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        Timing::parse(&text)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidMacroTiming {
                name: name.clone(),
                key,
                value: text,
            })
    };

    Ok(MacroDefinition {
        z80: timing("z80")?,
        msx: timing("msx")?,
        cpc: timing("cpc")?,
        ts: timing("ts")?,
        size: value.get("size").and_then(Value::as_u64).map(|size| size as usize),
        instructions,
        name,
    })
}
