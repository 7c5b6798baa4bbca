// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and report rendering.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use tracing::Level;

use crate::core::config::{Config, ConfigError, Platform, Syntax};
use crate::core::meterable::Meterable;
use crate::core::timing::{HardwareModel, Timings};
use crate::core::total::TotalTiming;
use crate::parser::Meter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Estimate Z80 cycle counts and encoded size for a fragment of assembly source.

Timings are reported for the plain Z80, MSX (one M1 wait state) and Amstrad CPC
(NOP-equivalents) models. Conditional instructions show taken/not-taken pairs.
Reads FILE, or standard input when FILE is omitted or '-'.";

#[derive(Parser, Debug)]
#[command(
    name = "z80meter",
    version = VERSION,
    about = "Z80 assembly timing and size meter",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        value_name = "FILE",
        long_help = "Assembly source to meter. Reads standard input when omitted or '-'."
    )]
    pub input: Option<PathBuf>,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select output format. text is default; json prints one machine-readable object."
    )]
    pub format: OutputFormat,
    #[arg(
        long = "platform",
        value_name = "ID",
        long_help = "Target platform: z80, msx, cpc or zxnext. Overrides the settings file."
    )]
    pub platform: Option<String>,
    #[arg(
        long = "syntax",
        value_name = "ID",
        long_help = "Assembler dialect: default, sjasmplus, glass or pasmo. Overrides the settings file and resets its dialect switches."
    )]
    pub syntax: Option<String>,
    #[arg(
        long = "config",
        value_name = "FILE",
        long_help = "Read settings from a JSON file (keys optionally nested under a \"z80meter\" object)."
    )]
    pub config: Option<PathBuf>,
    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = Level::WARN)]
    pub log_level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn read_path(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Build the configuration: defaults, then the settings file, then flags.
pub fn build_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_str(&read_path(path)?)?,
        None => Config::default(),
    };
    if let Some(platform) = &cli.platform {
        let platform = Platform::parse(platform)
            .ok_or_else(|| ConfigError::UnknownPlatform(platform.clone()))?;
        config = config.with_platform(platform);
    }
    if let Some(syntax) = &cli.syntax {
        let syntax =
            Syntax::parse(syntax).ok_or_else(|| ConfigError::UnknownSyntax(syntax.clone()))?;
        config = config.with_syntax(syntax);
    }
    Ok(config)
}

pub fn read_input(cli: &Cli) -> Result<String, CliError> {
    match &cli.input {
        Some(path) if path.as_os_str() != "-" => read_path(path),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text)
        }
    }
}

/// Meter `source` and render the report in the requested format.
pub fn render_report(meter: &Meter, source: &str, format: OutputFormat) -> String {
    let parsed = meter.parse_text(source);
    match format {
        OutputFormat::Json => report_json(meter, parsed.as_ref()).to_string(),
        OutputFormat::Text => report_text(meter, parsed.as_ref()),
    }
}

fn timings_json(timings: &Timings) -> Value {
    let mut object = serde_json::Map::new();
    for model in HardwareModel::ALL {
        let timing = timings.get(model);
        object.insert(
            model.as_str().to_string(),
            json!([timing.taken, timing.not_taken]),
        );
    }
    Value::Object(object)
}

fn total_json(total: &TotalTiming<'_>) -> Value {
    json!({
        "name": total.name,
        "icon": total.icon,
        "timings": timings_json(&total.timings),
    })
}

fn report_json(meter: &Meter, parsed: Option<&Meterable>) -> Value {
    let platform = meter.config().platform;
    let Some(root) = parsed else {
        return json!({
            "platform": platform.as_str(),
            "recognized": false,
        });
    };
    let totals = meter.totals(root);
    json!({
        "platform": platform.as_str(),
        "primary": platform.primary_model().as_str(),
        "recognized": true,
        "instructions": root.leaf_count(),
        "size": root.size(),
        "bytes": root.bytes(),
        "timings": timings_json(&root.timings()),
        "total": total_json(&totals.default),
        "executionFlow": totals.execution_flow.as_ref().map(total_json),
        "atExit": totals.at_exit.as_ref().map(total_json),
        "best": total_json(totals.best()),
    })
}

fn report_text(meter: &Meter, parsed: Option<&Meterable>) -> String {
    let Some(root) = parsed else {
        return "no instructions recognized\n".to_string();
    };
    let primary = meter.config().platform.primary_model();
    let totals = meter.totals(root);
    let mut out = String::new();
    for model in HardwareModel::ALL {
        let marker = if model == primary { "*" } else { " " };
        out.push_str(&format!(
            "{marker}{:<4} {} {}\n",
            model.as_str(),
            root.timings().get(model),
            model.unit()
        ));
    }
    out.push_str(&format!("size  {} bytes\n", root.size()));
    out.push_str(&format!("bytes {}\n", root.bytes().join(" ")));
    let best = totals.best();
    out.push_str(&format!("{}: {}\n", best.name, best.timings.get(primary)));
    out
}
