// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde_json::json;

use z80meter::cli::{build_config, render_report, Cli, OutputFormat};
use z80meter::core::hint::HintMode;
use z80meter::core::total::{at_exit_total, execution_flow_total, TotalKind};
use z80meter::{Config, Meter, Meterable, Platform, SourceLine, Syntax, Timing, Timings};

fn unique_temp_dir() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_micros();
    let dir = std::env::temp_dir().join(format!("z80meter-it-{now}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn lines(texts: &[&str]) -> Vec<SourceLine> {
    texts.iter().map(|text| SourceLine::new(text)).collect()
}

#[test]
fn immediate_load_is_one_leaf() {
    let meter = Meter::default();
    let m = meter.parse_instruction("LD A,5").expect("recognized");
    assert!(matches!(m, Meterable::Instruction(_)));
    assert_eq!(m.size(), 2);
    assert_eq!(m.bytes(), vec!["3E", "n"]);
    assert_eq!(m.timings().z80, Timing::single(7));
    assert_eq!(m.timings().msx, Timing::single(8));
}

#[test]
fn register_template_adds_register_code() {
    let meter = Meter::default();
    let m = meter.parse_instruction("RLC B").expect("recognized");
    assert_eq!(m.bytes(), vec!["CB", "00"]);
    let m = meter.parse_instruction("RLC A").expect("recognized");
    assert_eq!(m.bytes(), vec!["CB", "07"]);
}

#[test]
fn byte_list_directive() {
    let meter = Meter::default();
    let m = meter.parse_instruction("DEFB 1,2,3").expect("recognized");
    assert_eq!(m.size(), 3);
    assert_eq!(m.bytes(), vec!["01", "02", "03"]);
    assert_eq!(m.timings(), Timings::ZERO);
}

#[test]
fn repetition_block_multiplies_body() {
    let meter = Meter::default();
    let nop = meter.parse_instruction("NOP").expect("nop").timings();
    let m = meter
        .parse_lines(&lines(&["REPT 3", "NOP", "ENDR"]))
        .expect("recognized");
    assert_eq!(m.size(), 3);
    assert_eq!(m.timings(), nop.scaled(3));

    let sjasm = Meter::new(Config::default().with_syntax(Syntax::Sjasmplus));
    let m = sjasm
        .parse_text(" dup 2\n dup 3\n nop\n edup\n edup")
        .expect("recognized");
    assert_eq!(m.size(), 6);
    assert_eq!(m.timings(), nop.scaled(6));
}

#[test]
fn execution_flow_assumes_jumps_fall_through() {
    let meter = Meter::default();
    let m = meter
        .parse_lines(&lines(&["JP Z,L1", "NOP"]))
        .expect("recognized");
    let total = execution_flow_total(&m, &Config::default().execution_flow).expect("applies");
    assert_eq!(total.kind, TotalKind::ExecutionFlow);
    assert_eq!(total.timings.z80, Timing::single(14));
    assert_eq!(total.timings.msx, Timing::single(16));
    assert_eq!(total.timings.cpc, Timing::single(4));
}

#[test]
fn at_exit_takes_final_return() {
    let meter = Meter::default();
    let m = meter
        .parse_lines(&lines(&["RET Z", "RET"]))
        .expect("recognized");
    let total = at_exit_total(&m, &Config::default().at_exit).expect("applies");
    assert_eq!(total.name, "Timing to exit point (RET)");
    assert_eq!(total.icon, "debug-step-out");
    assert_eq!(total.timings.z80, Timing::single(15));
    assert_eq!(total.timings.msx, Timing::single(17));
}

#[test]
fn garbage_input_never_fails() {
    let meter = Meter::new(Config::default().with_syntax(Syntax::Sjasmplus));
    for text in [
        "",
        ";",
        ":::",
        "LD",
        "LD A,(",
        "LD (IX+",
        "\"unterminated",
        "REPT",
        "ENDR",
        "DS -1",
        "PUSH ,,",
        "JP !",
        "DB '",
    ] {
        let _ = meter.parse_text(text);
        let _ = meter.parse_instruction(text);
    }
}

#[test]
fn oversized_input_saturates_instead_of_overflowing() {
    let meter = Meter::default();
    let source = " rept 65536\n rept 65536\n nop\n endr\n endr";
    let m = meter.parse_text(source).expect("recognized");
    assert_eq!(m.size(), 1usize << 32);
    assert_eq!(m.leaf_count(), 1usize << 32);
    assert_eq!(m.timings().z80, Timing::single(i32::MAX));
    assert_eq!(meter.totals(&m).default.timings.z80, Timing::single(i32::MAX));

    let report = render_report(&meter, source, OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&report).expect("json");
    assert_eq!(value["instructions"], json!(1u64 << 32));
    assert_eq!(value["bytes"].as_array().map(Vec::len), Some(0x10000));

    let mut config = Config::default();
    config.timing_hints = HintMode::Any;
    let hinted = Meter::new(config);
    let m = hinted
        .parse_text(" nop ; [z80=2147483647]")
        .expect("recognized");
    assert_eq!(m.timings().z80, Timing::single(i32::MAX));
    assert!(hinted.parse_text(" nop ; [z80=99999999999]").is_some());
}

#[test]
fn settings_drive_the_engine() {
    let settings = json!({
        "z80meter": {
            "platform": "zxnext",
            "syntax": "sjasmplus",
            "timingHints": "any",
            "macros": [
                { "name": "pause", "instructions": ["halt"], "ts": "1000" }
            ]
        }
    });
    let mut config = Config::default();
    config.update_from_settings(&settings).expect("settings");
    assert_eq!(config.platform, Platform::ZxNext);
    assert_eq!(config.timing_hints, HintMode::Any);

    let meter = Meter::new(config);
    let m = meter
        .parse_text(" mul d,e\n pause\n ld bc,de")
        .expect("recognized");
    assert_eq!(m.timings().z80, Timing::single(8 + 1000 + 8));
}

#[test]
fn cli_reads_settings_file() {
    let dir = unique_temp_dir();
    let path = dir.join("settings.json");
    fs::write(&path, r#"{"platform": "cpc", "directivesAsInstructions": true}"#)
        .expect("write settings");
    let cli = Cli::parse_from([
        "z80meter",
        "--config",
        path.to_str().expect("utf-8 path"),
        "--syntax",
        "glass",
    ]);
    let config = build_config(&cli).expect("config");
    assert_eq!(config.platform, Platform::Cpc);
    assert!(config.directives_as_instructions);
    assert_eq!(config.syntax, Syntax::Glass);
    assert!(!config.features.bracket_indirection);
}
