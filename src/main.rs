// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for z80meter.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use z80meter::cli::{build_config, read_input, render_report, Cli, CliError, OutputFormat};
use z80meter::parser::Meter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        tracing::error!("{err}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = build_config(cli)?;
    let source = read_input(cli)?;
    let meter = Meter::new(config);
    let report = render_report(&meter, &source, cli.format);
    if cli.format == OutputFormat::Json {
        println!("{report}");
    } else {
        print!("{report}");
    }
    Ok(())
}
