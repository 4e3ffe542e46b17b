// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rastertopdf — CUPS/PWG raster to PDF / PCLm filter.
//
// Entry point. Initialises logging on stderr (stdout carries the document),
// parses the arguments and runs the page loop.

mod cli;
mod pipeline;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use rasterpdf_core::error::Result;
use rasterpdf_core::human_errors::humanize_error;

use cli::Args;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match convert(&args) {
        Ok(pages) => {
            tracing::info!(pages, "rastertopdf finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, severity = ?human.severity, configuration = err.is_configuration(), "conversion failed");
            eprintln!("rastertopdf: {human}");
            ExitCode::FAILURE
        }
    }
}

fn convert(args: &Args) -> Result<usize> {
    let config = args.encoder_config()?;

    let input: Box<dyn Read> = match args.input_path() {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    pipeline::run(config, input, output)
}
