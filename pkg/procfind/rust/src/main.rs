// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dd_procfind::{ProcFs, ProcessEntry, ProcessTable, config, find_process_ids};
use log::{debug, info};
use serde::Serialize;
use simple_logger::SimpleLogger;

mod cli;

use cli::Args;

/// Exit status when no process matched, same as pidof.
const EXIT_NO_MATCH: u8 = 1;
/// Exit status when the process table or the configuration couldn't be read.
const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Serialize)]
struct QueryOutput<'a> {
    names: &'a [String],
    pids: &'a [i32],
}

/// Looks up every name and merges the results, keeping the first occurrence
/// of each PID.
fn query(table: &impl ProcessTable, names: &[String], omitted: &[i32]) -> Result<Vec<i32>> {
    let mut pids = Vec::new();

    for name in names {
        let found = find_process_ids(table, name)
            .with_context(|| format!("Failed to look up processes named {name}"))?;

        for pid in found {
            if !omitted.contains(&pid) && !pids.contains(&pid) {
                pids.push(pid);
            }
        }
    }

    Ok(pids)
}

#[allow(clippy::print_stdout)]
fn print_pids(names: &[String], pids: &[i32], json: bool) -> Result<()> {
    if json {
        let output = QueryOutput { names, pids };
        println!("{}", serde_json::to_string(&output)?);
    } else if !pids.is_empty() {
        let line: Vec<String> = pids.iter().map(|pid| pid.to_string()).collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_entries(entries: &[ProcessEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(entries)?);
    } else {
        for entry in entries {
            println!("{} {}", entry.pid, entry.exe.display());
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<ExitCode> {
    let config_path = args
        .config
        .as_deref()
        .unwrap_or(Path::new(config::DEFAULT_CONFIG_PATH));
    let config = config::load_config(Some(config_path))?;
    let log_level = config::get_log_level(&config);
    SimpleLogger::new().with_level(log_level).init()?;

    if !config_path.exists() {
        debug!(
            "Config file not found at {}. Checking environment variables only.",
            config_path.display()
        );
    }

    let table = ProcFs::new(config::get_proc_root(args.proc_root, &config));
    debug!("Scanning process table at {}", table.root().display());

    if args.list {
        let entries = table.entries().context("Failed to list processes")?;
        info!("Listed {} processes", entries.len());
        print_entries(&entries, args.json)?;
        return Ok(ExitCode::SUCCESS);
    }

    let omitted: Vec<i32> = args.omit.iter().filter_map(|omit| omit.resolve()).collect();
    let mut pids = query(&table, &args.names, &omitted)?;
    if args.single {
        pids.truncate(1);
    }

    print_pids(&args.names, &pids, args.json)?;

    if pids.is_empty() {
        Ok(ExitCode::from(EXIT_NO_MATCH))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let args = Args::parse();

    run(args).unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        ExitCode::from(EXIT_FAILURE)
    })
}
