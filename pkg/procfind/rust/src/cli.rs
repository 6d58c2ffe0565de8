// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "procfind")]
#[command(about = "Finds the PIDs of running programs by executable name", long_about = None)]
pub struct Args {
    /// Executable names to look for, compared case-insensitively
    #[arg(required_unless_present = "list")]
    pub names: Vec<String>,

    /// Only print the first matching PID
    #[arg(short, long)]
    pub single: bool,

    /// PIDs to leave out of the output; %PPID is the parent of this process
    #[arg(short, long = "omit", value_name = "PID")]
    pub omit: Vec<OmitPid>,

    /// Print every process whose executable could be resolved
    #[arg(short, long, conflicts_with_all = ["names", "single"])]
    pub list: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Procfs root to scan instead of the host one
    #[arg(long, value_name = "PATH")]
    pub proc_root: Option<PathBuf>,

    /// Path to the YAML config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmitPid {
    Pid(i32),
    Parent,
}

impl OmitPid {
    pub fn resolve(self) -> Option<i32> {
        match self {
            OmitPid::Pid(pid) => Some(pid),
            OmitPid::Parent => i32::try_from(std::os::unix::process::parent_id()).ok(),
        }
    }
}

impl FromStr for OmitPid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "%PPID" {
            return Ok(OmitPid::Parent);
        }
        dd_procfind::procfs::parse_pid(s)
            .map(OmitPid::Pid)
            .ok_or_else(|| format!("invalid pid: {s}"))
    }
}
