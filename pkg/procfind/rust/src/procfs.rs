// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Read-only access to the process table exposed under /proc.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::trace;
use serde::{Serialize, Serializer};

use crate::errors::{Error, Result};

static PROC_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Returns the procfs root of the host, resolved once per process.
pub fn root_path() -> &'static Path {
    PROC_ROOT.get_or_init(default_root)
}

fn default_root() -> PathBuf {
    if let Ok(v) = env::var("HOST_PROC") {
        return v.into();
    }

    if env::var("DOCKER_DD_AGENT").is_ok() && Path::new("/host").exists() {
        return "/host/proc".into();
    }

    "/proc".into()
}

/// Parses a procfs directory name as a PID.
///
/// Only plain ASCII decimal numerals naming a positive `i32` are accepted, so
/// entries such as `self`, `thread-self` or `+12` are rejected.
pub fn parse_pid(name: &str) -> Option<i32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse::<i32>().ok().filter(|pid| *pid > 0)
}

/// A live process observed during a scan, along with the executable image it
/// was launched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessEntry {
    pub pid: i32,
    #[serde(serialize_with = "serialize_path_lossy")]
    pub exe: PathBuf,
}

// Executable paths aren't guaranteed to be UTF-8, and a single odd path must
// not make the whole listing unserializable.
fn serialize_path_lossy<S: Serializer>(
    path: &Path,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

impl ProcessEntry {
    pub fn basename(&self) -> Option<&str> {
        self.exe.file_name().and_then(|name| name.to_str())
    }

    /// ASCII case-insensitive comparison of the executable basename.
    pub fn matches(&self, binary_name: &str) -> bool {
        self.basename()
            .is_some_and(|basename| basename.eq_ignore_ascii_case(binary_name))
    }
}

/// The OS-coupled primitives needed to scan processes.
pub trait ProcessTable {
    /// Lists the PIDs currently present in the table, in enumeration order.
    fn pids(&self) -> Result<Vec<i32>>;

    /// Resolves the executable image path of `pid`.
    fn exe(&self, pid: i32) -> std::io::Result<PathBuf>;

    /// Snapshot of every process whose executable could be resolved.
    ///
    /// Processes that exit between listing and resolution, or whose `exe`
    /// link is not readable, are skipped.
    fn entries(&self) -> Result<Vec<ProcessEntry>> {
        let entries = self
            .pids()?
            .into_iter()
            .filter_map(|pid| match self.exe(pid) {
                Ok(exe) => Some(ProcessEntry { pid, exe }),
                Err(e) => {
                    trace!("Skipping pid {pid}: could not resolve exe: {e}");
                    None
                }
            })
            .collect();

        Ok(entries)
    }
}

/// Process table backed by a procfs mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        ProcFs { root: root.into() }
    }

    /// The procfs of the host, see [`root_path`].
    pub fn host() -> Self {
        Self::new(root_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn enumeration_error(&self, source: std::io::Error) -> Error {
        Error::Enumeration {
            root: self.root.clone(),
            source,
        }
    }
}

impl ProcessTable for ProcFs {
    fn pids(&self) -> Result<Vec<i32>> {
        let mut pids = Vec::new();

        for entry in fs::read_dir(&self.root).map_err(|e| self.enumeration_error(e))? {
            let entry = entry.map_err(|e| self.enumeration_error(e))?;
            let name = entry.file_name();
            match name.to_str().and_then(parse_pid) {
                Some(pid) => pids.push(pid),
                None => trace!("Ignoring non-pid entry {name:?}"),
            }
        }

        Ok(pids)
    }

    fn exe(&self, pid: i32) -> std::io::Result<PathBuf> {
        fs::read_link(self.root.join(pid.to_string()).join("exe"))
    }
}
