// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Fake process tables for tests
#![allow(clippy::unwrap_used)]

use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::errors::{Error, Result};
use crate::procfs::ProcessTable;

/// A procfs-like directory tree in a temporary directory.
///
/// Each process is a `<pid>/` directory holding an `exe` symbolic link. The
/// link targets don't need to exist since only the link itself is read.
pub struct FakeProcRoot {
    temp_dir: TempDir,
}

impl FakeProcRoot {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn process(self, pid: i32, exe: &str) -> Self {
        let dir = self.path().join(pid.to_string());
        std::fs::create_dir(&dir).unwrap();
        symlink(exe, dir.join("exe")).unwrap();
        self
    }

    /// A process directory without an `exe` link, as seen for kernel threads
    /// or a process which exited mid-scan.
    pub fn process_without_exe(self, pid: i32) -> Self {
        std::fs::create_dir(self.path().join(pid.to_string())).unwrap();
        self
    }

    pub fn file(self, name: &str) -> Self {
        std::fs::write(self.path().join(name), "").unwrap();
        self
    }

    pub fn dir(self, name: &str) -> Self {
        std::fs::create_dir(self.path().join(name)).unwrap();
        self
    }

    pub fn link(self, name: &str, target: &str) -> Self {
        symlink(target, self.path().join(name)).unwrap();
        self
    }
}

/// An in-memory process table.
#[derive(Default)]
pub struct FakeProcessTable {
    processes: Vec<(i32, Option<PathBuf>)>,
    unlistable: bool,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(mut self, pid: i32, exe: &str) -> Self {
        self.processes.push((pid, Some(PathBuf::from(exe))));
        self
    }

    /// A process which is listed but whose executable can't be resolved.
    pub fn exited(mut self, pid: i32) -> Self {
        self.processes.push((pid, None));
        self
    }

    /// Makes listing the table fail with a permission error.
    pub fn unlistable(mut self) -> Self {
        self.unlistable = true;
        self
    }
}

impl ProcessTable for FakeProcessTable {
    fn pids(&self) -> Result<Vec<i32>> {
        if self.unlistable {
            return Err(Error::Enumeration {
                root: PathBuf::from("/fake/proc"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }
        Ok(self.processes.iter().map(|(pid, _)| *pid).collect())
    }

    fn exe(&self, pid: i32) -> io::Result<PathBuf> {
        self.processes
            .iter()
            .find(|(p, _)| *p == pid)
            .and_then(|(_, exe)| exe.clone())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}
