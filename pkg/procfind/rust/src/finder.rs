// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use log::debug;

use crate::errors::Result;
use crate::procfs::{ProcFs, ProcessTable};

/// Returns the PIDs of all processes in `table` whose executable basename is
/// `binary_name`, ignoring ASCII case.
///
/// PIDs are returned in the order the table enumerates them. Only a failure
/// to list the table itself is reported; processes which can't be inspected
/// are left out of the result.
pub fn find_process_ids<T: ProcessTable + ?Sized>(
    table: &T,
    binary_name: &str,
) -> Result<Vec<i32>> {
    let pids: Vec<i32> = table
        .entries()?
        .into_iter()
        .filter(|entry| entry.matches(binary_name))
        .map(|entry| entry.pid)
        .collect();

    debug!("Found {} process(es) named {binary_name:?}", pids.len());
    Ok(pids)
}

/// Same as [`find_process_ids`] against the host procfs.
pub fn find_process_ids_by_name(binary_name: &str) -> Result<Vec<i32>> {
    find_process_ids(&ProcFs::host(), binary_name)
}
