// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use anyhow::{Context, Result};
use log::LevelFilter;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use yaml_rust2::{Yaml, YamlLoader};

use crate::procfs;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/procfind/procfind.yaml";

/// Loads the YAML config file if it exists
pub fn load_config(config_path: Option<&Path>) -> Result<Option<Yaml>> {
    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

    // A missing file is fine, env vars and defaults still apply. The caller
    // logs it since the logger isn't set up before the config is read.
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let docs = YamlLoader::load_from_str(&contents).context("Failed to parse YAML config")?;

    Ok(docs
        .into_iter()
        .next()
        .filter(|doc| !doc.is_null() && !doc.is_badvalue()))
}

/// Get string value from YAML, returning Option<String> instead of defaulting to empty string
/// This allows us to distinguish between an empty string and "not set"
fn get_yaml_string_option(doc: &Yaml, key: &str) -> Option<String> {
    let mut current = doc;
    for part in key.split('.') {
        current = &current[part];
        if current.is_badvalue() {
            return None;
        }
    }
    current.as_str().map(|s| s.to_string())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" | "critical" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}

/// Gets the log level from configuration.
/// Priority: DD_LOG_LEVEL > LOG_LEVEL > YAML config > default Warn
///
/// The default is quieter than a daemon would use since stdout carries the
/// query result.
pub fn get_log_level(config: &Option<Yaml>) -> LevelFilter {
    if let Ok(level) = env::var("DD_LOG_LEVEL") {
        return parse_log_level(&level);
    }

    if let Ok(level) = env::var("LOG_LEVEL") {
        return parse_log_level(&level);
    }

    config
        .as_ref()
        .and_then(|doc| get_yaml_string_option(doc, "log_level"))
        .map(|level| parse_log_level(&level))
        .unwrap_or(LevelFilter::Warn)
}

/// Gets the procfs root to scan.
/// Priority: command line > PROCFIND_PROC_ROOT > YAML config > host default
/// (HOST_PROC, containerized /host/proc, then /proc)
pub fn get_proc_root(cli_root: Option<PathBuf>, config: &Option<Yaml>) -> PathBuf {
    if let Some(root) = cli_root {
        return root;
    }

    if let Ok(root) = env::var("PROCFIND_PROC_ROOT") {
        return root.into();
    }

    if let Some(doc) = config
        && let Some(root) = get_yaml_string_option(doc, "proc_root")
    {
        return root.into();
    }

    procfs::root_path().to_path_buf()
}
