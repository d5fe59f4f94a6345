//! Provenance sidecars for trace and comparison outputs.
//!
//! `trace.jsonl` gets a `trace.provenance.json` next to it recording the code
//! revision, the command and its parameters, and the point count actually used.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Sidecar document.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub crate_version: &'static str,
    pub command: &'static str,
    pub params: Value,
    pub point_count: usize,
    pub outputs: Vec<String>,
}

impl Provenance {
    pub fn new(command: &'static str, params: Value, point_count: usize) -> Self {
        Self {
            code_rev: current_git_rev(),
            crate_version: hulltrace::VERSION,
            command,
            params,
            point_count,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact-stem>.provenance.json` beside `artifact`.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut doc: Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    doc.outputs.push(artifact.to_string_lossy().into_owned());
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build-time, then run-time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
