//! Run file loading.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;

/// Which 2-D engine runs the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Serial,
    #[default]
    Parallel,
}

/// Settings read from a run file. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunFile {
    pub width: usize,
    pub height: usize,
    pub pattern: Pattern,
    pub seed: u64,
    pub engine: Engine,
    /// 0 uses the available parallelism.
    pub workers: usize,
    pub recenter: bool,
    pub roundtrip: bool,
    pub timeout_ms: Option<u64>,
    /// Worker counts checked by `compare`.
    pub compare_workers: Vec<usize>,
    pub tolerance: f64,
}

impl Default for RunFile {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            pattern: Pattern::Square,
            seed: 1,
            engine: Engine::Parallel,
            workers: 0,
            recenter: false,
            roundtrip: false,
            timeout_ms: None,
            compare_workers: vec![1, 2, 4, 8],
            tolerance: 1e-6,
        }
    }
}

/// Loads a run file, or the defaults when no path is given.
pub fn load_run_file(path: Option<&Path>) -> Result<RunFile> {
    let Some(path) = path else {
        return Ok(RunFile::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read run file {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let file = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(file)
}
