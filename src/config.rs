use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::num::NonZeroU64;
use std::path::Path;

use crate::chunk::DEFAULT_CHUNK_SIZE;
use crate::models::Algorithm;

const CONFIG_FILE: &str = "chunkhash.json";

/// User settings, read from `chunkhash.json` in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Bytes per chunk.
    pub chunk_size: NonZeroU64,
    /// Algorithm selected at startup.
    pub algorithm: Algorithm,
}

impl Default for Settings {
    fn default() -> Self {
        Settings { chunk_size: DEFAULT_CHUNK_SIZE, algorithm: Algorithm::Md5 }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
