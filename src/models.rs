use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    Md5,
    Blake3,
    Sha256,
    Sha512,
    Sha3_256,
}

impl Algorithm {
    pub fn all() -> Vec<Algorithm> {
        vec![Algorithm::Md5, Algorithm::Blake3, Algorithm::Sha256, Algorithm::Sha512, Algorithm::Sha3_256]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Blake3 => "BLAKE3",
            Algorithm::Sha256 => "SHA-256",
            Algorithm::Sha512 => "SHA-512",
            Algorithm::Sha3_256 => "SHA3-256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of one completed driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashResult {
    /// Always 100 once a result exists.
    pub percentage: u8,
    pub digest: String,
    pub algorithm: Algorithm,
    pub bytes: u64,
    pub chunks: usize,
}

/// Intermediate progress, emitted after each chunk has been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub chunk_index: usize,
    pub chunks_total: usize,
    pub bytes_hashed: u64,
    pub total_bytes: u64,
}

impl Progress {
    pub fn percentage(&self) -> f32 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        self.bytes_hashed as f32 / self.total_bytes as f32 * 100.0
    }
}

/// A finished hash as shown in the session history.
#[derive(Debug, Clone)]
pub struct HashRecord {
    pub file_name: String,
    pub file_path: PathBuf,
    pub result: HashResult,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
