//! Splitting a file into fixed-size byte ranges.
//!
//! Partitioning only computes ranges; no bytes are read until a
//! [`ChunkReader`](crate::reader::ChunkReader) resolves a descriptor.

use std::num::NonZeroU64;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::HashError;

/// 2 MiB.
pub const DEFAULT_CHUNK_SIZE: NonZeroU64 = match NonZeroU64::new(2 * 1024 * 1024) {
    Some(size) => size,
    None => unreachable!(),
};

/// A selected file: where it lives, what it is called and how long it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    pub path: PathBuf,
    pub name: String,
    pub len: u64,
}

impl FileSource {
    pub async fn open(path: &Path) -> Result<Self, HashError> {
        let meta = tokio::fs::metadata(path).await.map_err(|e| HashError::io(0, e))?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(FileSource { path: path.to_path_buf(), name, len: meta.len() })
    }
}

/// A lazy view of one byte range of a [`FileSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub index: usize,
    pub range: Range<u64>,
    /// File name, identical on every chunk of one file.
    pub label: Arc<str>,
}

impl ChunkDescriptor {
    pub fn len(&self) -> u64 {
        self.range.end - self.range.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSequence {
    source: FileSource,
    chunks: Vec<ChunkDescriptor>,
}

impl ChunkSequence {
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChunkDescriptor> {
        self.chunks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkDescriptor> {
        self.chunks.iter()
    }

    pub fn total_bytes(&self) -> u64 {
        self.iter().map(ChunkDescriptor::len).sum()
    }
}

/// Cut `file` into `ceil(len / size)` consecutive ranges; the last may be short.
pub fn partition(file: &FileSource, size: NonZeroU64) -> ChunkSequence {
    let size = size.get();
    let label: Arc<str> = Arc::from(file.name.as_str());
    let mut chunks = Vec::with_capacity(file.len.div_ceil(size) as usize);

    let mut cur = 0u64;
    while cur < file.len {
        let end = cur.saturating_add(size).min(file.len);
        chunks.push(ChunkDescriptor { index: chunks.len(), range: cur..end, label: label.clone() });
        cur = end;
    }

    ChunkSequence { source: file.clone(), chunks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(len: u64) -> FileSource {
        FileSource { path: PathBuf::from("/tmp/data.bin"), name: "data.bin".to_string(), len }
    }

    fn size(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn empty_file_has_no_chunks() {
        let seq = partition(&source(0), DEFAULT_CHUNK_SIZE);
        assert!(seq.is_empty());
        assert_eq!(seq.total_bytes(), 0);
    }

    #[test]
    fn five_million_bytes_at_two_mib() {
        let seq = partition(&source(5_000_000), DEFAULT_CHUNK_SIZE);
        let lens: Vec<u64> = seq.iter().map(ChunkDescriptor::len).collect();
        assert_eq!(lens, vec![2_097_152, 2_097_152, 805_696]);
        assert_eq!(seq.total_bytes(), 5_000_000);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let seq = partition(&source(30), size(10));
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(2).unwrap().range, 20..30);
    }

    #[test]
    fn ranges_cover_file_in_order() {
        for len in [1u64, 7, 9, 10, 11, 99, 1000] {
            for s in [1u64, 3, 10, 64, 5000] {
                let seq = partition(&source(len), size(s));
                assert_eq!(seq.len() as u64, len.div_ceil(s), "len={len} size={s}");

                let mut expected_start = 0;
                for (i, chunk) in seq.iter().enumerate() {
                    assert_eq!(chunk.index, i);
                    assert_eq!(chunk.range.start, expected_start);
                    assert!(chunk.len() > 0 && chunk.len() <= s);
                    expected_start = chunk.range.end;
                }
                assert_eq!(expected_start, len);
            }
        }
    }

    #[test]
    fn partition_is_repeatable() {
        let file = source(12_345);
        assert_eq!(partition(&file, size(1000)), partition(&file, size(1000)));
    }

    #[test]
    fn every_chunk_carries_file_name() {
        let seq = partition(&source(25), size(10));
        assert!(seq.iter().all(|c| &*c.label == "data.bin"));
    }

    #[tokio::test]
    async fn open_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let file = FileSource::open(&path).await.unwrap();
        assert_eq!(file.name, "sample.txt");
        assert_eq!(file.len, 11);
    }

    #[tokio::test]
    async fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::open(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, HashError::Io { .. }));
    }
}
