//! Sequential hashing of a chunk sequence.
//!
//! The driver reads one chunk, appends it, then moves on to the next, so at
//! most one chunk's bytes are held at a time and the accumulator always sees
//! the file in byte order:
//!
//! ```text
//! Idle -> Reading(0) -> Appending(0) -> Reading(1) -> ... -> Appending(n-1) -> Finalizing -> Done
//!                  \__________________ any read error ________________________________/-> Failed
//! ```
//!
//! An empty sequence goes straight from `Idle` to `Finalizing`.

use futures::channel::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::accumulator::HashAccumulator;
use crate::chunk::ChunkSequence;
use crate::error::HashError;
use crate::models::{Algorithm, HashResult, Progress};
use crate::reader::ChunkReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Reading(usize),
    Appending(usize),
    Finalizing,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct HashDriver<R> {
    chunks: ChunkSequence,
    reader: R,
    accumulator: HashAccumulator,
    state: DriverState,
    progress: Option<UnboundedSender<Progress>>,
}

impl<R: ChunkReader> HashDriver<R> {
    pub fn new(chunks: ChunkSequence, reader: R, algorithm: Algorithm) -> Self {
        HashDriver {
            chunks,
            reader,
            accumulator: HashAccumulator::new(algorithm),
            state: DriverState::Idle,
            progress: None,
        }
    }

    /// Report a [`Progress`] after every appended chunk.
    pub fn with_progress(mut self, progress: UnboundedSender<Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    #[cfg(test)]
    pub fn accumulator(&self) -> &HashAccumulator {
        &self.accumulator
    }

    /// Hash every chunk in order. Only valid from `Idle`.
    pub async fn run(&mut self) -> Result<HashResult, HashError> {
        if self.state != DriverState::Idle {
            return Err(HashError::ContractViolation("driver already ran"));
        }

        let total = self.chunks.len();
        let total_bytes = self.chunks.total_bytes();
        info!(
            file = %self.chunks.source().name,
            bytes = total_bytes,
            chunks = total,
            algorithm = %self.accumulator.algorithm(),
            "hashing started"
        );

        let mut pending = Vec::new();
        loop {
            match self.state {
                DriverState::Idle => {
                    self.state = if self.chunks.is_empty() { DriverState::Finalizing } else { DriverState::Reading(0) };
                }
                DriverState::Reading(i) => {
                    let Some(chunk) = self.chunks.get(i) else {
                        self.state = DriverState::Failed;
                        return Err(HashError::ContractViolation("chunk index out of range"));
                    };
                    match self.reader.read(chunk).await {
                        Ok(bytes) => {
                            debug!(chunk = i, label = %chunk.label, start = chunk.range.start, len = bytes.len(), "chunk read");
                            pending = bytes;
                            self.state = DriverState::Appending(i);
                        }
                        Err(e) => {
                            self.state = DriverState::Failed;
                            return Err(e);
                        }
                    }
                }
                DriverState::Appending(i) => {
                    if let Err(e) = self.accumulator.append(&pending) {
                        self.state = DriverState::Failed;
                        return Err(e);
                    }
                    pending = Vec::new();
                    self.report(Progress {
                        chunk_index: i,
                        chunks_total: total,
                        bytes_hashed: self.accumulator.bytes_appended(),
                        total_bytes,
                    });
                    self.state = if i + 1 < total { DriverState::Reading(i + 1) } else { DriverState::Finalizing };
                }
                DriverState::Finalizing => {
                    let digest = match self.accumulator.finalize() {
                        Ok(digest) => digest,
                        Err(e) => {
                            self.state = DriverState::Failed;
                            return Err(e);
                        }
                    };
                    self.state = DriverState::Done;
                    info!(file = %self.chunks.source().name, %digest, "hashing finished");
                    return Ok(HashResult {
                        percentage: 100,
                        digest,
                        algorithm: self.accumulator.algorithm(),
                        bytes: self.accumulator.bytes_appended(),
                        chunks: total,
                    });
                }
                DriverState::Done | DriverState::Failed => {
                    return Err(HashError::ContractViolation("driver already ran"));
                }
            }
        }
    }

    fn report(&mut self, progress: Progress) {
        if let Some(tx) = &self.progress {
            // Receiver gone means nobody is watching anymore.
            if tx.unbounded_send(progress).is_err() {
                self.progress = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{partition, FileSource};
    use crate::reader::MemoryReader;
    use futures::StreamExt;
    use std::num::NonZeroU64;
    use std::path::PathBuf;

    fn driver_for(data: Vec<u8>, size: u64) -> HashDriver<MemoryReader> {
        let file = FileSource { path: PathBuf::from("mem"), name: "mem".to_string(), len: data.len() as u64 };
        let seq = partition(&file, NonZeroU64::new(size).unwrap());
        HashDriver::new(seq, MemoryReader::new(data), Algorithm::Md5)
    }

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn empty_sequence_finalizes() {
        let mut driver = driver_for(Vec::new(), 16);
        let result = driver.run().await.unwrap();
        assert_eq!(result.digest, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(result.percentage, 100);
        assert_eq!(result.chunks, 0);
        assert_eq!(driver.state(), DriverState::Done);
        assert!(driver.reader.reads.is_empty());
    }

    #[tokio::test]
    async fn five_million_bytes() {
        let data = sample(5_000_000);
        let mut driver = driver_for(data, 2 * 1024 * 1024);
        let result = driver.run().await.unwrap();

        assert_eq!(result.chunks, 3);
        assert_eq!(result.bytes, 5_000_000);
        assert_eq!(result.digest, "a8611d88248b7e7558e93900b2997d3b");
        assert_eq!(driver.reader.reads, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn chunked_digest_matches_whole_file() {
        let data = sample(10_007);
        let expected = format!("{:x}", md5::compute(&data));
        for size in [1u64, 100, 4096, 10_007, 20_000] {
            let mut driver = driver_for(data.clone(), size);
            assert_eq!(driver.run().await.unwrap().digest, expected, "size={size}");
        }
    }

    #[tokio::test]
    async fn read_failure_aborts_without_digest() {
        let mut driver = driver_for(sample(30), 10);
        driver.reader.fail_at = Some(1);

        let err = driver.run().await.unwrap_err();
        assert!(matches!(err, HashError::Io { chunk: 1, .. }));
        assert_eq!(driver.state(), DriverState::Failed);
        assert!(!driver.accumulator().is_finalized());
        assert_eq!(driver.accumulator().bytes_appended(), 10);
        // chunk 2 is never touched
        assert_eq!(driver.reader.reads, vec![0, 1]);
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let mut driver = driver_for(sample(5), 2);
        driver.run().await.unwrap();
        assert!(matches!(driver.run().await, Err(HashError::ContractViolation(_))));
    }

    #[tokio::test]
    async fn reports_progress_per_chunk() {
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let mut driver = driver_for(sample(25), 10).with_progress(tx);
        driver.run().await.unwrap();
        drop(driver);

        let seen: Vec<Progress> = rx.collect().await;
        let hashed: Vec<u64> = seen.iter().map(|p| p.bytes_hashed).collect();
        assert_eq!(hashed, vec![10, 20, 25]);
        assert!(seen.iter().all(|p| p.chunks_total == 3 && p.total_bytes == 25));
        assert_eq!(seen.last().unwrap().percentage(), 100.0);
    }

    #[tokio::test]
    async fn same_input_same_digest() {
        let a = driver_for(sample(777), 64).run().await.unwrap();
        let b = driver_for(sample(777), 64).run().await.unwrap();
        assert_eq!(a, b);
    }
}
