use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use chrono::Utc;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::stream::{self, Stream, StreamExt};

use crate::chunk::{partition, FileSource};
use crate::driver::HashDriver;
use crate::error::HashError;
use crate::models::{Algorithm, HashRecord, Progress};
use crate::offload::run_offloaded;
use crate::reader::FileChunkReader;

#[derive(Debug, Clone)]
pub enum HashEvent {
    Progress(Progress),
    Finished(Result<HashRecord, String>),
}

/// Hash the file at `path` chunk by chunk in the background.
pub async fn hash_file(
    path: &Path,
    algorithm: Algorithm,
    chunk_size: NonZeroU64,
    progress: Option<UnboundedSender<Progress>>,
) -> Result<HashRecord, HashError> {
    let source = FileSource::open(path).await?;
    let chunks = partition(&source, chunk_size);

    let mut driver = HashDriver::new(chunks, FileChunkReader::new(path), algorithm);
    if let Some(tx) = progress {
        driver = driver.with_progress(tx);
    }
    let result = run_offloaded(driver).await?;

    Ok(HashRecord {
        file_name: source.name,
        file_path: source.path,
        result,
        timestamp: Utc::now(),
    })
}

/// [`hash_file`] as a stream of progress updates ending in `Finished`.
///
/// A few progress events may still trail the `Finished` event.
pub fn hash_file_events(path: PathBuf, algorithm: Algorithm, chunk_size: NonZeroU64) -> impl Stream<Item = HashEvent> {
    let (tx, rx) = mpsc::unbounded();
    let finished = stream::once(async move {
        let res = hash_file(&path, algorithm, chunk_size, Some(tx)).await;
        HashEvent::Finished(res.map_err(|e| e.to_string()))
    });
    stream::select(rx.map(HashEvent::Progress), finished)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn hashes_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let data: Vec<u8> = (0..5_000_000usize).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let rec = hash_file(&path, Algorithm::Md5, crate::chunk::DEFAULT_CHUNK_SIZE, None).await.unwrap();
        assert_eq!(rec.file_name, "big.bin");
        assert_eq!(rec.result.chunks, 3);
        assert_eq!(rec.result.digest, "a8611d88248b7e7558e93900b2997d3b");

        let again = hash_file(&path, Algorithm::Md5, size(1 << 20), None).await.unwrap();
        assert_eq!(again.result.digest, rec.result.digest);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_file_has_empty_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        let rec = hash_file(&path, Algorithm::Md5, size(16), None).await.unwrap();
        assert_eq!(rec.result.digest, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(rec.result.percentage, 100);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = hash_file(&dir.path().join("missing"), Algorithm::Md5, size(16), None).await.unwrap_err();
        assert!(matches!(err, HashError::Io { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn events_end_with_finished() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"hello world").unwrap();

        let events: Vec<HashEvent> = hash_file_events(path, Algorithm::Md5, size(4)).collect().await;

        let progress = events.iter().filter(|e| matches!(e, HashEvent::Progress(_))).count();
        assert_eq!(progress, 3);

        let finished: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                HashEvent::Finished(res) => Some(res.clone()),
                HashEvent::Progress(_) => None,
            })
            .collect();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].as_ref().unwrap().result.digest, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn events_carry_errors_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let events: Vec<HashEvent> =
            hash_file_events(dir.path().join("missing"), Algorithm::Md5, size(4)).collect().await;
        assert!(matches!(events.as_slice(), [HashEvent::Finished(Err(msg))] if msg.contains("failed to read")));
    }
}
