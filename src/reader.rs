use std::future::Future;
use std::io::SeekFrom;
use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::chunk::ChunkDescriptor;
use crate::error::HashError;

/// Resolves chunk descriptors into bytes.
pub trait ChunkReader {
    fn read(&mut self, chunk: &ChunkDescriptor) -> impl Future<Output = Result<Vec<u8>, HashError>> + Send;
}

/// Reads chunk ranges from a file on disk. The file is opened on first use.
#[derive(Debug)]
pub struct FileChunkReader {
    path: PathBuf,
    file: Option<File>,
}

impl FileChunkReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileChunkReader { path: path.into(), file: None }
    }

    async fn read_range(&mut self, chunk: &ChunkDescriptor) -> std::io::Result<Vec<u8>> {
        let mut file = match self.file.take() {
            Some(file) => file,
            None => File::open(&self.path).await?,
        };
        let buf = read_at(&mut file, chunk).await;
        self.file = Some(file);
        buf
    }
}

async fn read_at(file: &mut File, chunk: &ChunkDescriptor) -> std::io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(chunk.range.start)).await?;
    let mut buf = vec![0u8; chunk.len() as usize];
    // A file that shrank since partitioning fails here with UnexpectedEof.
    file.read_exact(&mut buf).await?;
    Ok(buf)
}

impl ChunkReader for FileChunkReader {
    async fn read(&mut self, chunk: &ChunkDescriptor) -> Result<Vec<u8>, HashError> {
        self.read_range(chunk).await.map_err(|e| HashError::io(chunk.index, e))
    }
}

/// In-memory reader for tests; can be told to fail on one chunk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryReader {
    pub data: Vec<u8>,
    pub fail_at: Option<usize>,
    pub reads: Vec<usize>,
}

#[cfg(test)]
impl MemoryReader {
    pub fn new(data: Vec<u8>) -> Self {
        MemoryReader { data, ..Default::default() }
    }
}

#[cfg(test)]
impl ChunkReader for MemoryReader {
    async fn read(&mut self, chunk: &ChunkDescriptor) -> Result<Vec<u8>, HashError> {
        self.reads.push(chunk.index);
        if self.fail_at == Some(chunk.index) {
            let e = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "simulated read failure");
            return Err(HashError::io(chunk.index, e));
        }
        Ok(self.data[chunk.range.start as usize..chunk.range.end as usize].to_vec())
    }
}
