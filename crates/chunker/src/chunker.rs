use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::types::{Chunk, ChunkedFile};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads files into ordered fixed-size chunks
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Open `path`, stat it, and read the whole file into chunks
    pub fn chunk_file(&self, path: impl AsRef<Path>) -> Result<ChunkedFile> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        let len = usize::try_from(size).map_err(|_| ChunkerError::FileTooLarge(size))?;

        let reader = BufReader::with_capacity(self.config.chunk_size, file);
        let chunked = self.chunk_reader(reader, len)?;
        log::debug!(
            "Read {} into {} chunks ({} bytes, chunk_size={})",
            path.display(),
            chunked.chunk_count(),
            chunked.len(),
            self.config.chunk_size
        );
        Ok(chunked)
    }

    /// Read exactly `len` bytes from `reader` into chunks
    ///
    /// Every chunk is `chunk_size` bytes except possibly the last one. A reader
    /// that runs dry before `len` bytes fails the whole read; no partial result
    /// is returned.
    pub fn chunk_reader<R: Read>(&self, mut reader: R, len: usize) -> Result<ChunkedFile> {
        let chunk_size = self.config.chunk_size;
        let count = self.config.chunk_count(len);
        let mut chunks = Vec::with_capacity(count);

        let mut offset = 0;
        for index in 0..count {
            let size = chunk_size.min(len - offset);
            let mut data = Vec::with_capacity(size);
            reader.by_ref().take(size as u64).read_to_end(&mut data)?;
            if data.len() < size {
                return Err(ChunkerError::ShortRead {
                    expected: len,
                    actual: offset + data.len(),
                });
            }

            chunks.push(Chunk::new(index, offset, data));
            offset += size;
        }

        Ok(ChunkedFile::from_chunks(chunks))
    }

    /// Chunk an in-memory byte slice
    pub fn chunk_bytes(&self, bytes: &[u8]) -> Result<ChunkedFile> {
        self.chunk_reader(bytes, bytes.len())
    }
}
