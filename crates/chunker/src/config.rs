use serde::{Deserialize, Serialize};

/// Default chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// Configuration for splitting a file into fixed-size chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Size of every chunk in bytes (only the last chunk may be shorter)
    pub chunk_size: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ChunkerConfig {
    /// Create config with an explicit chunk size (mostly useful in tests to
    /// force many chunk boundaries over small inputs)
    #[must_use]
    pub const fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be > 0".to_string());
        }
        Ok(())
    }

    /// Number of chunks a file of `len` bytes splits into
    #[must_use]
    pub const fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }
}
