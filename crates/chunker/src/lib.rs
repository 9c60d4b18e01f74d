//! # Fencepost Chunker
//!
//! Splits a file into an ordered sequence of fixed-size, immutable byte chunks.
//!
//! ```text
//! file ──> [chunk₀: C bytes][chunk₁: C bytes] … [chunkₙ₋₁: ≤ C bytes]
//! ```
//!
//! Chunks are read once, cover the file with no gaps or overlaps, and are never
//! mutated afterwards, so they can be shared freely between concurrent readers.
//!
//! ## Example
//!
//! ```rust
//! use fencepost_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::with_chunk_size(4)).unwrap();
//! let file = chunker.chunk_bytes(b"hello world").unwrap();
//!
//! assert_eq!(file.chunk_count(), 3);
//! assert_eq!(file.chunks()[2].bytes(), b"rld");
//! ```

mod chunker;
mod config;
mod error;
mod types;

pub use chunker::Chunker;
pub use config::{ChunkerConfig, DEFAULT_CHUNK_SIZE};
pub use error::{ChunkerError, Result};
pub use types::{Chunk, ChunkedFile};
