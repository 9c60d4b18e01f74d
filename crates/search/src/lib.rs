//! # Fencepost Search
//!
//! Whole-word, case-insensitive search with surrounding context over a file
//! held as fixed-size chunks, scanned in parallel.
//!
//! ```text
//! TextIndex::build(path)            once per file, read-only afterwards
//!     │
//! TextIndex::search(word, width)    once per query
//!     ├──> FenceAssembler   chunks + fresh fences → BufferSet
//!     ├──> rayon fork-join, one task per buffer
//!     │    ├─> WordMatcher       literal hits, whole-word check
//!     │    └─> ContextExtractor  `width` words each side
//!     └──> ResultAggregator  buffer order, dedup by absolute span
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fencepost_search::{IndexConfig, TextIndex};
//!
//! let text = b"They lacked nothing, there was nothing they lacked.";
//! let index = TextIndex::from_bytes(text, &IndexConfig::default()).unwrap();
//!
//! let results = index.search("LACKED", 1).unwrap();
//! assert_eq!(results, vec!["They lacked nothing,", "they lacked."]);
//! ```

mod aggregate;
mod config;
mod context;
mod error;
mod fence;
mod index;
mod matcher;

pub use aggregate::{AbsoluteSpan, Hit, Match, ResultAggregator};
pub use config::{ByteSet, IndexConfig, SearchConfig, DEFAULT_MAX_WORD_BYTES};
pub use context::{ContextExtractor, ContextSide};
pub use error::{Result, SearchError};
pub use fence::{Buffer, BufferKind, BufferSet, FenceAssembler};
pub use index::TextIndex;
pub use matcher::{Candidate, Verdict, WordMatcher};

pub use fencepost_chunker::{Chunk, ChunkerConfig};
