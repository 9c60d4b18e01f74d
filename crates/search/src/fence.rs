//! Fence assembly.
//!
//! A fence is a fresh copy of `tail(chunkᵢ) ++ head(chunkᵢ₊₁)`, wide enough that
//! any match crossing the boundary, together with its context, is visible in a
//! single buffer. Fences are built per query and interleaved with the borrowed
//! chunks:
//!
//! ```text
//! [chunk₀] [fence₀] [chunk₁] [fence₁] … [chunkₙ₋₁]
//!      └──tail──┘└──head──┘
//! ```

use std::borrow::Cow;

use fencepost_chunker::ChunkedFile;

/// Where a buffer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Chunk(usize),
    /// Fence between chunk `i` and chunk `i + 1`
    Fence(usize),
}

/// One unit of parallel work
#[derive(Debug, Clone)]
pub struct Buffer<'a> {
    pub kind: BufferKind,
    /// File offset of `bytes[0]`
    pub offset: usize,
    pub bytes: Cow<'a, [u8]>,
    /// Total length of the file this buffer belongs to
    pub file_len: usize,
}

impl Buffer<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether `bytes[0]` is the first byte of the file
    #[must_use]
    pub const fn starts_file(&self) -> bool {
        self.offset == 0
    }

    /// Whether the last byte is the last byte of the file
    #[must_use]
    pub fn ends_file(&self) -> bool {
        self.offset + self.bytes.len() == self.file_len
    }
}

/// Interleaved chunks and fences for a single query
///
/// Invariant: `buffers[2i]` is chunk `i`, `buffers[2i + 1]` is the fence between
/// chunks `i` and `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct BufferSet<'a> {
    buffers: Vec<Buffer<'a>>,
}

impl<'a> BufferSet<'a> {
    #[must_use]
    pub fn buffers(&self) -> &[Buffer<'a>] {
        &self.buffers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

/// Builds the per-query [`BufferSet`]
///
/// Fences are deliberately wider than `context_width * max_word_bytes` per
/// side; see [`FenceAssembler::new`].
#[derive(Debug, Clone, Copy)]
pub struct FenceAssembler {
    half_width: usize,
}

impl FenceAssembler {
    /// Fence sized for `context_width` words of at most `max_word_bytes` each
    /// around a term of `term_len` bytes.
    ///
    /// Each side takes `2 * reach + term_len + 1` bytes where
    /// `reach = context_width * max_word_bytes`: a match whose context is cut by
    /// a chunk edge then sits in the fence with full reach on both sides, and
    /// the neighbour bytes needed for whole-word checks are always present.
    #[must_use]
    pub fn new(context_width: usize, max_word_bytes: usize, term_len: usize) -> Self {
        let reach = context_width.saturating_mul(max_word_bytes);
        Self {
            half_width: reach
                .saturating_mul(2)
                .saturating_add(term_len)
                .saturating_add(1),
        }
    }

    /// Bytes taken from each neighbouring chunk (before clamping)
    #[must_use]
    pub const fn half_width(&self) -> usize {
        self.half_width
    }

    /// Interleave borrowed chunks with freshly allocated fences
    #[must_use]
    pub fn assemble<'a>(&self, file: &'a ChunkedFile) -> BufferSet<'a> {
        let chunks = file.chunks();
        let file_len = file.len();
        let mut buffers = Vec::with_capacity((chunks.len() * 2).saturating_sub(1));

        for (i, chunk) in chunks.iter().enumerate() {
            buffers.push(Buffer {
                kind: BufferKind::Chunk(i),
                offset: chunk.offset,
                bytes: Cow::Borrowed(chunk.bytes()),
                file_len,
            });

            let Some(next) = chunks.get(i + 1) else {
                continue;
            };

            let left = chunk.tail(self.half_width);
            let right = next.head(self.half_width);
            let mut fence = Vec::with_capacity(left.len() + right.len());
            fence.extend_from_slice(left);
            fence.extend_from_slice(right);

            buffers.push(Buffer {
                kind: BufferKind::Fence(i),
                offset: chunk.end() - left.len(),
                bytes: Cow::Owned(fence),
                file_len,
            });
        }

        BufferSet { buffers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencepost_chunker::{Chunker, ChunkerConfig};
    use pretty_assertions::assert_eq;

    fn chunked(input: &[u8], size: usize) -> ChunkedFile {
        Chunker::new(ChunkerConfig::with_chunk_size(size))
            .unwrap()
            .chunk_bytes(input)
            .unwrap()
    }

    #[test]
    fn test_half_width() {
        assert_eq!(FenceAssembler::new(4, 20, 6).half_width(), 167);
        assert_eq!(FenceAssembler::new(0, 20, 6).half_width(), 7);
    }

    #[test]
    fn test_interleaving_layout() {
        let file = chunked(b"aaaabbbbccccdd", 4);
        let set = FenceAssembler::new(0, 20, 1).assemble(&file);

        assert_eq!(set.len(), 2 * file.chunk_count() - 1);
        let kinds: Vec<BufferKind> = set.buffers().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BufferKind::Chunk(0),
                BufferKind::Fence(0),
                BufferKind::Chunk(1),
                BufferKind::Fence(1),
                BufferKind::Chunk(2),
                BufferKind::Fence(2),
                BufferKind::Chunk(3),
            ]
        );
        for (i, chunk) in file.chunks().iter().enumerate() {
            assert_eq!(set.buffers()[2 * i].bytes.as_ref(), chunk.bytes());
        }
    }

    #[test]
    fn test_fence_contents_and_offset() {
        let file = chunked(b"aaaabbbbcc", 4);
        let set = FenceAssembler::new(0, 20, 1).assemble(&file);

        let fence = &set.buffers()[1];
        assert_eq!(fence.bytes.as_ref(), b"aabb");
        assert_eq!(fence.offset, 2);

        let last_fence = &set.buffers()[3];
        assert_eq!(last_fence.bytes.as_ref(), b"bbcc");
        assert_eq!(last_fence.offset, 6);
        assert!(last_fence.ends_file());
    }

    #[test]
    fn test_fence_clamps_to_short_neighbours() {
        let file = chunked(b"abcdefghij", 4);
        let set = FenceAssembler::new(2, 20, 3).assemble(&file);

        assert_eq!(set.buffers()[1].bytes.as_ref(), b"abcdefgh");
        assert_eq!(set.buffers()[1].offset, 0);
        assert!(set.buffers()[1].starts_file());
        assert_eq!(set.buffers()[3].bytes.as_ref(), b"efghij");
    }

    #[test]
    fn test_fences_are_owned_copies() {
        let file = chunked(b"aaaabbbb", 4);
        let set = FenceAssembler::new(1, 2, 1).assemble(&file);
        assert!(matches!(set.buffers()[0].bytes, Cow::Borrowed(_)));
        assert!(matches!(set.buffers()[1].bytes, Cow::Owned(_)));
    }

    #[test]
    fn test_single_and_empty_files() {
        let file = chunked(b"abc", 4);
        assert_eq!(FenceAssembler::new(3, 20, 1).assemble(&file).len(), 1);

        let empty = chunked(b"", 4);
        assert!(FenceAssembler::new(3, 20, 1).assemble(&empty).is_empty());
    }
}
