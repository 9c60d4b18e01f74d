/// An immutable byte span of the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the file's chunk sequence
    pub index: usize,

    /// Byte offset of the first byte in the file
    pub offset: usize,

    data: Vec<u8>,
}

impl Chunk {
    /// Create a new chunk
    #[must_use]
    pub const fn new(index: usize, offset: usize, data: Vec<u8>) -> Self {
        Self {
            index,
            offset,
            data,
        }
    }

    /// Raw bytes of the chunk
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset one past the last byte in the file
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.data.len()
    }

    /// Last `n` bytes, clamped to the chunk length
    #[must_use]
    pub fn tail(&self, n: usize) -> &[u8] {
        &self.data[self.data.len().saturating_sub(n)..]
    }

    /// First `n` bytes, clamped to the chunk length
    #[must_use]
    pub fn head(&self, n: usize) -> &[u8] {
        &self.data[..n.min(self.data.len())]
    }
}

/// A whole file as an ordered, gapless sequence of chunks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedFile {
    chunks: Vec<Chunk>,
    len: usize,
}

impl ChunkedFile {
    /// Assemble from chunks already laid out back to back
    #[must_use]
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let len = chunks.iter().map(Chunk::len).sum();
        debug_assert!(chunks
            .windows(2)
            .all(|pair| pair[0].end() == pair[1].offset));
        Self { chunks, len }
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Total file size in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
