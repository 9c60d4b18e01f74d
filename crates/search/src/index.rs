use std::io::Read;
use std::path::Path;

use fencepost_chunker::{Chunk, ChunkedFile, Chunker};
use rayon::prelude::*;

use crate::aggregate::{AbsoluteSpan, Hit, Match, ResultAggregator};
use crate::config::{IndexConfig, SearchConfig};
use crate::context::ContextExtractor;
use crate::error::{Result, SearchError};
use crate::fence::{Buffer, FenceAssembler};
use crate::matcher::{Verdict, WordMatcher};

/// Read-only chunked view of one file, queried for whole words in context
///
/// Built once; every query assembles its own fences, so a `TextIndex` can be
/// shared across threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct TextIndex {
    file: ChunkedFile,
    chunk_size: usize,
    search: SearchConfig,
}

impl TextIndex {
    /// Read `path` with default tuning
    pub fn build(path: impl AsRef<Path>) -> Result<Self> {
        Self::build_with(path, &IndexConfig::default())
    }

    pub fn build_with(path: impl AsRef<Path>, config: &IndexConfig) -> Result<Self> {
        let chunker = Self::chunker(config)?;
        let file = chunker.chunk_file(path)?;
        Ok(Self::from_parts(file, config))
    }

    /// Read exactly `len` bytes from an already opened source
    pub fn from_reader<R: Read>(reader: R, len: usize, config: &IndexConfig) -> Result<Self> {
        let chunker = Self::chunker(config)?;
        let file = chunker.chunk_reader(reader, len)?;
        Ok(Self::from_parts(file, config))
    }

    pub fn from_bytes(bytes: &[u8], config: &IndexConfig) -> Result<Self> {
        Self::from_reader(bytes, bytes.len(), config)
    }

    fn chunker(config: &IndexConfig) -> Result<Chunker> {
        config.validate()?;
        Ok(Chunker::new(config.chunker)?)
    }

    fn from_parts(file: ChunkedFile, config: &IndexConfig) -> Self {
        Self {
            file,
            chunk_size: config.chunker.chunk_size,
            search: config.search.clone(),
        }
    }

    /// File size in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.file.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.file.is_empty()
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.file.chunk_count()
    }

    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        self.file.chunks()
    }

    /// Every whole-word occurrence of `word` rendered with up to `width`
    /// context words per side, in file order
    pub fn search(&self, word: &str, width: usize) -> Result<Vec<String>> {
        Ok(self.find(word, width)?.iter().map(Match::render).collect())
    }

    /// Structured form of [`TextIndex::search`]
    pub fn find(&self, word: &str, width: usize) -> Result<Vec<Match>> {
        if word.is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        if word.len() >= self.chunk_size {
            return Err(SearchError::TermTooLong {
                len: word.len(),
                chunk_size: self.chunk_size,
            });
        }

        let matcher = WordMatcher::new(word, self.search.word_chars);
        let extractor = ContextExtractor::new(self.search.punctuation);
        let assembler = FenceAssembler::new(width, self.search.max_word_bytes, matcher.term_len());
        let buffers = assembler.assemble(&self.file);
        log::debug!(
            "Searching {} buffers for {word:?} (width={width}, fence half-width={})",
            buffers.len(),
            assembler.half_width()
        );

        let per_buffer: Vec<Vec<Hit>> = buffers
            .buffers()
            .par_iter()
            .enumerate()
            .map(|(index, buffer)| scan_buffer(index, buffer, &matcher, &extractor, width))
            .collect();

        Ok(ResultAggregator::aggregate(per_buffer))
    }
}

fn scan_buffer(
    index: usize,
    buffer: &Buffer<'_>,
    matcher: &WordMatcher,
    extractor: &ContextExtractor,
    width: usize,
) -> Vec<Hit> {
    let len = matcher.term_len();
    matcher
        .scan(buffer)
        .into_iter()
        .map(|(candidate, verdict)| {
            let offset = candidate.offset;
            let end = offset + len;
            let span = AbsoluteSpan {
                start: buffer.offset + offset,
                end: buffer.offset + end,
            };
            if verdict != Verdict::WholeWord {
                return Hit::Rejected(span);
            }
            Hit::Word(Match {
                buffer_index: index,
                offset,
                span,
                text: String::from_utf8_lossy(&buffer.bytes[offset..end]).into_owned(),
                before: extractor.before(buffer, offset, width),
                after: extractor.after(buffer, end, width),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fencepost_chunker::ChunkerConfig;
    use pretty_assertions::assert_eq;

    fn index(text: &str, chunk_size: usize) -> TextIndex {
        let config = IndexConfig {
            chunker: ChunkerConfig::with_chunk_size(chunk_size),
            ..Default::default()
        };
        TextIndex::from_bytes(text.as_bytes(), &config).unwrap()
    }

    #[test]
    fn test_empty_term_rejected() {
        let err = index("some text", 4096).search("", 2).unwrap_err();
        assert!(matches!(err, SearchError::EmptyTerm));
    }

    #[test]
    fn test_term_longer_than_chunk_rejected() {
        let err = index("some text", 4).search("some", 0).unwrap_err();
        assert!(matches!(err, SearchError::TermTooLong { len: 4, chunk_size: 4 }));
    }

    #[test]
    fn test_absent_word_is_empty() {
        assert!(index("some text here", 4).search("absent", 1).unwrap().is_empty());
        assert!(index("", 4).search("absent", 1).unwrap().is_empty());
    }

    #[test]
    fn test_zero_width_returns_original_casing() {
        let results = index("The CAT sat. A cat! Cat-nap, Cat", 8)
            .search("cat", 0)
            .unwrap();
        assert_eq!(results, vec!["CAT", "cat", "Cat"]);
    }

    #[test]
    fn test_word_straddling_boundary_found_once() {
        let text = "one two three two one";
        for size in 4..=text.len() {
            let results = index(text, size).search("two", 0).unwrap();
            assert_eq!(results, vec!["two", "two"], "chunk size {size}");
        }
    }

    fn starts(idx: &TextIndex, word: &str) -> Vec<usize> {
        idx.find(word, 0)
            .unwrap()
            .iter()
            .map(|m| m.span.start)
            .collect()
    }

    #[test]
    fn test_self_overlapping_term_matches_single_chunk_scan() {
        for text in ["q a.a.a b", "qq a.a.a b", "xa.a.a b", "a.a.a.a", "(a.a.a.a.a)"] {
            let whole = starts(&index(text, 4096), "a.a");
            for size in 4..=text.len() {
                assert_eq!(
                    starts(&index(text, size), "a.a"),
                    whole,
                    "{text:?} chunk size {size}"
                );
            }
        }

        assert_eq!(starts(&index("q a.a.a b", 4096), "a.a"), vec![2]);
        assert_eq!(starts(&index("a.a.a.a", 4096), "a.a"), vec![0, 4]);
        assert!(starts(&index("xa.a.a b", 4096), "a.a").is_empty());
    }

    #[test]
    fn test_spans_are_file_coordinates() {
        let found = index("aa bb aa bb aa", 4).find("aa", 0).unwrap();
        let starts: Vec<usize> = found.iter().map(|m| m.span.start).collect();
        assert_eq!(starts, vec![0, 6, 12]);
    }

    #[test]
    fn test_queries_are_independent() {
        let idx = index("red green blue green red", 6);
        let first = idx.search("green", 2).unwrap();
        let narrow = idx.search("green", 0).unwrap();
        let again = idx.search("green", 2).unwrap();
        assert_eq!(first, again);
        assert_eq!(narrow, vec!["green", "green"]);
    }
}
