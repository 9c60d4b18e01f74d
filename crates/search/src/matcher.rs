use memchr::memmem;

use crate::config::ByteSet;
use crate::fence::Buffer;

/// A raw case-insensitive hit before whole-word validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Offset of the first matched byte inside the buffer
    pub offset: usize,
}

/// Outcome of checking a candidate's neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    WholeWord,
    /// A neighbour is a word character; the hit is part of a larger token
    Substring,
    /// A neighbour that must be checked lies outside this buffer
    Unverifiable,
}

/// Case-insensitive literal scanner with whole-word validation
pub struct WordMatcher {
    needle: Vec<u8>,
    finder: memmem::Finder<'static>,
    word_chars: ByteSet,
}

impl WordMatcher {
    /// `term` must be non-empty
    #[must_use]
    pub fn new(term: &str, word_chars: ByteSet) -> Self {
        let needle = term.as_bytes().to_ascii_lowercase();
        let finder = memmem::Finder::new(&needle).into_owned();
        Self {
            needle,
            finder,
            word_chars,
        }
    }

    /// Byte length of the term
    #[must_use]
    pub fn term_len(&self) -> usize {
        self.needle.len()
    }

    /// Every literal hit, left to right, overlapping ones included
    ///
    /// Buffers start at arbitrary file offsets, so the non-overlapping rule is
    /// only applied once hits from all buffers are placed in file coordinates.
    #[must_use]
    pub fn candidates(&self, bytes: &[u8]) -> Vec<Candidate> {
        let haystack = bytes.to_ascii_lowercase();

        let mut found = Vec::new();
        let mut cursor = 0;
        while cursor < haystack.len() {
            let Some(pos) = self.finder.find(&haystack[cursor..]) else {
                break;
            };
            let offset = cursor + pos;
            found.push(Candidate { offset });
            cursor = offset + 1;
        }
        found
    }

    /// Check the bytes around a candidate
    ///
    /// The byte before is skipped when the hit starts the file and the byte
    /// after is skipped when it ends the file.
    #[must_use]
    pub fn verdict(&self, buffer: &Buffer<'_>, candidate: Candidate) -> Verdict {
        let bytes = buffer.bytes.as_ref();
        let start = candidate.offset;
        let end = start + self.needle.len();
        let abs_start = buffer.offset + start;
        let abs_end = buffer.offset + end;

        let before = if abs_start == 0 {
            Verdict::WholeWord
        } else {
            self.neighbour(start.checked_sub(1).and_then(|i| bytes.get(i)))
        };
        let after = if abs_end == buffer.file_len {
            Verdict::WholeWord
        } else {
            self.neighbour(bytes.get(end))
        };

        match (before, after) {
            (Verdict::Substring, _) | (_, Verdict::Substring) => Verdict::Substring,
            (Verdict::Unverifiable, _) | (_, Verdict::Unverifiable) => Verdict::Unverifiable,
            _ => Verdict::WholeWord,
        }
    }

    fn neighbour(&self, byte: Option<&u8>) -> Verdict {
        match byte {
            None => Verdict::Unverifiable,
            Some(&b) if self.word_chars.contains(b) => Verdict::Substring,
            Some(_) => Verdict::WholeWord,
        }
    }

    /// Every hit in the buffer with its verdict
    #[must_use]
    pub fn scan(&self, buffer: &Buffer<'_>) -> Vec<(Candidate, Verdict)> {
        self.candidates(&buffer.bytes)
            .into_iter()
            .map(|candidate| {
                let verdict = self.verdict(buffer, candidate);
                if verdict != Verdict::WholeWord {
                    log::trace!(
                        "{:?}: rejected candidate at {} ({verdict:?})",
                        buffer.kind,
                        buffer.offset + candidate.offset
                    );
                }
                (candidate, verdict)
            })
            .collect()
    }

    /// Offsets of every whole-word hit in the buffer
    ///
    /// Rejected candidates, including unverifiable ones at buffer edges, are
    /// dropped one at a time; the rest of the buffer is still scanned.
    #[must_use]
    pub fn whole_words(&self, buffer: &Buffer<'_>) -> Vec<usize> {
        self.scan(buffer)
            .into_iter()
            .filter(|(_, verdict)| *verdict == Verdict::WholeWord)
            .map(|(candidate, _)| candidate.offset)
            .collect()
    }
}
