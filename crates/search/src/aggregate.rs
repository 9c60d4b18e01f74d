use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::context::ContextSide;

/// Byte range of a match in file coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AbsoluteSpan {
    pub start: usize,
    pub end: usize,
}

/// A validated whole-word occurrence with rendered context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Index into the query's buffer set
    pub buffer_index: usize,
    /// Offset of the match inside that buffer
    pub offset: usize,
    pub span: AbsoluteSpan,
    /// Matched bytes in their original casing
    pub text: String,
    pub before: ContextSide,
    pub after: ContextSide,
}

impl Match {
    /// `before + text + after`
    #[must_use]
    pub fn render(&self) -> String {
        let mut out =
            String::with_capacity(self.before.text.len() + self.text.len() + self.after.text.len());
        out.push_str(&self.before.text);
        out.push_str(&self.text);
        out.push_str(&self.after.text);
        out
    }

    fn rank(&self) -> (Reverse<u8>, usize) {
        let truncated = u8::from(self.before.truncated) + u8::from(self.after.truncated);
        (Reverse(truncated), self.before.words + self.after.words)
    }
}

/// One literal occurrence of the term as seen by one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// Validated whole word with its rendering
    Word(Match),
    /// Part of a longer word, or not verifiable inside this buffer
    Rejected(AbsoluteSpan),
}

impl Hit {
    #[must_use]
    pub fn span(&self) -> AbsoluteSpan {
        match self {
            Self::Word(found) => found.span,
            Self::Rejected(span) => *span,
        }
    }
}

/// Merges per-buffer results into one ordered, duplicate-free list
#[derive(Debug, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    /// `per_buffer` must be indexed by buffer position.
    ///
    /// Occurrences from all buffers are resolved left to right across the
    /// file: one that overlaps an earlier claimed occurrence is dropped even if
    /// it validates as a whole word, and a claimed occurrence that is not a
    /// whole word still blocks the ones it overlaps.
    ///
    /// Results are concatenated in buffer order. A span detected by several
    /// buffers keeps the slot of its first detection and the rendering with the
    /// fewest truncated sides, then the most context words.
    #[must_use]
    pub fn aggregate(per_buffer: Vec<Vec<Hit>>) -> Vec<Match> {
        let hits: Vec<Hit> = per_buffer.into_iter().flatten().collect();
        let claimed = claim_non_overlapping(hits.iter().map(Hit::span));

        let mut slots: HashMap<AbsoluteSpan, usize> = HashMap::new();
        let mut merged: Vec<Match> = Vec::new();
        let mut duplicates = 0usize;
        let mut overlapping = 0usize;

        for hit in hits {
            let Hit::Word(found) = hit else {
                continue;
            };
            if !claimed.contains(&found.span) {
                overlapping += 1;
                continue;
            }
            if let Some(&slot) = slots.get(&found.span) {
                duplicates += 1;
                if found.rank() > merged[slot].rank() {
                    merged[slot] = found;
                }
                continue;
            }
            slots.insert(found.span, merged.len());
            merged.push(found);
        }

        log::debug!(
            "Aggregated {} matches ({duplicates} duplicate detections, {overlapping} overlapping removed)",
            merged.len()
        );
        merged
    }
}

/// Leftmost-first selection of non-overlapping spans, as a single cursor over
/// the whole file would make
fn claim_non_overlapping(spans: impl Iterator<Item = AbsoluteSpan>) -> HashSet<AbsoluteSpan> {
    let ordered: BTreeSet<AbsoluteSpan> = spans.collect();
    let mut claimed = HashSet::with_capacity(ordered.len());
    let mut free_from = 0;
    for span in ordered {
        if span.start >= free_from {
            free_from = span.end;
            claimed.insert(span);
        }
    }
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn side(text: &str, words: usize, truncated: bool) -> ContextSide {
        ContextSide {
            text: text.to_string(),
            words,
            truncated,
        }
    }

    fn word(buffer_index: usize, start: usize, before: ContextSide, after: ContextSide) -> Hit {
        Hit::Word(found(buffer_index, start, before, after))
    }

    fn rejected(start: usize) -> Hit {
        Hit::Rejected(AbsoluteSpan {
            start,
            end: start + 4,
        })
    }

    fn found(buffer_index: usize, start: usize, before: ContextSide, after: ContextSide) -> Match {
        Match {
            buffer_index,
            offset: 0,
            span: AbsoluteSpan {
                start,
                end: start + 4,
            },
            text: "word".to_string(),
            before,
            after,
        }
    }

    #[test]
    fn test_render() {
        let m = found(0, 0, side("a b ", 2, false), side(" c", 1, false));
        assert_eq!(m.render(), "a b word c");
    }

    #[test]
    fn test_keeps_buffer_order() {
        let merged = ResultAggregator::aggregate(vec![
            vec![word(0, 5, side("", 0, false), side("", 0, false))],
            vec![],
            vec![
                word(2, 40, side("", 0, false), side("", 0, false)),
                word(2, 60, side("", 0, false), side("", 0, false)),
            ],
        ]);
        let starts: Vec<usize> = merged.iter().map(|m| m.span.start).collect();
        assert_eq!(starts, vec![5, 40, 60]);
    }

    #[test]
    fn test_duplicate_prefers_untruncated_rendering() {
        let merged = ResultAggregator::aggregate(vec![
            vec![
                word(0, 2, side("x ", 1, false), side("", 0, false)),
                word(0, 10, side("a ", 1, false), side(" b", 1, true)),
            ],
            vec![word(1, 10, side("a ", 1, false), side(" b c", 2, false))],
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].span.start, 2);
        assert_eq!(merged[1].buffer_index, 1);
        assert_eq!(merged[1].render(), "a word b c");
    }

    #[test]
    fn test_duplicate_tie_keeps_first() {
        let merged = ResultAggregator::aggregate(vec![
            vec![word(0, 10, side("a ", 1, false), side("", 0, false))],
            vec![word(1, 10, side("z ", 1, false), side("", 0, false))],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].buffer_index, 0);
    }

    #[test]
    fn test_overlapping_whole_words_resolved_left_to_right() {
        // Chunk saw 10..14, fence saw 12..16 and 14..18
        let merged = ResultAggregator::aggregate(vec![
            vec![word(0, 10, side("", 0, false), side("", 0, false))],
            vec![
                word(1, 12, side("", 0, false), side("", 0, false)),
                word(1, 14, side("", 0, false), side("", 0, false)),
            ],
        ]);
        let starts: Vec<usize> = merged.iter().map(|m| m.span.start).collect();
        assert_eq!(starts, vec![10, 14]);
    }

    #[test]
    fn test_rejected_occurrence_still_claims_its_bytes() {
        let merged = ResultAggregator::aggregate(vec![
            vec![rejected(10)],
            vec![
                word(1, 12, side("", 0, false), side("", 0, false)),
                word(1, 20, side("", 0, false), side("", 0, false)),
            ],
        ]);
        let starts: Vec<usize> = merged.iter().map(|m| m.span.start).collect();
        assert_eq!(starts, vec![20]);
    }
}
