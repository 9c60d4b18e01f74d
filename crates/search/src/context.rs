use serde::Serialize;

use crate::config::ByteSet;
use crate::fence::Buffer;

/// Rendered context on one side of a match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextSide {
    /// Ready to concatenate with the match (carries its own separator)
    pub text: String,
    /// Number of context words emitted, not counting stuck punctuation
    pub words: usize,
    /// Fewer than the requested words because a non-file buffer edge was hit
    pub truncated: bool,
}

/// Pulls whitespace-delimited words around a match
#[derive(Debug, Clone, Copy)]
pub struct ContextExtractor {
    punctuation: ByteSet,
}

impl ContextExtractor {
    #[must_use]
    pub const fn new(punctuation: ByteSet) -> Self {
        Self { punctuation }
    }

    /// Up to `width` words ending right before `start`
    #[must_use]
    pub fn before(&self, buffer: &Buffer<'_>, start: usize, width: usize) -> ContextSide {
        if width == 0 {
            return ContextSide::default();
        }

        let bytes = buffer.bytes.as_ref();
        let open_edge = !buffer.starts_file();
        let mut edge = start;
        let mut stuck_from = start;
        let mut words: Vec<&[u8]> = Vec::with_capacity(width);
        let mut truncated = false;

        while words.len() < width {
            let Some((from, to)) = prev_token(bytes, edge) else {
                truncated = open_edge;
                break;
            };
            // May be the back half of a word split by the buffer edge
            if from == 0 && open_edge {
                truncated = true;
                break;
            }
            edge = from;
            if words.is_empty() && self.is_stuck_punctuation(&bytes[from..to]) {
                stuck_from = from;
                continue;
            }
            words.push(&bytes[from..to]);
        }

        words.reverse();
        let mut text = join_words(&words);
        if !words.is_empty() {
            text.push(' ');
        }
        text.push_str(&squash_whitespace(&bytes[stuck_from..start]));

        ContextSide {
            text,
            words: words.len(),
            truncated,
        }
    }

    /// Up to `width` words starting right after `end`
    #[must_use]
    pub fn after(&self, buffer: &Buffer<'_>, end: usize, width: usize) -> ContextSide {
        if width == 0 {
            return ContextSide::default();
        }

        let bytes = buffer.bytes.as_ref();
        let open_edge = !buffer.ends_file();
        let mut edge = end;
        let mut stuck_to = end;
        let mut words: Vec<&[u8]> = Vec::with_capacity(width);
        let mut truncated = false;

        while words.len() < width {
            let Some((from, to)) = next_token(bytes, edge) else {
                truncated = open_edge;
                break;
            };
            if to == bytes.len() && open_edge {
                truncated = true;
                break;
            }
            edge = to;
            if words.is_empty() && self.is_stuck_punctuation(&bytes[from..to]) {
                stuck_to = to;
                continue;
            }
            words.push(&bytes[from..to]);
        }

        let mut text = squash_whitespace(&bytes[end..stuck_to]);
        if !words.is_empty() {
            text.push(' ');
            text.push_str(&join_words(&words));
        }

        ContextSide {
            text,
            words: words.len(),
            truncated,
        }
    }

    fn is_stuck_punctuation(&self, token: &[u8]) -> bool {
        matches!(token, [b] if self.punctuation.contains(*b))
    }
}

/// Last token ending at or before `edge`; line breaks count as whitespace
fn prev_token(bytes: &[u8], edge: usize) -> Option<(usize, usize)> {
    let mut i = edge;
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    if i == 0 {
        return None;
    }
    let to = i;
    while i > 0 && !bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    Some((i, to))
}

/// First token starting at or after `edge`
fn next_token(bytes: &[u8], edge: usize) -> Option<(usize, usize)> {
    let mut i = edge;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i == bytes.len() {
        return None;
    }
    let from = i;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    Some((from, i))
}

fn join_words(words: &[&[u8]]) -> String {
    words
        .iter()
        .map(|w| String::from_utf8_lossy(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse each run of whitespace (`\r\n` and `\n` included) into one space
fn squash_whitespace(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len());
    let mut in_space = false;
    for &b in bytes {
        if b.is_ascii_whitespace() {
            if !in_space {
                out.push(b' ');
            }
            in_space = true;
        } else {
            out.push(b);
            in_space = false;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
