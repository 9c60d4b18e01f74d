use std::fmt;
use std::path::Path;

use fencepost_chunker::ChunkerConfig;
use serde::de::{self, Visitor};
use serde::ser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SearchError};

/// Default estimate of the longest word, in bytes
pub const DEFAULT_MAX_WORD_BYTES: usize = 20;

const DEFAULT_WORD_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789'-";
const DEFAULT_PUNCTUATION: &[u8] = b"\".,!?(){}[]";

/// Immutable membership table over all byte values
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ByteSet([bool; 256]);

impl ByteSet {
    #[must_use]
    pub fn new(members: &[u8]) -> Self {
        let mut table = [false; 256];
        for &b in members {
            table[usize::from(b)] = true;
        }
        Self(table)
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, byte: u8) -> bool {
        self.0[byte as usize]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&m| m)
    }

    /// Member bytes in ascending order
    #[must_use]
    pub fn members(&self) -> Vec<u8> {
        (0..=u8::MAX).filter(|&b| self.contains(b)).collect()
    }

    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.0[0x80..].iter().all(|&m| !m)
    }
}

impl fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByteSet")
            .field(&String::from_utf8_lossy(&self.members()))
            .finish()
    }
}

impl Serialize for ByteSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if !self.is_ascii() {
            return Err(ser::Error::custom("byte set has non-ASCII members"));
        }
        let members: String = self.members().into_iter().map(char::from).collect();
        serializer.serialize_str(&members)
    }
}

impl<'de> Deserialize<'de> for ByteSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ByteSetVisitor;

        impl Visitor<'_> for ByteSetVisitor {
            type Value = ByteSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string listing every member byte")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ByteSet, E> {
                Ok(ByteSet::new(v.as_bytes()))
            }
        }

        deserializer.deserialize_str(ByteSetVisitor)
    }
}

/// Tuning for whole-word matching and context extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-word byte estimate used to size fences
    pub max_word_bytes: usize,

    /// Bytes that make a neighbour part of the same word
    pub word_chars: ByteSet,

    /// Single-byte tokens that stick to the match instead of counting as
    /// context words
    pub punctuation: ByteSet,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_word_bytes: DEFAULT_MAX_WORD_BYTES,
            word_chars: ByteSet::new(DEFAULT_WORD_CHARS),
            punctuation: ByteSet::new(DEFAULT_PUNCTUATION),
        }
    }
}

impl SearchConfig {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_word_bytes == 0 {
            return Err("max_word_bytes must be > 0".to_string());
        }
        if self.word_chars.is_empty() {
            return Err("word_chars must not be empty".to_string());
        }
        if !self.word_chars.is_ascii() {
            return Err("word_chars must be ASCII".to_string());
        }
        if !self.punctuation.is_ascii() {
            return Err("punctuation must be ASCII".to_string());
        }
        Ok(())
    }
}

/// Full index configuration, as read from a TOML file
///
/// ```toml
/// [chunker]
/// chunk_size = 4096
///
/// [search]
/// max_word_bytes = 20
/// punctuation = "\".,!?(){}[]"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub chunker: ChunkerConfig,
    pub search: SearchConfig,
}

impl IndexConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|err| SearchError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunker
            .validate()
            .and_then(|()| self.search.validate())
            .map_err(SearchError::InvalidConfig)
    }
}
