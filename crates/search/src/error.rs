use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Chunker error: {0}")]
    ChunkerError(#[from] fencepost_chunker::ChunkerError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Empty search term")]
    EmptyTerm,

    #[error("Search term is {len} bytes, chunks are only {chunk_size} bytes")]
    TermTooLong { len: usize, chunk_size: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
