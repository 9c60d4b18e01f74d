use fencepost_chunker::{Chunker, ChunkerConfig, ChunkerError};
use std::fs;
use tempfile::TempDir;

#[test]
fn chunk_file_reads_whole_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("book.txt");
    let body: String = "It was the best of times, it was the worst of times. ".repeat(200);
    fs::write(&path, &body).expect("write file");

    let chunker = Chunker::new(ChunkerConfig::default()).expect("chunker");
    let file = chunker.chunk_file(&path).expect("chunk file");

    assert_eq!(file.len(), body.len());
    assert_eq!(file.chunk_count(), body.len().div_ceil(4096));
    assert_eq!(
        file.chunks().iter().map(|c| c.len()).sum::<usize>(),
        body.len()
    );
    let last = file.chunks().last().expect("last chunk");
    assert_eq!(last.end(), body.len());
    assert!(last.len() <= 4096);
}

#[test]
fn chunk_file_missing_path_is_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let chunker = Chunker::new(ChunkerConfig::default()).expect("chunker");

    let err = chunker
        .chunk_file(temp.path().join("nope.txt"))
        .expect_err("missing file must fail");
    assert!(matches!(err, ChunkerError::IoError(_)), "got {err:?}");
}

#[test]
fn chunk_file_empty_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("empty.txt");
    fs::write(&path, "").expect("write file");

    let chunker = Chunker::new(ChunkerConfig::default()).expect("chunker");
    let file = chunker.chunk_file(&path).expect("chunk file");
    assert!(file.is_empty());
    assert_eq!(file.chunk_count(), 0);
}
