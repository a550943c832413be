use std::fs;

use pagepress_engine::{ensure_output_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("post.md", b"hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "post.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("post.md", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn nested_relative_path_creates_directories() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let path = writer.write("tech/my-post/photo.png", &[1, 2, 3]).unwrap();
    assert_eq!(path, temp.path().join("tech").join("my-post").join("photo.png"));
    assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("post.md", b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("post.md").exists());
}
