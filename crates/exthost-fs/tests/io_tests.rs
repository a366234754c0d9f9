use exthost_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("Admin").join("config.yml"));

    io::write_atomic(&path, b"greeting: hi\n").unwrap();

    assert!(path.is_file());
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_text(&path, "content").unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["test.txt".to_string()]);
}

#[test]
fn test_read_text_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.txt"));

    let err = io::read_text(&path).unwrap_err();
    assert!(matches!(err, exthost_fs::Error::Io { .. }));
}

#[test]
fn test_ensure_dir_creates_then_reports_existing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("Admin"));

    assert!(io::ensure_dir(&path).unwrap());
    assert!(path.is_dir());
    assert!(!io::ensure_dir(&path).unwrap());
}

#[test]
fn test_modified_time_of_existing_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("admin.ext");
    fs::write(&file_path, "").unwrap();

    let path = NormalizedPath::new(&file_path);
    let expected = fs::metadata(&file_path).unwrap().modified().unwrap();
    assert_eq!(io::modified_time(&path).unwrap(), expected);
}

#[test]
fn test_modified_time_of_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.ext"));
    assert!(io::modified_time(&path).is_err());
}
