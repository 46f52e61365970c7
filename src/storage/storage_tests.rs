use super::*;
use std::io::{Read, Write};

fn store() -> (tempfile::TempDir, FileStore) {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileStore::with_root(tmp.path()).unwrap();
    (tmp, store)
}

#[test]
fn root_must_exist() {
    let mut store = FileStore::new();
    let err = store.set_root_directory("/does/not/exist").unwrap_err();
    assert!(matches!(err, FileStoreError::RootNotFound { .. }));
    assert_eq!(err.to_string(), "Root directory /does/not/exist does not exist");
    assert!(store.root().is_none());
}

#[test]
fn root_must_be_a_directory() {
    let (_tmp, store) = store();
    store.save_contents("x", "plain.txt").unwrap();
    let file = store.get_real_file_path("plain.txt").unwrap();
    assert!(matches!(FileStore::with_root(&file), Err(FileStoreError::RootNotFound { .. })));
}

#[cfg(unix)]
#[test]
fn root_must_be_writable() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let locked = tmp.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users can write anyway; nothing to assert then
    let probe = locked.join("probe");
    if std::fs::write(&probe, b"").is_ok() {
        std::fs::remove_file(&probe).unwrap();
    } else {
        let err = FileStore::with_root(&locked).unwrap_err();
        assert!(matches!(err, FileStoreError::RootNotWritable { .. }));
        assert!(err.to_string().ends_with("is not writeable"));
    }
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn operations_require_root() {
    let store = FileStore::new();
    assert!(matches!(store.save_contents("x", "a.txt"), Err(FileStoreError::RootNotSet)));
    assert!(matches!(store.get_real_file_path("a.txt"), Err(FileStoreError::RootNotSet)));
    assert!(matches!(store.remove("a.txt"), Err(FileStoreError::RootNotSet)));
    assert!(!store.file_exists("a.txt"));
}

#[test]
fn set_root_chains() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = FileStore::new();
    let exists = store.set_root_directory(tmp.path()).unwrap().file_exists("nothing");
    assert!(!exists);
    assert!(store.root().unwrap().is_absolute());
}

#[test]
fn create_directory_makes_parents() {
    let (_tmp, store) = store();
    store.create_directory("a/b/c").unwrap();
    assert!(store.file_exists("a"));
    assert!(store.file_exists("a/b/c"));
    assert!(store.get_real_file_path("a/b/c").unwrap().is_dir());
    // Existing directory is fine
    store.create_directory("a/b").unwrap();
}

#[test]
fn save_then_read() {
    let (_tmp, store) = store();
    store.save_contents("Test data", "test.txt").unwrap();
    assert!(store.file_exists("test.txt"));
    assert_eq!(store.get_file_contents("test.txt").unwrap(), "Test data");
}

#[test]
fn save_overwrites_instead_of_appending() {
    let (_tmp, store) = store();
    store.save_contents("X", "f.txt").unwrap().save_contents("Y", "f.txt").unwrap();
    assert_eq!(store.get_file_contents("f.txt").unwrap(), "Y");
    assert_eq!(store.get_file_bytes("f.txt").unwrap(), b"Y");
}

#[test]
fn save_creates_missing_directories() {
    let (_tmp, store) = store();
    store.save_contents("Test data", "dir/sub/test.txt").unwrap();
    assert!(store.get_real_file_path("dir/sub").unwrap().is_dir());
    assert_eq!(store.get_file_contents("dir\\sub\\test.txt").unwrap(), "Test data");
}

#[test]
fn save_above_root_stays_in_root() {
    let (tmp, store) = store();
    store.save_contents("Test data", "../../test.txt").unwrap();
    assert!(tmp.path().join("test.txt").is_file());
    assert_eq!(store.get_file_contents("test.txt").unwrap(), "Test data");
}

#[test]
fn read_missing_file_fails() {
    let (_tmp, store) = store();
    let err = store.get_file_contents("nope.txt").unwrap_err();
    assert!(matches!(err, FileStoreError::NotFound { .. }));
    assert_eq!(err.to_string(), "File does not exist");
    assert!(matches!(store.get_file_handle("nope.txt", FileMode::Read), Err(FileStoreError::NotFound { .. })));
}

#[test]
fn remove_file() {
    let (_tmp, store) = store();
    store.save_contents("x", "a.txt").unwrap();
    store.remove("a.txt").unwrap();
    assert!(!store.file_exists("a.txt"));
}

#[test]
fn remove_directory_tree() {
    let (tmp, store) = store();
    store
        .save_contents("1", "tree/a.txt")
        .unwrap()
        .save_contents("2", "tree/b/c.txt")
        .unwrap()
        .save_contents("3", "tree/b/d/e/f.txt")
        .unwrap()
        .create_directory("tree/empty")
        .unwrap();

    store.remove("tree").unwrap();
    assert!(!store.file_exists("tree"));
    assert!(tmp.path().is_dir());

    let err = store.remove("tree").unwrap_err();
    assert!(matches!(err, FileStoreError::NotFound { .. }));
}

#[cfg(unix)]
#[test]
fn remove_does_not_follow_symlinks_out_of_root() {
    let (tmp, store) = store();
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("keep.txt"), "keep").unwrap();

    store.save_contents("1", "tree/a.txt").unwrap();
    std::os::unix::fs::symlink(outside.path(), tmp.path().join("tree").join("link")).unwrap();

    store.remove("tree").unwrap();
    assert!(!store.file_exists("tree"));
    assert!(outside.path().join("keep.txt").is_file());
    assert_eq!(std::fs::read_to_string(outside.path().join("keep.txt")).unwrap(), "keep");
}

#[test]
fn file_handles_honor_mode() {
    let (_tmp, store) = store();
    store.save_contents("abc", "h.txt").unwrap();

    {
        let mut h = store.get_file_handle("h.txt", FileMode::Append).unwrap();
        h.write_all(b"def").unwrap();
    }
    let mut out = String::new();
    store.get_file_handle("h.txt", FileMode::Read).unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "abcdef");

    {
        let mut h = store.get_file_handle("h.txt", FileMode::Write).unwrap();
        h.write_all(b"z").unwrap();
    }
    assert_eq!(store.get_file_contents("h.txt").unwrap(), "z");
}

#[test]
fn file_mode_parsing() {
    assert_eq!("r".parse::<FileMode>().unwrap(), FileMode::Read);
    assert_eq!("rb".parse::<FileMode>().unwrap(), FileMode::Read);
    assert_eq!("w+".parse::<FileMode>().unwrap(), FileMode::WritePlus);
    assert_eq!("a".parse::<FileMode>().unwrap(), FileMode::Append);
    assert!("x".parse::<FileMode>().is_err());
}

#[test]
fn csv_reads_rows() {
    let (_tmp, store) = store();
    store.save_contents("Use,Less\n", "test.csv").unwrap();
    let rows = CsvReader::new(&store).delimiter(b',').read_csv("test.csv").unwrap();
    assert_eq!(rows, vec![vec!["Use".to_string(), "Less".to_string()]]);
}

#[test]
fn csv_handles_delimiter_quotes_and_ragged_rows() {
    let (_tmp, store) = store();
    store
        .save_contents("a;\"b;c\"\r\n\r\nd\r\n", "data/semi.csv")
        .unwrap();
    let mut reader = CsvReader::new(&store);
    reader.set_delimiter(b';');
    let rows = reader.read_csv("data/semi.csv").unwrap();
    assert_eq!(
        rows,
        vec![vec!["a".to_string(), "b;c".to_string()], vec!["d".to_string()]]
    );
}

#[test]
fn csv_missing_file_is_a_store_error() {
    let (_tmp, store) = store();
    let err = CsvReader::new(&store).read_csv("missing.csv").unwrap_err();
    assert!(matches!(err, CsvError::FileStore(FileStoreError::NotFound { .. })));
}
