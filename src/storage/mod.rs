//!
//! ulpf storage module
//! -------------------
//! File storage scoped to a single root directory, plus a CSV reader on top
//! of it. Callers address files with relative paths; those are canonicalized
//! (`.` dropped, `..` popped, both slash styles accepted) and joined to the
//! root, so nothing outside the root can be reached.
//!
//! Key responsibilities:
//! - Root validation (exists and writable) before any other operation.
//! - Save with automatic creation of missing parent directories.
//! - Read, existence checks and raw file handles.
//! - Recursive, children-first removal of directory trees.

mod csv_reader;
mod error;
mod file_store;
pub mod paths;

pub use csv_reader::CsvReader;
pub use error::{CsvError, FileStoreError};
pub use file_store::{FileMode, FileStore, FileStoreResult};
pub use paths::{canonicalize_path, resolve_under};

#[cfg(test)]
mod storage_tests;
