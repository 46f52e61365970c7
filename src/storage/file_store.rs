use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;
use walkdir::WalkDir;

use super::error::FileStoreError;
use super::paths::{normalize_root, resolve_under};
use crate::tprintln;

pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// How `get_file_handle` opens a file; mirrors the classic fopen modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// "r"
    #[default]
    Read,
    /// "r+"
    ReadPlus,
    /// "w": truncate
    Write,
    /// "w+": truncate, also readable
    WritePlus,
    /// "a"
    Append,
    /// "a+"
    AppendPlus,
}

impl FileMode {
    fn open_options(self) -> OpenOptions {
        let mut o = OpenOptions::new();
        match self {
            FileMode::Read => o.read(true),
            FileMode::ReadPlus => o.read(true).write(true),
            FileMode::Write => o.write(true).truncate(true),
            FileMode::WritePlus => o.read(true).write(true).truncate(true),
            FileMode::Append => o.append(true),
            FileMode::AppendPlus => o.read(true).append(true),
        };
        o
    }
}

impl FromStr for FileMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "b" is accepted and ignored, as with fopen
        match s.replace('b', "").as_str() {
            "r" => Ok(FileMode::Read),
            "r+" => Ok(FileMode::ReadPlus),
            "w" => Ok(FileMode::Write),
            "w+" => Ok(FileMode::WritePlus),
            "a" => Ok(FileMode::Append),
            "a+" => Ok(FileMode::AppendPlus),
            other => Err(format!("unsupported file mode '{other}'")),
        }
    }
}

/// File storage confined to a root directory.
///
/// Every operation takes a path relative to the root. The path is
/// canonicalized first, so `..` segments can never leave the root; they
/// collapse towards it instead. Missing parent directories are created on
/// save, and directories are removed recursively.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    root: Option<PathBuf>,
}

impl FileStore {
    /// A store without a root; every path operation fails until
    /// `set_root_directory` succeeds.
    pub fn new() -> Self { Self::default() }

    pub fn with_root<P: AsRef<Path>>(root: P) -> FileStoreResult<Self> {
        let mut store = Self::new();
        store.set_root_directory(root)?;
        Ok(store)
    }

    /// Point the store at an existing, writable directory.
    pub fn set_root_directory<P: AsRef<Path>>(&mut self, root: P) -> FileStoreResult<&mut Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(FileStoreError::RootNotFound { path: root.to_path_buf() });
        }
        if !is_writable(root) {
            return Err(FileStoreError::RootNotWritable { path: root.to_path_buf() });
        }
        let normalized = normalize_root(root).map_err(|e| FileStoreError::io(root, e))?;
        debug!(target: "ulpf::storage", "file_store: root set to '{}'", normalized.display());
        self.root = Some(normalized);
        Ok(self)
    }

    pub fn root(&self) -> Option<&Path> { self.root.as_deref() }

    fn root_dir(&self) -> FileStoreResult<&Path> {
        self.root.as_deref().ok_or(FileStoreError::RootNotSet)
    }

    /// Absolute path for `relative`, always at or below the root.
    pub fn get_real_file_path(&self, relative: &str) -> FileStoreResult<PathBuf> {
        Ok(resolve_under(self.root_dir()?, relative))
    }

    /// Create a directory and any missing parents.
    pub fn create_directory(&self, name: &str) -> FileStoreResult<&Self> {
        let dir = self.get_real_file_path(name)?;
        ensure_directory(&dir)?;
        Ok(self)
    }

    /// Write `content` to `relative`, replacing whatever was there.
    pub fn save_contents<C: AsRef<[u8]>>(&self, content: C, relative: &str) -> FileStoreResult<&Self> {
        let file = self.get_real_file_path(relative)?;
        if let Some(parent) = file.parent() {
            ensure_directory(parent)?;
        }
        fs::write(&file, content.as_ref()).map_err(|e| FileStoreError::io(&file, e))?;
        debug!(target: "ulpf::storage", "file_store: saved {} bytes to '{}'", content.as_ref().len(), file.display());
        Ok(self)
    }

    /// Open an existing file. The handle is closed when dropped.
    pub fn get_file_handle(&self, relative: &str, mode: FileMode) -> FileStoreResult<File> {
        let file = self.existing(relative)?;
        mode.open_options().open(&file).map_err(|e| FileStoreError::io(&file, e))
    }

    pub fn get_file_bytes(&self, relative: &str) -> FileStoreResult<Vec<u8>> {
        let file = self.existing(relative)?;
        fs::read(&file).map_err(|e| FileStoreError::io(&file, e))
    }

    pub fn get_file_contents(&self, relative: &str) -> FileStoreResult<String> {
        let file = self.existing(relative)?;
        fs::read_to_string(&file).map_err(|e| FileStoreError::io(&file, e))
    }

    /// Whether a file or directory exists at `relative`. Never fails; a store
    /// without a root contains nothing.
    pub fn file_exists(&self, relative: &str) -> bool {
        self.get_real_file_path(relative).map(|p| p.exists()).unwrap_or(false)
    }

    /// Remove a file, or a directory with everything below it.
    pub fn remove(&self, relative: &str) -> FileStoreResult<&Self> {
        let target = self.existing(relative)?;
        let meta = fs::symlink_metadata(&target).map_err(|e| FileStoreError::io(&target, e))?;
        if !meta.is_dir() {
            fs::remove_file(&target).map_err(|e| FileStoreError::io(&target, e))?;
            debug!(target: "ulpf::storage", "file_store: removed file '{}'", target.display());
            return Ok(self);
        }

        // Children are yielded before their parent and the target comes last
        let mut removed = 0usize;
        for entry in WalkDir::new(&target).contents_first(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| target.clone());
                let source = e.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                FileStoreError::io(path, source)
            })?;
            let path = entry.path();
            if entry.file_type().is_dir() {
                fs::remove_dir(path).map_err(|e| FileStoreError::io(path, e))?;
            } else {
                fs::remove_file(path).map_err(|e| FileStoreError::io(path, e))?;
            }
            tprintln!("[file_store.remove] removed '{}'", path.display());
            removed += 1;
        }
        debug!(target: "ulpf::storage", "file_store: removed directory '{}' ({} entries)", target.display(), removed);
        Ok(self)
    }

    fn existing(&self, relative: &str) -> FileStoreResult<PathBuf> {
        let path = self.get_real_file_path(relative)?;
        if !path.exists() {
            return Err(FileStoreError::NotFound { path });
        }
        Ok(path)
    }
}

/// Create `dir` and every missing ancestor, outermost first.
fn ensure_directory(dir: &Path) -> FileStoreResult<()> {
    let mut missing: Vec<&Path> = Vec::new();
    let mut cursor = Some(dir);
    while let Some(p) = cursor {
        if p.is_dir() {
            break;
        }
        missing.push(p);
        cursor = p.parent();
    }
    for p in missing.into_iter().rev() {
        match fs::create_dir(p) {
            Ok(()) => debug!(target: "ulpf::storage", "file_store: created directory '{}'", p.display()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && p.is_dir() => {}
            Err(e) => return Err(FileStoreError::io(p, e)),
        }
    }
    Ok(())
}

/// Probe by creating and dropping a temporary file inside `dir`.
fn is_writable(dir: &Path) -> bool {
    tempfile::Builder::new().prefix(".ulpf-probe-").tempfile_in(dir).is_ok()
}
