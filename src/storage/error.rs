use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("Root directory {} does not exist", path.display())]
    RootNotFound { path: PathBuf },
    #[error("Root directory {} is not writeable", path.display())]
    RootNotWritable { path: PathBuf },
    #[error("Root directory is not set")]
    RootNotSet,
    #[error("File does not exist")]
    NotFound { path: PathBuf },
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileStoreError::Io { path: path.into(), source }
    }
}

#[derive(Debug, Error)]
pub enum CsvError {
    #[error(transparent)]
    FileStore(#[from] FileStoreError),
    #[error("CSV parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
