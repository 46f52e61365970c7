//! Unified application error model and mapping helpers.
//! Each subsystem raises its own typed error; this module folds them into a
//! common enum that the presentation layer maps onto HTTP status codes.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::bootstrap::ConfigurationError;
use crate::datasource::{DatabaseError, MapperError};
use crate::storage::{CsvError, FileStoreError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    UserInput { code: String, message: String },
    NotFound { code: String, message: String },
    Database { code: String, message: String },
    Configuration { code: String, message: String },
    Io { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Database { code, .. }
            | AppError::Configuration { code, .. }
            | AppError::Io { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Database { message, .. }
            | AppError::Configuration { message, .. }
            | AppError::Io { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn user<S: Into<String>>(code: S, msg: S) -> Self { AppError::UserInput { code: code.into(), message: msg.into() } }
    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn database<S: Into<String>>(code: S, msg: S) -> Self { AppError::Database { code: code.into(), message: msg.into() } }
    pub fn configuration<S: Into<String>>(code: S, msg: S) -> Self { AppError::Configuration { code: code.into(), message: msg.into() } }
    pub fn io<S: Into<String>>(code: S, msg: S) -> Self { AppError::Io { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::NotFound { .. } => 404,
            AppError::Database { .. } => 500,
            AppError::Configuration { .. } => 500,
            AppError::Io { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Keep a wrapped AppError intact; anything else is internal
        match err.downcast::<AppError>() {
            Ok(app) => app,
            Err(other) => AppError::Internal { code: "internal".into(), message: other.to_string() },
        }
    }
}

impl From<FileStoreError> for AppError {
    fn from(err: FileStoreError) -> Self {
        let message = err.to_string();
        match err {
            FileStoreError::NotFound { .. } => AppError::NotFound { code: "file_not_found".into(), message },
            FileStoreError::RootNotFound { .. }
            | FileStoreError::RootNotWritable { .. }
            | FileStoreError::RootNotSet => AppError::Configuration { code: "file_root".into(), message },
            FileStoreError::Io { .. } => AppError::Io { code: "io".into(), message },
        }
    }
}

impl From<CsvError> for AppError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::FileStore(inner) => inner.into(),
            CsvError::Parse { .. } => AppError::UserInput { code: "csv_parse".into(), message: err.to_string() },
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        let message = err.to_string();
        match err {
            DatabaseError::NotFound { .. } => AppError::NotFound { code: "row_not_found".into(), message },
            DatabaseError::MultipleRows { .. } => AppError::Database { code: "multiple_rows".into(), message },
            DatabaseError::Driver(_) => AppError::Database { code: "database".into(), message },
        }
    }
}

impl From<MapperError> for AppError {
    fn from(err: MapperError) -> Self {
        match err {
            MapperError::Database(inner) => inner.into(),
            MapperError::EmptyPrimaryKey { .. } | MapperError::MissingKeyValue { .. } => {
                AppError::UserInput { code: "primary_key".into(), message: err.to_string() }
            }
        }
    }
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        AppError::Configuration { code: "configuration".into(), message: err.to_string() }
    }
}
