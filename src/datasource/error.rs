use thiserror::Error;

/// Failures raised by a `DatabaseClient`.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A point lookup matched no row.
    #[error("no row found for query: {sql}")]
    NotFound { sql: String },
    /// A point lookup matched more than one row.
    #[error("expected exactly one row, got {count} for query: {sql}")]
    MultipleRows { sql: String, count: usize },
    /// Anything the underlying driver reports.
    #[error("database error: {0}")]
    Driver(String),
}

/// Failures raised by `Mapper` operations.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("{operation} on `{table}` requires at least one primary key field")]
    EmptyPrimaryKey { table: String, operation: &'static str },
    #[error("primary key field `{field}` has no value")]
    MissingKeyValue { field: String },
}
