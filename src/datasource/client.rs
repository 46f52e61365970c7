use super::error::DatabaseError;
use super::value::{Params, Row};

/// Capability the mapper needs from a database connection.
///
/// Statements use backtick-quoted identifiers and named `:name`
/// placeholders; `params` keys are the placeholder names without the colon.
pub trait DatabaseClient {
    /// Run a query that must match exactly one row.
    /// Zero rows is `DatabaseError::NotFound`, more than one is
    /// `DatabaseError::MultipleRows`.
    fn fetch_one(&self, sql: &str, params: &Params) -> Result<Row, DatabaseError>;

    /// Run an INSERT/UPDATE/DELETE.
    fn query(&self, sql: &str, params: &Params) -> Result<(), DatabaseError>;
}

impl<T: DatabaseClient + ?Sized> DatabaseClient for &T {
    fn fetch_one(&self, sql: &str, params: &Params) -> Result<Row, DatabaseError> {
        (**self).fetch_one(sql, params)
    }

    fn query(&self, sql: &str, params: &Params) -> Result<(), DatabaseError> {
        (**self).query(sql, params)
    }
}

impl<T: DatabaseClient + ?Sized> DatabaseClient for Box<T> {
    fn fetch_one(&self, sql: &str, params: &Params) -> Result<Row, DatabaseError> {
        (**self).fetch_one(sql, params)
    }

    fn query(&self, sql: &str, params: &Params) -> Result<(), DatabaseError> {
        (**self).query(sql, params)
    }
}

/// Enforce the `fetch_one` contract over a driver's full result set.
pub fn expect_single_row(sql: &str, rows: Vec<Row>) -> Result<Row, DatabaseError> {
    let count = rows.len();
    let mut it = rows.into_iter();
    match (it.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(DatabaseError::NotFound { sql: sql.to_string() }),
        _ => Err(DatabaseError::MultipleRows { sql: sql.to_string(), count }),
    }
}
