//!
//! ulpf datasource module
//! ----------------------
//! Row-level persistence for a single relational table. An `Entity` is an
//! in-memory record that remembers which fields changed since it was last in
//! sync with storage; a `Mapper` turns load/save/delete of entities into one
//! parameterized statement each and runs it through an injected
//! `DatabaseClient`.
//!
//! Table and field names are trusted identifiers and are only backtick
//! quoted. Values never reach the SQL text: they always travel as named
//! `:field` parameters.

mod client;
mod entity;
mod error;
mod mapper;
mod query;
mod value;

pub use client::{expect_single_row, DatabaseClient};
pub use entity::Entity;
pub use error::{DatabaseError, MapperError};
pub use mapper::Mapper;
pub use query::{BoundParam, Identifier, Statement};
pub use value::{Params, Row, Value};

#[cfg(test)]
mod mapper_tests;
