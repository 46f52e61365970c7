//! Statement construction with identifiers and values kept apart.
//! Identifiers are rendered into the SQL text; values only ever become
//! named parameters.

use std::fmt::{Display, Formatter};

use super::value::{Params, Value};

/// A trusted table or column name. Rendered backtick quoted, never escaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

    pub fn name(&self) -> &str { &self.0 }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}`", self.0)
    }
}

/// A column compared or assigned through a `:column` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    column: Identifier,
    value: Value,
}

impl BoundParam {
    pub fn new(column: impl Into<String>, value: Value) -> Self {
        Self { column: Identifier::new(column), value }
    }

    pub fn column(&self) -> &Identifier { &self.column }

    pub fn value(&self) -> &Value { &self.value }

    pub fn placeholder(&self) -> String { format!(":{}", self.column.name()) }

    /// `` `col` = :col ``
    fn equality(&self) -> String { format!("{} = {}", self.column, self.placeholder()) }
}

/// Final SQL text plus the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

pub(crate) struct StatementBuilder {
    sql: String,
    params: Params,
}

impl StatementBuilder {
    fn head(head: String) -> Self { Self { sql: head, params: Params::new() } }

    pub(crate) fn select_all(table: &Identifier) -> Self { Self::head(format!("SELECT * FROM {table}")) }

    pub(crate) fn insert(table: &Identifier) -> Self { Self::head(format!("INSERT INTO {table}")) }

    pub(crate) fn update(table: &Identifier) -> Self { Self::head(format!("UPDATE {table}")) }

    pub(crate) fn delete(table: &Identifier) -> Self { Self::head(format!("DELETE FROM {table}")) }

    pub(crate) fn set(self, assignments: Vec<BoundParam>) -> Self { self.clause(" SET ", ", ", assignments) }

    pub(crate) fn filter(self, predicates: Vec<BoundParam>) -> Self { self.clause(" WHERE ", " AND ", predicates) }

    fn clause(mut self, keyword: &str, separator: &str, parts: Vec<BoundParam>) -> Self {
        let rendered: Vec<String> = parts.iter().map(BoundParam::equality).collect();
        self.sql.push_str(keyword);
        self.sql.push_str(&rendered.join(separator));
        for p in parts {
            self.params.insert(p.column.0, p.value);
        }
        self
    }

    pub(crate) fn build(self) -> Statement { Statement { sql: self.sql, params: self.params } }
}
