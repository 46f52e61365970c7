use tracing::debug;

use super::client::DatabaseClient;
use super::entity::Entity;
use super::error::MapperError;
use super::query::{BoundParam, Identifier, Statement, StatementBuilder};
use super::value::{Row, Value};

/// Loads and saves entities of one table through a database client.
///
/// The mapper holds no state besides its client and table name, so one
/// instance serves any number of entities of the same shape.
pub struct Mapper<C> {
    client: C,
    table: Identifier,
}

impl<C: DatabaseClient> Mapper<C> {
    pub fn new(client: C, table: impl Into<String>) -> Self {
        Self { client, table: Identifier::new(table) }
    }

    pub fn table(&self) -> &str { self.table.name() }

    pub fn client(&self) -> &C { &self.client }

    /// Load the single row matching every column of `primary_key`.
    ///
    /// Zero or multiple matches surface as the client's `DatabaseError`.
    /// The returned entity is clean and its primary key fields are the keys
    /// of `primary_key`, in the given order.
    pub fn load(&self, primary_key: &Row) -> Result<Entity, MapperError> {
        if primary_key.is_empty() {
            return Err(self.empty_key("load"));
        }
        let predicates = primary_key
            .iter()
            .map(|(field, value)| BoundParam::new(field.as_str(), value.clone()))
            .collect();
        let stmt = StatementBuilder::select_all(&self.table).filter(predicates).build();
        log_statement("load", &stmt);
        let row = self.client.fetch_one(&stmt.sql, &stmt.params)?;

        let mut entity = Entity::new();
        entity
            .set_properties(row)
            .set_primary_key_fields(primary_key.keys().cloned());
        Ok(entity)
    }

    /// Persist the entity's modified fields.
    ///
    /// Nothing is sent when no field is modified. A new entity (no primary
    /// key fields) is inserted; an existing one is updated, matching on the
    /// current values of its primary key fields.
    pub fn save(&self, entity: &Entity) -> Result<&Self, MapperError> {
        let changes = entity.modified_properties();
        if changes.is_empty() {
            debug!(target: "ulpf::datasource", "mapper.save: table='{}' no changes, skipping", self.table.name());
            return Ok(self);
        }
        let assignments = changes
            .iter()
            .map(|field| BoundParam::new(*field, entity.get(field).cloned().unwrap_or(Value::Null)))
            .collect();

        let stmt = if entity.is_new() {
            StatementBuilder::insert(&self.table).set(assignments).build()
        } else {
            let predicates = key_predicates(entity)?;
            StatementBuilder::update(&self.table).set(assignments).filter(predicates).build()
        };
        log_statement("save", &stmt);
        self.client.query(&stmt.sql, &stmt.params)?;
        Ok(self)
    }

    /// Delete the row identified by the entity's primary key fields.
    /// The number of affected rows is not checked.
    pub fn delete(&self, entity: &Entity) -> Result<&Self, MapperError> {
        if entity.is_new() {
            return Err(self.empty_key("delete"));
        }
        let stmt = StatementBuilder::delete(&self.table).filter(key_predicates(entity)?).build();
        log_statement("delete", &stmt);
        self.client.query(&stmt.sql, &stmt.params)?;
        Ok(self)
    }

    fn empty_key(&self, operation: &'static str) -> MapperError {
        MapperError::EmptyPrimaryKey { table: self.table.name().to_string(), operation }
    }
}

fn key_predicates(entity: &Entity) -> Result<Vec<BoundParam>, MapperError> {
    entity
        .primary_key_fields()
        .iter()
        .map(|field| match entity.get(field) {
            Some(value) => Ok(BoundParam::new(field.as_str(), value.clone())),
            None => Err(MapperError::MissingKeyValue { field: field.clone() }),
        })
        .collect()
}

fn log_statement(op: &str, stmt: &Statement) {
    // Parameter values stay out of the logs
    let names: Vec<&str> = stmt.params.keys().map(String::as_str).collect();
    debug!(target: "ulpf::datasource", "mapper.{}: sql='{}' params={:?}", op, stmt.sql, names);
}
