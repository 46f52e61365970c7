use indexmap::IndexSet;

use super::value::{Row, Value};

/// In-memory record for one table row with dirty-field tracking.
///
/// An entity with no primary key fields is "new" and will be inserted on
/// save; one with primary key fields is "existing" and will be updated.
/// There is no other state: the mapper decides purely on these two sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    properties: Row,
    modified: IndexSet<String>,
    primary_key_fields: Vec<String>,
}

impl Entity {
    pub fn new() -> Self { Self::default() }

    /// Build an entity that is in sync with the given stored row.
    pub fn from_properties(properties: Row) -> Self {
        Self { properties, ..Self::default() }
    }

    /// Field value, or `None` when the field was never set or loaded.
    pub fn get(&self, name: &str) -> Option<&Value> { self.properties.get(name) }

    /// Store a value and mark the field modified, even when it is unchanged.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        self.modified.insert(name.clone());
        self.properties.insert(name, value.into());
        self
    }

    /// Replace every field and clear the dirty set.
    pub fn set_properties(&mut self, properties: Row) -> &mut Self {
        self.properties = properties;
        self.modified.clear();
        self
    }

    pub fn properties(&self) -> &Row { &self.properties }

    pub fn into_properties(self) -> Row { self.properties }

    pub fn set_primary_key_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn primary_key_fields(&self) -> &[String] { &self.primary_key_fields }

    /// Fields changed since the last `set_properties`, in first-change order.
    pub fn modified_properties(&self) -> Vec<&str> {
        self.modified.iter().map(String::as_str).collect()
    }

    pub fn is_dirty(&self) -> bool { !self.modified.is_empty() }

    pub fn is_new(&self) -> bool { self.primary_key_fields.is_empty() }
}
