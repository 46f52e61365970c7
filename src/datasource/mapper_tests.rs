use std::cell::RefCell;
use std::collections::VecDeque;

use super::*;

/// Captures every statement and answers `fetch_one` from a queue.
#[derive(Default)]
struct RecordingClient {
    fetched: RefCell<Vec<(String, Params)>>,
    queried: RefCell<Vec<(String, Params)>>,
    answers: RefCell<VecDeque<Result<Row, DatabaseError>>>,
}

impl RecordingClient {
    fn answering(answer: Result<Row, DatabaseError>) -> Self {
        let c = Self::default();
        c.answers.borrow_mut().push_back(answer);
        c
    }

    fn queries(&self) -> Vec<(String, Params)> { self.queried.borrow().clone() }
}

impl DatabaseClient for RecordingClient {
    fn fetch_one(&self, sql: &str, params: &Params) -> Result<Row, DatabaseError> {
        self.fetched.borrow_mut().push((sql.to_string(), params.clone()));
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(DatabaseError::NotFound { sql: sql.to_string() }))
    }

    fn query(&self, sql: &str, params: &Params) -> Result<(), DatabaseError> {
        self.queried.borrow_mut().push((sql.to_string(), params.clone()));
        Ok(())
    }
}

fn row(pairs: &[(&str, Value)]) -> Row {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn load_existing_entity() {
    let client = RecordingClient::answering(Ok(row(&[
        ("userId", Value::Int(1)),
        ("userName", Value::from("John")),
    ])));
    let mapper = Mapper::new(&client, "users");

    let user = mapper.load(&row(&[("userId", Value::Int(1))])).unwrap();

    let fetched = client.fetched.borrow();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].0, "SELECT * FROM `users` WHERE `userId` = :userId");
    assert_eq!(fetched[0].1, row(&[("userId", Value::Int(1))]));
    assert_eq!(user.get("userName"), Some(&Value::from("John")));
    assert_eq!(user.primary_key_fields(), ["userId".to_string()]);
    assert!(!user.is_dirty());
}

#[test]
fn load_missing_entity_propagates_not_found() {
    let client = RecordingClient::answering(Err(DatabaseError::NotFound { sql: "x".into() }));
    let mapper = Mapper::new(&client, "users");

    let err = mapper.load(&row(&[("userId", Value::Int(1))])).unwrap_err();
    assert!(matches!(err, MapperError::Database(DatabaseError::NotFound { .. })));
    assert_eq!(client.fetched.borrow().len(), 1);
}

#[test]
fn load_with_composite_key_keeps_key_order() {
    let client = RecordingClient::answering(Ok(row(&[
        ("orderId", Value::Int(7)),
        ("line", Value::Int(2)),
        ("qty", Value::Int(5)),
    ])));
    let mapper = Mapper::new(&client, "order_lines");

    let line = mapper
        .load(&row(&[("orderId", Value::Int(7)), ("line", Value::Int(2))]))
        .unwrap();

    assert_eq!(
        client.fetched.borrow()[0].0,
        "SELECT * FROM `order_lines` WHERE `orderId` = :orderId AND `line` = :line"
    );
    assert_eq!(line.primary_key_fields(), ["orderId".to_string(), "line".to_string()]);
}

#[test]
fn load_rejects_empty_key() {
    let client = RecordingClient::default();
    let mapper = Mapper::new(&client, "users");
    let err = mapper.load(&Row::new()).unwrap_err();
    assert!(matches!(err, MapperError::EmptyPrimaryKey { operation: "load", .. }));
    assert!(client.fetched.borrow().is_empty());
}

#[test]
fn save_existing_entity_with_changes() {
    let mut user = Entity::new();
    user.set_primary_key_fields(["userId"]);
    user.set_properties(row(&[("userId", Value::Int(2))]));
    user.set("name", "Fritz");

    let client = RecordingClient::default();
    Mapper::new(&client, "users").save(&user).unwrap();

    let queries = client.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, "UPDATE `users` SET `name` = :name WHERE `userId` = :userId");
    assert_eq!(queries[0].1, row(&[("name", Value::from("Fritz")), ("userId", Value::Int(2))]));
}

#[test]
fn save_without_changes_issues_no_query() {
    let user = Entity::new();
    let client = RecordingClient::default();
    Mapper::new(&client, "users").save(&user).unwrap();
    assert!(client.queries().is_empty());

    let mut loaded = Entity::from_properties(row(&[("userId", Value::Int(4))]));
    loaded.set_primary_key_fields(["userId"]);
    Mapper::new(&client, "users").save(&loaded).unwrap();
    assert!(client.queries().is_empty());
}

#[test]
fn save_new_entity_inserts_dirty_fields() {
    let mut user = Entity::new();
    user.set("name", "Kola");

    let client = RecordingClient::default();
    Mapper::new(&client, "users").save(&user).unwrap();

    let queries = client.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, "INSERT INTO `users` SET `name` = :name");
    assert_eq!(queries[0].1, row(&[("name", Value::from("Kola"))]));
}

#[test]
fn save_reads_key_from_current_values() {
    let mut user = Entity::from_properties(row(&[("userId", Value::Int(2)), ("name", Value::from("A"))]));
    user.set_primary_key_fields(["userId"]);
    user.set("userId", 9).set("name", "B");

    let client = RecordingClient::default();
    Mapper::new(&client, "users").save(&user).unwrap();

    let (sql, params) = &client.queries()[0];
    assert_eq!(sql, "UPDATE `users` SET `userId` = :userId, `name` = :name WHERE `userId` = :userId");
    assert_eq!(params.get("userId"), Some(&Value::Int(9)));
}

#[test]
fn save_fails_when_key_value_missing() {
    let mut user = Entity::new();
    user.set_primary_key_fields(["userId"]);
    user.set("name", "Ghost");

    let client = RecordingClient::default();
    let err = Mapper::new(&client, "users").save(&user).err().unwrap();
    assert!(matches!(err, MapperError::MissingKeyValue { ref field } if field == "userId"));
    assert!(client.queries().is_empty());
}

#[test]
fn delete_existing_entity() {
    let mut user = Entity::new();
    user.set_primary_key_fields(["userId"]);
    user.set_properties(row(&[("userId", Value::Int(3)), ("name", Value::from("Obi"))]));

    let client = RecordingClient::default();
    Mapper::new(&client, "users").delete(&user).unwrap();

    let queries = client.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, "DELETE FROM `users` WHERE `userId` = :userId");
    assert_eq!(queries[0].1, row(&[("userId", Value::Int(3))]));
}

#[test]
fn delete_new_entity_is_rejected() {
    let mut user = Entity::new();
    user.set("name", "Nobody");
    let client = RecordingClient::default();
    let err = Mapper::new(&client, "users").delete(&user).err().unwrap();
    assert!(matches!(err, MapperError::EmptyPrimaryKey { operation: "delete", .. }));
    assert!(client.queries().is_empty());
}

#[test]
fn mapper_calls_chain() {
    let mut a = Entity::new();
    a.set("name", "a");
    let mut b = Entity::from_properties(row(&[("id", Value::Int(1))]));
    b.set_primary_key_fields(["id"]);

    let client = RecordingClient::default();
    let mapper = Mapper::new(Box::new(client), "things");
    mapper.save(&a).unwrap().delete(&b).unwrap();
    assert_eq!(mapper.client().queries().len(), 2);
}
