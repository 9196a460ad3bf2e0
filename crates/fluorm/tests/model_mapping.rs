mod common;

use common::MemoryExecutor;
use fluorm::{Connection, FromRow, Model, OrmError, Row, Value};

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[orm(table = "users")]
struct User {
    #[orm(id)]
    id: i64,
    name: String,
    #[orm(column = "ct")]
    count: i64,
    email: Option<String>,
    #[orm(ignore)]
    scratch: String,
}

#[derive(Debug, Default, Model)]
struct AuditLog {
    #[orm(tag = "primary_key;column:log_id")]
    id: u64,
    #[orm(tag = "column:created;size:64")]
    created_at: String,
}

#[test]
fn schema_is_derived_from_attributes() {
    assert_eq!(User::table_name(), "users");

    let schema = User::schema();
    assert_eq!(schema.primary_field().map(|f| f.column()), Some("id"));
    assert_eq!(schema.field("count").map(|f| f.column()), Some("ct"));
    assert!(schema.field("scratch").is_some_and(|f| f.is_ignored()));
    assert_eq!(
        schema.columns().collect::<Vec<_>>(),
        vec!["id", "name", "ct", "email"]
    );
    assert!(std::ptr::eq(schema, User::schema()));
}

#[test]
fn table_defaults_to_snake_case_and_tags_merge() {
    assert_eq!(AuditLog::table_name(), "audit_log");

    let schema = AuditLog::schema();
    assert_eq!(schema.primary_field().map(|f| f.column()), Some("log_id"));
    let created = schema.field("created_at").unwrap();
    assert_eq!(created.column(), "created");
    assert_eq!(created.attr("size"), Some("64"));
}

#[test]
fn rows_map_by_column_name() {
    let row = Row::from_pairs([
        ("id", Value::from(1)),
        ("name", Value::from("ada")),
        ("ct", Value::from(5)),
        ("count", Value::from(99)),
        ("scratch", Value::from("ignored")),
        ("unknown", Value::from("x")),
    ]);

    let user = User::from_row(&row).unwrap();

    assert_eq!(
        user,
        User {
            id: 1,
            name: "ada".to_string(),
            count: 5,
            email: None,
            scratch: String::new(),
        }
    );
}

#[test]
fn rows_coerce_compatible_values() {
    let row = Row::from_pairs([
        ("id", Value::from("42")),
        ("ct", Value::from(3.0)),
        ("email", Value::Bytes(b"a@b.c".to_vec())),
    ]);

    let user = User::from_row(&row).unwrap();

    assert_eq!(user.id, 42);
    assert_eq!(user.count, 3);
    assert_eq!(user.email.as_deref(), Some("a@b.c"));
}

#[test]
fn conversion_failures_name_the_column() {
    let row = Row::from_pairs([("ct", "many")]);
    match User::from_row(&row) {
        Err(OrmError::Decode { column, .. }) => assert_eq!(column, "ct"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn attributes_skip_ignored_fields() {
    let user = User {
        id: 3,
        name: "bob".to_string(),
        count: 2,
        email: Some("bob@example.com".to_string()),
        scratch: "temp".to_string(),
    };

    let attributes = user.attributes();

    assert_eq!(
        attributes.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["ct", "email", "id", "name"]
    );
    assert_eq!(attributes["email"], Value::from("bob@example.com"));
    assert_eq!(user.primary_key(), Some(Value::from(3)));
}

#[test]
fn set_primary_key_coerces_the_generated_id() {
    let mut log = AuditLog::default();
    log.set_primary_key(Value::from(17_u64)).unwrap();
    assert_eq!(log.id, 17);

    let mut user = User::default();
    assert!(user.set_column("nope", Value::from(1)).is_ok_and(|found| !found));
    assert!(user.set_column("name", Value::from("eve")).unwrap());
    assert_eq!(user.name, "eve");
}

#[tokio::test]
async fn model_queries_map_results() {
    let conn = Connection::new(MemoryExecutor::new().returning_rows(vec![Row::from_pairs([
        ("id", Value::from(1)),
        ("name", Value::from("ada")),
        ("ct", Value::from(7)),
    ])]));

    let users: Vec<User> = conn
        .model::<User>()
        .where_eq("name", "ada")
        .get(&conn)
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].count, 7);
    let (sql, params) = conn.executor().last();
    assert_eq!(sql, "SELECT * FROM `users` WHERE `name` = ?");
    assert_eq!(params, vec![Value::from("ada")]);
}
