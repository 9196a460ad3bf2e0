use super::*;
use crate::client::{ExecResult, Executor};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::{raw, record};
use std::sync::Mutex;

/// Records every statement and answers with canned rows.
#[derive(Default)]
struct Recorder {
    rows: Vec<Row>,
    result: ExecResult,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl Recorder {
    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn last(&self) -> (String, Vec<Value>) {
        self.calls().pop().expect("no statement was executed")
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
    }
}

impl Executor for Recorder {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, params);
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.record(sql, params);
        Ok(self.result)
    }
}

/// Fails every statement.
struct Broken;

#[derive(Debug, thiserror::Error)]
#[error("server has gone away")]
struct GoneAway;

impl Executor for Broken {
    async fn query(&self, _sql: &str, _params: &[Value]) -> OrmResult<Vec<Row>> {
        Err(OrmError::execution(GoneAway))
    }

    async fn execute(&self, _sql: &str, _params: &[Value]) -> OrmResult<ExecResult> {
        Err(OrmError::execution(GoneAway))
    }
}

fn users() -> Builder {
    Builder::table("users")
}

// ==================== Chaining ====================

#[test]
fn select_without_columns_selects_everything() {
    assert_eq!(users().query().columns, None);
    assert_eq!(
        users().select(&[]).query().columns,
        Some(vec!["*".to_string()])
    );
    assert_eq!(
        users().select_all().query().columns,
        Some(vec!["*".to_string()])
    );
}

#[test]
fn add_select_appends() {
    let builder = users().select(&["id"]).add_select(&["name", "email"]);
    assert_eq!(builder.to_sql(), "SELECT id, name, email FROM `users`");
}

#[test]
fn select_raw_binds_into_the_select_segment() {
    let builder = users()
        .where_eq("id", 1)
        .select_raw("IF(score > ?, 'hi', 'lo') AS band", [50]);
    assert_eq!(
        builder.to_sql(),
        "SELECT IF(score > ?, 'hi', 'lo') AS band FROM `users` WHERE `id` = ?"
    );
    assert_eq!(builder.get_bindings(), vec![Value::from(50), Value::from(1)]);
}

#[test]
fn order_and_limit_target_the_base_query_without_unions() {
    let builder = users().order_by("balance", "desc").limit(1).offset(2);
    let query = builder.query();
    assert_eq!(query.orders.len(), 1);
    assert_eq!(query.limit, 1);
    assert_eq!(query.offset, 2);
    assert!(query.union_orders.is_empty());
    assert_eq!(
        builder.to_sql(),
        "SELECT * FROM `users` ORDER BY balance DESC LIMIT 1 OFFSET 2"
    );
}

#[test]
fn order_and_limit_target_the_union_once_attached() {
    let builder = users()
        .order_by("id", "asc")
        .union_all(Builder::table("admins"))
        .order_by("balance", "desc")
        .take(1)
        .skip(3);
    let query = builder.query();

    assert_eq!(query.orders.len(), 1);
    assert_eq!(query.limit, 0);
    assert_eq!(query.offset, 0);
    assert_eq!(query.union_orders.len(), 1);
    assert_eq!(query.union_limit, 1);
    assert_eq!(query.union_offset, 3);
    assert_eq!(
        builder.to_sql(),
        "(SELECT * FROM `users` ORDER BY id ASC) UNION ALL SELECT * FROM `admins` ORDER BY balance DESC LIMIT 1 OFFSET 3"
    );
}

#[test]
fn order_by_raw_binds_into_the_order_segment() {
    let builder = users()
        .where_eq("a", 1)
        .order_by_raw("FIELD(status, ?, ?)", ["new", "old"]);
    assert_eq!(
        builder.to_sql(),
        "SELECT * FROM `users` WHERE `a` = ? ORDER BY FIELD(status, ?, ?)"
    );
    assert_eq!(builder.bindings().get(Segment::Order).len(), 2);
}

#[test]
#[should_panic(expected = "order direction")]
fn invalid_order_direction_panics() {
    let _ = users().order_by("id", "sideways");
}

#[test]
#[should_panic(expected = "unsupported join type")]
fn invalid_join_type_panics() {
    let _ = users().join_with("posts", "outer sideways", |j| j);
}

#[test]
fn add_binding_expands_lists() {
    let builder = users().add_binding(Value::list([1, 2]), Segment::Having);
    assert_eq!(builder.bindings().get(Segment::Having).len(), 2);
}

#[test]
fn clone_without_is_a_deep_copy() {
    let original = users()
        .select(&["name"])
        .order_by("id", "asc")
        .limit(10)
        .offset(5);
    let copy = original.clone_without(&[
        Property::Columns,
        Property::Orders,
        Property::Limit,
        Property::Offset,
    ]);

    assert_eq!(copy.to_sql(), "SELECT * FROM `users`");
    assert_eq!(
        original.to_sql(),
        "SELECT name FROM `users` ORDER BY id ASC LIMIT 10 OFFSET 5"
    );

    let extended = copy.where_eq("a", 1);
    assert!(original.query().wheres.is_empty());
    assert_eq!(extended.query().wheres.len(), 1);
}

#[test]
fn clone_without_bindings_leaves_the_original() {
    let original = users().select_raw("?", ["x"]).where_eq("a", 1);
    let copy = original.clone_without_bindings(&[Segment::Select]);
    assert_eq!(copy.get_bindings(), vec![Value::from(1)]);
    assert_eq!(original.get_bindings().len(), 2);
}

#[test]
fn aggregate_does_not_leak_select_bindings() {
    let builder = users()
        .select(&["name"])
        .select_raw("? AS tag", ["t"])
        .where_eq("gender", "F");
    let count = builder.aggregate_builder("COUNT", &["*"]);

    assert_eq!(count.get_bindings(), vec![Value::from("F")]);
    assert_eq!(builder.get_bindings().len(), 2);
    assert_eq!(builder.query().columns.as_ref().map(Vec::len), Some(2));
    assert!(builder.query().aggregate.is_none());
}

// ==================== Terminals ====================

#[tokio::test]
async fn get_installs_columns_temporarily() {
    let conn = Recorder::default();
    let builder = users().where_eq("id", 1);

    let _: Vec<Row> = builder.get_columns(&["id", "name"], &conn).await.unwrap();
    let _: Vec<Row> = builder.get(&conn).await.unwrap();

    let calls = conn.calls();
    assert_eq!(calls[0].0, "SELECT id, name FROM `users` WHERE `id` = ?");
    assert_eq!(calls[1].0, "SELECT * FROM `users` WHERE `id` = ?");
    assert_eq!(builder.query().columns, None);
}

#[tokio::test]
async fn explicit_selection_wins_over_requested_columns() {
    let conn = Recorder::default();
    let _: Vec<Row> = users()
        .select(&["email"])
        .get_columns(&["id"], &conn)
        .await
        .unwrap();
    assert_eq!(conn.last().0, "SELECT email FROM `users`");
}

#[tokio::test]
async fn first_applies_limit_one() {
    let conn = Recorder::with_rows(vec![
        Row::from_pairs([("name", "ada")]),
        Row::from_pairs([("name", "bob")]),
    ]);
    let builder = users().where_eq("gender", "F");

    let first: Option<(String,)> = builder.first(&conn).await.unwrap();

    assert_eq!(first, Some(("ada".to_string(),)));
    assert_eq!(conn.last().0, "SELECT * FROM `users` WHERE `gender` = ? LIMIT 1");
    assert_eq!(builder.query().limit, 0);
}

#[tokio::test]
async fn first_on_empty_result_is_none() {
    let conn = Recorder::default();
    let first: Option<Row> = users().first(&conn).await.unwrap();
    assert!(first.is_none());
}

#[tokio::test]
async fn count_runs_a_single_value_query() {
    let conn = Recorder::with_rows(vec![Row::from_pairs([("aggregate", 3_i64)])]);
    let builder = users().select(&["name"]).where_eq("gender", "M");

    let count = builder.count(&conn).await.unwrap();

    assert_eq!(count, 3);
    let (sql, params) = conn.last();
    assert_eq!(sql, "SELECT COUNT(*) AS aggregate FROM `users` WHERE `gender` = ?");
    assert_eq!(params, vec![Value::from("M")]);
}

#[tokio::test]
async fn min_max_sum_avg() {
    let conn = Recorder::with_rows(vec![Row::from_pairs([("aggregate", 12.5_f64)])]);

    let avg: f64 = users().avg("balance", &conn).await.unwrap();
    assert_eq!(avg, 12.5);
    assert_eq!(
        conn.last().0,
        "SELECT AVG(balance) AS aggregate FROM `users`"
    );

    let _: f64 = users().sum("balance", &conn).await.unwrap();
    assert_eq!(conn.last().0, "SELECT SUM(balance) AS aggregate FROM `users`");
    let _: f64 = users().min("balance", &conn).await.unwrap();
    assert_eq!(conn.last().0, "SELECT MIN(balance) AS aggregate FROM `users`");
    let _: f64 = users().max("balance", &conn).await.unwrap();
    assert_eq!(conn.last().0, "SELECT MAX(balance) AS aggregate FROM `users`");
}

#[tokio::test]
async fn null_aggregates_decode_into_option() {
    let conn = Recorder::with_rows(vec![Row::from_pairs([("aggregate", Value::Null)])]);
    let max: Option<i64> = users().max("id", &conn).await.unwrap();
    assert_eq!(max, None);

    let err = users().max::<i64>("id", &conn).await.unwrap_err();
    assert!(matches!(err, OrmError::Decode { .. }));
}

#[tokio::test]
async fn aggregate_without_rows_is_not_found() {
    let conn = Recorder::default();
    assert!(users().count(&conn).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn insert_and_inserts() {
    let conn = Recorder {
        result: ExecResult {
            last_insert_id: 9,
            rows_affected: 1,
        },
        ..Recorder::default()
    };

    let result = users()
        .insert(record! { "name" => "ada", "age" => 36 }, &conn)
        .await
        .unwrap();
    assert_eq!(result.last_insert_id, 9);
    let (sql, params) = conn.last();
    assert_eq!(sql, "INSERT INTO `users` (`age`, `name`) VALUES (?, ?)");
    assert_eq!(params, vec![Value::from(36), Value::from("ada")]);

    let err = users()
        .inserts(&[record! { "a" => 1 }, record! { "b" => 2 }], &conn)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn update_drops_expression_bindings() {
    let conn = Recorder {
        result: ExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        },
        ..Recorder::default()
    };

    let affected = users()
        .where_eq("id", 7)
        .update(
            record! { "balance" => raw("balance + 1"), "name" => "x" },
            &conn,
        )
        .await
        .unwrap();

    assert_eq!(affected, 2);
    let (sql, params) = conn.last();
    assert_eq!(
        sql,
        "UPDATE `users` SET `balance` = balance + 1, `name` = ? WHERE `id` = ?"
    );
    assert_eq!(params, vec![Value::from("x"), Value::from(7)]);
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let conn = Recorder::default();
    let err = users().update(record! {}, &conn).await.unwrap_err();
    assert!(err.is_validation());
    assert!(conn.calls().is_empty());
}

#[tokio::test]
async fn delete_by_id_qualifies_the_table() {
    let conn = Recorder::default();
    users().delete_by_id(4, &conn).await.unwrap();
    let (sql, params) = conn.last();
    assert_eq!(sql, "DELETE FROM `users` WHERE users.`id` = ?");
    assert_eq!(params, vec![Value::from(4)]);

    users().where_eq("spam", true).delete(&conn).await.unwrap();
    assert_eq!(conn.last().0, "DELETE FROM `users` WHERE `spam` = ?");
}

#[tokio::test]
async fn scan_returns_the_first_row() {
    let conn = Recorder::with_rows(vec![Row::from_pairs([("id", 1), ("name", 2)])]);
    let row = users().scan(&conn).await.unwrap().unwrap();
    assert_eq!(row.columns(), ["id".to_string(), "name".to_string()]);
}

#[tokio::test]
async fn executor_failures_propagate() {
    let err = users().get::<Row>(&Broken).await.unwrap_err();
    assert!(err.is_execution());
    assert_eq!(err.to_string(), "Execution error: server has gone away");

    let err = users().delete(&Broken).await.unwrap_err();
    assert!(err.is_execution());
}
