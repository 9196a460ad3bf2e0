#![allow(dead_code)]

use fluorm::{ExecResult, Executor, OrmResult, Row, Value};
use std::sync::Mutex;

/// In-memory executor that records statements and replays canned results.
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    rows: Mutex<Vec<Row>>,
    result: Mutex<ExecResult>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning_rows(self, rows: Vec<Row>) -> Self {
        *self.rows.lock().unwrap() = rows;
        self
    }

    pub fn returning(self, last_insert_id: u64, rows_affected: u64) -> Self {
        *self.result.lock().unwrap() = ExecResult {
            last_insert_id,
            rows_affected,
        };
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> (String, Vec<Value>) {
        self.calls().pop().expect("no statement was executed")
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
    }
}

impl Executor for MemoryExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.record(sql, params);
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.record(sql, params);
        Ok(*self.result.lock().unwrap())
    }
}
