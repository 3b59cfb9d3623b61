//! In-memory gateway for tests: replays scripted results and records every statement it receives.
//!
//! ```
//! use resume_api::gateway::{RecordingGateway, StorageGateway};
//! use resume_api::sql::Statement;
//! use serde_json::json;
//!
//! # tokio_test_block_on(async {
//! let gateway = RecordingGateway::new();
//! gateway.return_rows(vec![json!({ "id": 1, "name": "Reading" })]);
//!
//! let rows = gateway.execute(&Statement::raw("SELECT 1")).await.unwrap();
//! assert_eq!(rows[0]["name"], "Reading");
//! assert_eq!(gateway.call_count(), 1);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use super::{Record, StorageGateway};
use crate::error::StorageError;
use crate::sql::Statement;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Once the script is exhausted every statement succeeds with no rows.
#[derive(Default)]
pub struct RecordingGateway {
    script: Mutex<VecDeque<Result<Vec<Record>, StorageError>>>,
    calls: Mutex<Vec<Statement>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result. Non-object values are skipped.
    pub fn return_rows(&self, rows: Vec<Value>) -> &Self {
        let records = rows
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect();
        lock(&self.script).push_back(Ok(records));
        self
    }

    /// Queue a failure carrying `message`.
    pub fn return_err(&self, message: &str) -> &Self {
        lock(&self.script).push_back(Err(StorageError::Backend(message.to_string())));
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn last_call(&self) -> Option<Statement> {
        lock(&self.calls).last().cloned()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl StorageGateway for RecordingGateway {
    async fn execute(&self, stmt: &Statement) -> Result<Vec<Record>, StorageError> {
        lock(&self.calls).push(stmt.clone());
        lock(&self.script).pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_script_in_order() {
        let gateway = RecordingGateway::new();
        gateway
            .return_rows(vec![json!({ "id": 1 })])
            .return_err("boom");

        let first = gateway.execute(&Statement::raw("SELECT 1")).await;
        assert_eq!(first.unwrap().len(), 1);
        let second = gateway.execute(&Statement::raw("SELECT 2")).await;
        assert!(matches!(second, Err(StorageError::Backend(m)) if m == "boom"));
        let third = gateway.execute(&Statement::raw("SELECT 3")).await;
        assert!(third.unwrap().is_empty());

        assert_eq!(gateway.call_count(), 3);
        assert_eq!(gateway.last_call().map(|s| s.sql), Some("SELECT 3".to_string()));
    }
}
