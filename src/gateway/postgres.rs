//! PostgreSQL gateway over a sqlx pool.

use super::{Record, StorageGateway};
use crate::error::StorageError;
use crate::sql::{PgBindValue, Statement};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        PgGateway { pool }
    }
}

#[async_trait]
impl StorageGateway for PgGateway {
    async fn execute(&self, stmt: &Statement) -> Result<Vec<Record>, StorageError> {
        tracing::debug!(sql = %stmt.sql, params = ?stmt.params, "query");
        let mut query = sqlx::query(&stmt.sql);
        for p in &stmt.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_record).collect())
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Record {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

/// Result columns are integers or text; dates are selected as `::text`.
fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
