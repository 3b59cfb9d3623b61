//! Storage gateway: executes one parameterized statement and returns the resulting rows.

mod mock;
mod postgres;

pub use mock::RecordingGateway;
pub use postgres::PgGateway;

use crate::error::StorageError;
use crate::sql::Statement;
use async_trait::async_trait;

/// One row keyed by API field name.
pub type Record = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Run `stmt` and return every row it produced (empty for statements without RETURNING).
    async fn execute(&self, stmt: &Statement) -> Result<Vec<Record>, StorageError>;
}
