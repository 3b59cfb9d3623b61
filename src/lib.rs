//! Resume API: CRUD over seven resume collections backed by PostgreSQL.

pub mod config;
pub mod docs;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod resource;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError, StorageError};
pub use gateway::{PgGateway, RecordingGateway, StorageGateway};
pub use resource::{ResourceDef, ResourceRegistry, UpdateMode};
pub use routes::{app, common_routes, resource_routes, Limits};
pub use service::CrudService;
pub use state::AppState;
pub use store::{create_pool, ensure_database_exists, ensure_resource_tables};
