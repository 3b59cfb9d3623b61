//! Pool creation and create-if-missing DDL for the resource tables.

use crate::error::{AppError, StorageError};
use crate::resource::{FieldDef, FieldDefault, FieldKind, ResourceDef, ResourceRegistry};
use crate::sql::{quoted, ID_COLUMN};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Connect a pool whose `search_path` is `schema`, so statements use unqualified table names.
pub async fn create_pool(database_url: &str, schema: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Backend(format!("invalid DATABASE_URL: {}", e)))?
        .options([("search_path", schema)]);
    tracing::info!(schema, max_connections, "connecting to PostgreSQL");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opts)
        .await?;
    Ok(pool)
}

/// Create `schema` and one table per resource when missing. Existing tables are left untouched.
pub async fn ensure_resource_tables(pool: &PgPool, schema: &str, registry: &ResourceRegistry) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)))
        .execute(pool)
        .await?;
    for resource in registry.resources() {
        sqlx::query(&table_ddl(schema, resource)).execute(pool).await?;
        tracing::debug!(table = resource.table, "table ready");
    }
    Ok(())
}

fn table_ddl(schema: &str, resource: &ResourceDef) -> String {
    let mut cols = vec![format!("{} SERIAL PRIMARY KEY", quoted(ID_COLUMN))];
    cols.extend(resource.fields.iter().map(column_ddl));
    format!(
        "CREATE TABLE IF NOT EXISTS {}.{} ({})",
        quoted(schema),
        quoted(resource.table),
        cols.join(", ")
    )
}

fn column_ddl(f: &FieldDef) -> String {
    let col = quoted(f.column);
    let mut ddl = format!("{} {}", col, f.kind.pg_type().to_uppercase());
    if f.required {
        ddl.push_str(" NOT NULL");
    }
    match &f.default {
        Some(FieldDefault::Int(n)) => ddl.push_str(&format!(" DEFAULT {}", n)),
        Some(FieldDefault::Text(s)) => ddl.push_str(&format!(" DEFAULT {}", literal(s))),
        None => {}
    }
    match &f.kind {
        FieldKind::Integer { min, max } => {
            ddl.push_str(&format!(" CHECK ({} BETWEEN {} AND {})", col, min, max));
        }
        FieldKind::Choice { allowed } => {
            let list = allowed.iter().map(|a| literal(a)).collect::<Vec<_>>().join(", ");
            ddl.push_str(&format!(" CHECK ({} IN ({}))", col, list));
        }
        FieldKind::Text | FieldKind::Date => {}
    }
    ddl
}

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)
        .map_err(|e| StorageError::Backend(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| StorageError::Backend("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}
