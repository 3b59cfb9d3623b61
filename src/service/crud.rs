//! Generic CRUD contract shared by every resource: validate, issue exactly one statement, map the result.

use crate::error::{AppError, StorageError};
use crate::gateway::{Record, StorageGateway};
use crate::resource::{ResourceDef, UpdateMode};
use crate::service::validation::{Fields, RequestValidator};
use crate::sql::{delete, insert, merge_update, replace, select_all};

pub struct CrudService;

impl CrudService {
    /// Insert one row. Returns the stored row, including its id and substituted defaults.
    pub async fn create(
        gateway: &dyn StorageGateway,
        resource: &ResourceDef,
        body: &Fields,
    ) -> Result<Record, AppError> {
        let values = RequestValidator::validate(body, resource)?;
        let q = insert(resource, &values);
        let row = gateway.execute(&q).await?.into_iter().next().ok_or_else(|| {
            AppError::Storage(StorageError::Backend(format!(
                "insert into {} returned no row",
                resource.table
            )))
        })?;
        tracing::info!(resource = resource.name, id = ?row.get("id"), "created");
        Ok(row)
    }

    /// Every stored row of the resource.
    pub async fn list(
        gateway: &dyn StorageGateway,
        resource: &ResourceDef,
    ) -> Result<Vec<Record>, AppError> {
        let q = select_all(resource);
        Ok(gateway.execute(&q).await?)
    }

    /// Update one row using the resource's declared update mode. A missing row is `NotFound`.
    pub async fn update(
        gateway: &dyn StorageGateway,
        resource: &ResourceDef,
        id: i64,
        body: &Fields,
    ) -> Result<Record, AppError> {
        let q = match resource.update_mode {
            UpdateMode::ReplaceAll => {
                let values = RequestValidator::validate(body, resource)?;
                replace(resource, id, &values)
            }
            UpdateMode::MergeUpdate => {
                let values = RequestValidator::validate_partial(body, resource)?;
                merge_update(resource, id, &values)
            }
        };
        let row = gateway
            .execute(&q)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(resource.not_found_message()))?;
        tracing::info!(resource = resource.name, id, mode = ?resource.update_mode, "updated");
        Ok(row)
    }

    /// Delete one row by id. Succeeds whether or not the row existed.
    pub async fn delete(
        gateway: &dyn StorageGateway,
        resource: &ResourceDef,
        id: i64,
    ) -> Result<(), AppError> {
        let q = delete(resource, id);
        gateway.execute(&q).await?;
        tracing::info!(resource = resource.name, id, "deleted");
        Ok(())
    }

    /// Path ids are positive integers assigned by the store.
    pub fn parse_id(id_str: &str) -> Result<i64, AppError> {
        match id_str.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AppError::invalid("id", "must be a positive integer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RecordingGateway;
    use crate::resource::ResourceRegistry;
    use serde_json::{json, Value};

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    #[tokio::test]
    async fn create_with_missing_field_never_touches_storage() {
        let reg = ResourceRegistry::standard();
        let gateway = RecordingGateway::new();
        for r in reg.resources() {
            let err = CrudService::create(&gateway, r, &Fields::new()).await.unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }), "{}", r.name);
        }
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn create_echoes_the_stored_row() {
        let reg = ResourceRegistry::standard();
        let lang = reg.by_path("languages").unwrap();
        let gateway = RecordingGateway::new();
        gateway.return_rows(vec![json!({ "id": 1, "name": "English", "level": 5, "type": "Natural" })]);

        let row = CrudService::create(&gateway, lang, &fields(json!({ "name": "English" })))
            .await
            .unwrap();
        assert_eq!(Value::Object(row), json!({ "id": 1, "name": "English", "level": 5, "type": "Natural" }));

        let stmt = gateway.last_call().unwrap();
        assert!(stmt.sql.starts_with("INSERT INTO \"languages\""));
        assert_eq!(stmt.params, vec![json!("English"), json!(5), json!("Natural")]);
    }

    #[tokio::test]
    async fn update_with_no_returned_row_is_not_found() {
        let reg = ResourceRegistry::standard();
        for r in reg.resources() {
            let gateway = RecordingGateway::new();
            let body = fields(json!({
                "name": "x", "institution": "x", "degree": "x", "company": "x",
                "title": "x", "startDate": "2020-01-01"
            }));
            let err = CrudService::update(&gateway, r, 404, &body).await.unwrap_err();
            match err {
                AppError::NotFound(msg) => assert_eq!(msg, format!("{} not found", r.name)),
                other => panic!("{}: expected not found, got {other:?}", r.name),
            }
            assert_eq!(gateway.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn merge_update_only_binds_supplied_fields() {
        let reg = ResourceRegistry::standard();
        let lang = reg.by_path("languages").unwrap();
        let gateway = RecordingGateway::new();
        gateway.return_rows(vec![json!({ "id": 3, "name": "A", "level": 7, "type": "Natural" })]);

        let row = CrudService::update(&gateway, lang, 3, &fields(json!({ "level": 7 })))
            .await
            .unwrap();
        assert_eq!(row["name"], "A");
        assert_eq!(row["level"], 7);

        let stmt = gateway.last_call().unwrap();
        assert!(stmt.sql.contains("\"name\" = COALESCE($1::text, \"name\")"));
        assert_eq!(stmt.params, vec![Value::Null, json!(7), Value::Null, json!(3)]);
    }

    #[tokio::test]
    async fn replace_update_revalidates_required_fields() {
        let reg = ResourceRegistry::standard();
        let hobby = reg.by_path("hobbies").unwrap();
        let gateway = RecordingGateway::new();
        let err = CrudService::update(&gateway, hobby, 1, &Fields::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn delete_succeeds_without_a_row() {
        let reg = ResourceRegistry::standard();
        let gateway = RecordingGateway::new();
        let skill = reg.by_path("skills").unwrap();
        assert!(CrudService::delete(&gateway, skill, 12).await.is_ok());
        assert!(CrudService::delete(&gateway, skill, 12).await.is_ok());
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_storage_error() {
        let reg = ResourceRegistry::standard();
        let gateway = RecordingGateway::new();
        gateway.return_err("Database error");
        let err = CrudService::list(&gateway, reg.by_path("projects").unwrap()).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn parse_id_rejects_non_positive_and_garbage() {
        assert_eq!(CrudService::parse_id("42").unwrap(), 42);
        assert!(CrudService::parse_id("0").is_err());
        assert!(CrudService::parse_id("-1").is_err());
        assert!(CrudService::parse_id("abc").is_err());
    }
}
