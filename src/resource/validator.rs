//! Registry validation: unique paths, tables and field names; defaults consistent with their fields.

use crate::error::ConfigError;
use crate::resource::types::{FieldDef, FieldDefault, FieldKind};
use crate::resource::ResourceRegistry;
use std::collections::HashSet;

pub fn validate(registry: &ResourceRegistry) -> Result<(), ConfigError> {
    let mut path_segments = HashSet::new();
    let mut tables = HashSet::new();

    for r in registry.resources() {
        if !path_segments.insert(r.path_segment) {
            return Err(ConfigError::DuplicatePathSegment(r.path_segment.to_string()));
        }
        if !tables.insert(r.table) {
            return Err(ConfigError::Validation(format!("table '{}' used twice", r.table)));
        }
        if r.fields.is_empty() {
            return Err(ConfigError::Validation(format!("{} declares no fields", r.name)));
        }

        let mut api_names = HashSet::new();
        let mut columns = HashSet::new();
        for f in &r.fields {
            if f.api_name == "id" || f.column == "id" {
                return Err(ConfigError::Validation(format!(
                    "{}: 'id' is assigned by the store",
                    r.name
                )));
            }
            if !api_names.insert(f.api_name) || !columns.insert(f.column) {
                return Err(ConfigError::Validation(format!(
                    "{}: duplicate field '{}'",
                    r.name, f.api_name
                )));
            }
            validate_default(r.name, f)?;
        }
    }
    Ok(())
}

fn validate_default(resource: &str, f: &FieldDef) -> Result<(), ConfigError> {
    let Some(default) = &f.default else {
        return Ok(());
    };
    if f.required {
        return Err(ConfigError::Validation(format!(
            "{}.{}: required fields cannot have a default",
            resource, f.api_name
        )));
    }
    let ok = match (&f.kind, default) {
        (FieldKind::Integer { min, max }, FieldDefault::Int(n)) => (*min..=*max).contains(n),
        (FieldKind::Choice { allowed }, FieldDefault::Text(s)) => allowed.contains(s),
        (FieldKind::Text, FieldDefault::Text(_)) => true,
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{}.{}: default does not satisfy the field type",
            resource, f.api_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceDef, UpdateMode};
    use axum::http::StatusCode;

    fn resource(path: &'static str, table: &'static str, fields: Vec<FieldDef>) -> ResourceDef {
        ResourceDef {
            name: "Thing",
            path_segment: path,
            table,
            fields,
            update_mode: UpdateMode::MergeUpdate,
            create_status: StatusCode::CREATED,
        }
    }

    #[test]
    fn standard_registry_is_valid() {
        assert!(validate(&ResourceRegistry::standard()).is_ok());
    }

    #[test]
    fn rejects_duplicate_path_segment() {
        let registry = ResourceRegistry::new(vec![
            resource("things", "a", vec![FieldDef::text("name", "name")]),
            resource("things", "b", vec![FieldDef::text("name", "name")]),
        ]);
        assert!(matches!(validate(&registry), Err(ConfigError::DuplicatePathSegment(p)) if p == "things"));
    }

    #[test]
    fn rejects_out_of_range_default() {
        let level = FieldDef::integer("level", "level", 1, 10)
            .with_default(FieldDefault::Int(11));
        let registry = ResourceRegistry::new(vec![resource("things", "things", vec![level])]);
        assert!(matches!(validate(&registry), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_default_on_required_field() {
        let name = FieldDef::text("name", "name")
            .required()
            .with_default(FieldDefault::Text("x"));
        let registry = ResourceRegistry::new(vec![resource("things", "things", vec![name])]);
        assert!(validate(&registry).is_err());
    }

    #[test]
    fn rejects_client_visible_id_field() {
        let registry = ResourceRegistry::new(vec![resource(
            "things",
            "things",
            vec![FieldDef::text("id", "id")],
        )]);
        assert!(validate(&registry).is_err());
    }
}
