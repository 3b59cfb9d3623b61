//! Request validation from resource descriptors.
//!
//! Both entry points return one bound value per declared field, in declaration order, ready
//! for the SQL builder. Failures never echo client input back.

use crate::error::AppError;
use crate::resource::{FieldDef, FieldKind, ResourceDef};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Request body: field name to value, absent keys distinguished from present ones.
pub type Fields = Map<String, Value>;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct RequestValidator;

impl RequestValidator {
    /// Create / full replace. Required fields must be present and non-empty; unset optional
    /// fields take their default, or NULL when they have none.
    pub fn validate(body: &Fields, resource: &ResourceDef) -> Result<Vec<Value>, AppError> {
        for f in resource.required_fields() {
            let present = body.get(f.api_name).map(is_present).unwrap_or(false);
            if !present {
                return Err(AppError::invalid(f.api_name, "required"));
            }
        }
        resource
            .fields
            .iter()
            .map(|f| match body.get(f.api_name) {
                Some(v) if !v.is_null() => normalize_field(f, v),
                _ => Ok(f.default.as_ref().map(|d| d.to_value()).unwrap_or(Value::Null)),
            })
            .collect()
    }

    /// Merge update. Absent or null fields bind as NULL so the stored value is kept; a present
    /// required field must still be non-empty.
    pub fn validate_partial(body: &Fields, resource: &ResourceDef) -> Result<Vec<Value>, AppError> {
        resource
            .fields
            .iter()
            .map(|f| match body.get(f.api_name) {
                Some(v) if !v.is_null() => {
                    if f.required && !is_present(v) {
                        return Err(AppError::invalid(f.api_name, "must not be empty"));
                    }
                    normalize_field(f, v)
                }
                _ => Ok(Value::Null),
            })
            .collect()
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Check `v` against the field kind and return the value to bind.
fn normalize_field(f: &FieldDef, v: &Value) -> Result<Value, AppError> {
    match &f.kind {
        FieldKind::Text => match v {
            Value::String(_) => Ok(v.clone()),
            _ => Err(AppError::invalid(f.api_name, "must be a string")),
        },
        FieldKind::Date => v
            .as_str()
            .and_then(parse_date)
            .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
            .ok_or_else(|| AppError::invalid(f.api_name, "must be a date (YYYY-MM-DD)")),
        FieldKind::Integer { min, max } => match v.as_i64() {
            Some(n) if (*min..=*max).contains(&n) => Ok(Value::Number(n.into())),
            _ => Err(AppError::invalid(
                f.api_name,
                format!("must be an integer between {} and {}", min, max),
            )),
        },
        FieldKind::Choice { allowed } => match v.as_str() {
            Some(s) if allowed.contains(&s) => Ok(v.clone()),
            _ => Err(AppError::invalid(
                f.api_name,
                format!("must be one of: {}", allowed.join(", ")),
            )),
        },
    }
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept.
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
