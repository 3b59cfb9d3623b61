//! Resource descriptors: one `ResourceDef` per collection, one `FieldDef` per column.

use axum::http::StatusCode;
use serde_json::Value;

/// How a stored value is typed on the wire and in SQL.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    /// Calendar date, `YYYY-MM-DD` on the wire, `DATE` in the store.
    Date,
    Integer { min: i64, max: i64 },
    Choice { allowed: &'static [&'static str] },
}

impl FieldKind {
    /// PostgreSQL type used for placeholder casts and DDL.
    pub fn pg_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Choice { .. } => "text",
            FieldKind::Date => "date",
            FieldKind::Integer { .. } => "integer",
        }
    }
}

/// Default substituted when an optional field is not supplied.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldDefault {
    Int(i64),
    Text(&'static str),
}

impl FieldDefault {
    pub fn to_value(&self) -> Value {
        match self {
            FieldDefault::Int(n) => Value::Number((*n).into()),
            FieldDefault::Text(s) => Value::String((*s).to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Key used in request and response bodies.
    pub api_name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<FieldDefault>,
    pub description: &'static str,
}

impl FieldDef {
    const fn of_kind(api_name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        FieldDef {
            api_name,
            column,
            kind,
            required: false,
            default: None,
            description: "",
        }
    }

    pub const fn text(api_name: &'static str, column: &'static str) -> Self {
        Self::of_kind(api_name, column, FieldKind::Text)
    }

    pub const fn date(api_name: &'static str, column: &'static str) -> Self {
        Self::of_kind(api_name, column, FieldKind::Date)
    }

    /// Integer within `min..=max`.
    pub const fn integer(api_name: &'static str, column: &'static str, min: i64, max: i64) -> Self {
        Self::of_kind(api_name, column, FieldKind::Integer { min, max })
    }

    /// Text restricted to `allowed`.
    pub const fn choice(
        api_name: &'static str,
        column: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        Self::of_kind(api_name, column, FieldKind::Choice { allowed })
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Update semantics a resource commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Required fields re-validated; every declared field is overwritten.
    ReplaceAll,
    /// Only supplied fields overwrite; absent fields keep their stored value.
    MergeUpdate,
}

#[derive(Clone, Debug)]
pub struct ResourceDef {
    /// Singular display name, e.g. `Skill`.
    pub name: &'static str,
    /// URL path segment, e.g. `skills`.
    pub path_segment: &'static str,
    pub table: &'static str,
    pub fields: Vec<FieldDef>,
    pub update_mode: UpdateMode,
    pub create_status: StatusCode,
}

impl ResourceDef {
    pub fn field(&self, api_name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.api_name == api_name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.name)
    }
}
