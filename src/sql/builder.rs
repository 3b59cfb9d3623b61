//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a resource descriptor.
//! Identifiers come from descriptors only; values are always parameters.

use crate::resource::{FieldDef, FieldKind, ResourceDef};
use serde_json::Value;

pub const ID_COLUMN: &str = "id";
/// Cast for the id placeholder; path ids are parsed as i64.
const ID_CAST: &str = "bigint";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// One SQL statement with its positional parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new() -> Self {
        Statement {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Statement {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Push a field value and return its cast placeholder, e.g. `$2::date`.
    fn placeholder(&mut self, field: &FieldDef, v: Value) -> String {
        let n = self.push_param(v);
        format!("${}::{}", n, field.kind.pg_type())
    }
}

/// SELECT / RETURNING list: columns aliased to their API names; dates rendered as text.
pub fn select_column_list(resource: &ResourceDef) -> String {
    let mut cols = vec![quoted(ID_COLUMN)];
    for f in &resource.fields {
        let mut expr = quoted(f.column);
        if f.kind == FieldKind::Date {
            expr.push_str("::text");
        }
        if f.column != f.api_name || f.kind == FieldKind::Date {
            cols.push(format!("{} AS {}", expr, quoted(f.api_name)));
        } else {
            cols.push(expr);
        }
    }
    cols.join(", ")
}

/// SELECT every row, ordered by id.
pub fn select_all(resource: &ResourceDef) -> Statement {
    let mut q = Statement::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(resource),
        quoted(resource.table),
        quoted(ID_COLUMN)
    );
    q
}

/// INSERT with one value per declared field (same order as `resource.fields`).
pub fn insert(resource: &ResourceDef, values: &[Value]) -> Statement {
    let mut q = Statement::new();
    let mut cols = Vec::with_capacity(resource.fields.len());
    let mut placeholders = Vec::with_capacity(resource.fields.len());
    for (f, v) in resource.fields.iter().zip(values) {
        cols.push(quoted(f.column));
        placeholders.push(q.placeholder(f, v.clone()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(resource.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(resource)
    );
    q
}

/// UPDATE by id overwriting every declared field.
pub fn replace(resource: &ResourceDef, id: i64, values: &[Value]) -> Statement {
    let mut q = Statement::new();
    let mut sets = Vec::with_capacity(resource.fields.len());
    for (f, v) in resource.fields.iter().zip(values) {
        let ph = q.placeholder(f, v.clone());
        sets.push(format!("{} = {}", quoted(f.column), ph));
    }
    finish_update(q, resource, id, sets)
}

/// UPDATE by id where a NULL parameter keeps the stored value.
pub fn merge_update(resource: &ResourceDef, id: i64, values: &[Value]) -> Statement {
    let mut q = Statement::new();
    let mut sets = Vec::with_capacity(resource.fields.len());
    for (f, v) in resource.fields.iter().zip(values) {
        let ph = q.placeholder(f, v.clone());
        let col = quoted(f.column);
        sets.push(format!("{} = COALESCE({}, {})", col, ph, col));
    }
    finish_update(q, resource, id, sets)
}

fn finish_update(mut q: Statement, resource: &ResourceDef, id: i64, sets: Vec<String>) -> Statement {
    let id_param = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}::{} RETURNING {}",
        quoted(resource.table),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_param,
        ID_CAST,
        select_column_list(resource)
    );
    q
}

/// DELETE by id. Returns nothing; a missing row is not an error.
pub fn delete(resource: &ResourceDef, id: i64) -> Statement {
    let mut q = Statement::new();
    q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = $1::{}",
        quoted(resource.table),
        quoted(ID_COLUMN),
        ID_CAST
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceRegistry;
    use serde_json::json;

    fn registry() -> ResourceRegistry {
        ResourceRegistry::standard()
    }

    #[test]
    fn select_aliases_renamed_and_date_columns() {
        let reg = registry();
        let we = reg.by_path("work-experiences").unwrap();
        assert_eq!(
            select_column_list(we),
            "\"id\", \"company_name\" AS \"company\", \"position\" AS \"title\", \
             \"start_date\"::text AS \"startDate\", \"end_date\"::text AS \"endDate\""
        );
    }

    #[test]
    fn select_all_orders_by_id() {
        let reg = registry();
        let q = select_all(reg.by_path("hobbies").unwrap());
        assert_eq!(q.sql, "SELECT \"id\", \"name\" FROM \"hobbies\" ORDER BY \"id\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_casts_every_placeholder() {
        let reg = registry();
        let lang = reg.by_path("languages").unwrap();
        let q = insert(lang, &[json!("Rust"), json!(5), json!("Programming")]);
        assert_eq!(
            q.sql,
            "INSERT INTO \"languages\" (\"name\", \"level\", \"type\") \
             VALUES ($1::text, $2::integer, $3::text) RETURNING \"id\", \"name\", \"level\", \"type\""
        );
        assert_eq!(q.params, vec![json!("Rust"), json!(5), json!("Programming")]);
    }

    #[test]
    fn merge_update_coalesces_each_field() {
        let reg = registry();
        let skill = reg.by_path("skills").unwrap();
        let q = merge_update(skill, 3, &[Value::Null, json!("Expert")]);
        assert_eq!(
            q.sql,
            "UPDATE \"skills\" SET \"name\" = COALESCE($1::text, \"name\"), \
             \"level\" = COALESCE($2::text, \"level\") WHERE \"id\" = $3::bigint RETURNING \"id\", \"name\", \"level\""
        );
        assert_eq!(q.params, vec![Value::Null, json!("Expert"), json!(3)]);
    }

    #[test]
    fn replace_overwrites_without_coalesce() {
        let reg = registry();
        let edu = reg.by_path("educations").unwrap();
        let q = replace(edu, 9, &[json!("MIT"), json!("BSc"), json!("2010-09-01"), Value::Null]);
        assert!(q.sql.starts_with("UPDATE \"educations\" SET \"institution\" = $1::text, \"degree\" = $2::text, \"start_date\" = $3::date, \"end_date\" = $4::date WHERE \"id\" = $5::bigint"));
        assert!(!q.sql.contains("COALESCE"));
        assert_eq!(q.params.len(), 5);
    }

    #[test]
    fn delete_binds_id_only() {
        let reg = registry();
        let q = delete(reg.by_path("references").unwrap(), 4);
        assert_eq!(q.sql, "DELETE FROM \"job_references\" WHERE \"id\" = $1::bigint");
        assert_eq!(q.params, vec![json!(4)]);
    }

    #[test]
    fn merge_sql_does_not_depend_on_supplied_fields() {
        let reg = registry();
        let lang = reg.by_path("languages").unwrap();
        let name_only = merge_update(lang, 1, &[json!("Ido"), Value::Null, Value::Null]);
        let level_only = merge_update(lang, 1, &[Value::Null, json!(8), Value::Null]);
        assert_eq!(name_only.sql, level_only.sql);
        for n in 1..=level_only.params.len() {
            let placeholder = format!("${n}::");
            assert!(level_only.sql.contains(&placeholder), "{placeholder} has no cast");
        }
    }

    #[test]
    fn quoted_escapes_double_quotes() {
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
    }
}
