//! Convert serde_json::Value to a value sqlx can bind.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A bound parameter. Every placeholder is declared TEXT and carries an explicit cast
/// (`$2::integer`, `$3::date`), so the prepared statement's parameter types depend only on
/// the SQL text, never on whether a value was supplied.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Text(String),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::String(s) => PgBindValue::Text(s.clone()),
            other => PgBindValue::Text(other.to_string()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Null => Ok(IsNull::Yes),
            PgBindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
        }
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::Type;

    #[test]
    fn numbers_are_sent_as_their_decimal_text() {
        assert_eq!(PgBindValue::from_json(&json!(7)), PgBindValue::Text("7".into()));
        assert_eq!(PgBindValue::from_json(&json!(-12)), PgBindValue::Text("-12".into()));
    }

    #[test]
    fn strings_and_nulls() {
        assert_eq!(
            PgBindValue::from_json(&json!("2021-09-01")),
            PgBindValue::Text("2021-09-01".into())
        );
        assert_eq!(PgBindValue::from_json(&Value::Null), PgBindValue::Null);
    }

    #[test]
    fn declared_type_is_the_same_for_null_and_supplied_values() {
        let text = <String as Type<Postgres>>::type_info();
        assert_eq!(<PgBindValue as Type<Postgres>>::type_info(), text);
        for v in [Value::Null, json!(8), json!("Natural"), json!("2020-01-01")] {
            let bound = PgBindValue::from_json(&v);
            let declared = <PgBindValue as Encode<Postgres>>::produces(&bound)
                .unwrap_or_else(<PgBindValue as Type<Postgres>>::type_info);
            assert_eq!(declared, text, "{v}");
        }
    }
}
