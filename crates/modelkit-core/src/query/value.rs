use chrono::NaiveDateTime;

use crate::model::ModelType;

/// Timestamp text layout shared with the store's datetime columns
///
/// Always millisecond precision, the shape `strftime('%f')` writes, so
/// bound values and store-stamped values compare equal as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A value bound into a compiled query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<ModelType> for SqlValue {
    fn from(v: ModelType) -> Self {
        SqlValue::Text(v.encode().to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Text(v.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_enum_binds_as_tag() {
        assert_eq!(
            SqlValue::from(ModelType::Normal),
            SqlValue::Text("NORMAL".to_string())
        );
    }

    #[test]
    fn test_timestamp_layout() {
        let ts = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 45, 0)
            .unwrap();
        assert_eq!(
            SqlValue::from(ts),
            SqlValue::Text("2020-01-02 03:45:00.000".to_string())
        );
    }

    #[test]
    fn test_timestamp_truncates_to_milliseconds() {
        let ts = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 45, 6, 123_456)
            .unwrap();
        assert_eq!(
            SqlValue::from(ts),
            SqlValue::Text("2020-01-02 03:45:06.123".to_string())
        );
    }

    #[test]
    fn test_none_is_null() {
        assert!(SqlValue::from(None::<f64>).is_null());
        assert_eq!(SqlValue::from(Some(2i64)), SqlValue::Integer(2));
    }
}
