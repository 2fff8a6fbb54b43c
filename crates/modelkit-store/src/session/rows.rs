//! Row mapping between `simplemodel` rows and records
//!
//! Values are read raw inside the driver callback and decoded afterwards,
//! so an invalid stored tag surfaces as a `Validation` error rather than a
//! driver conversion failure.

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::Row;

use modelkit_core::model::RowImage;
use modelkit_core::{Attr, Column, ModelType, SqlValue};

use crate::errors::Result;

/// Bindable driver value for a compiled query parameter
pub(crate) fn to_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(*v),
        SqlValue::Real(v) => Value::Real(*v),
        SqlValue::Text(v) => Value::Text(v.clone()),
    }
}

pub(crate) fn to_values(values: &[SqlValue]) -> Vec<Value> {
    values.iter().map(to_value).collect()
}

/// Selected columns without `id` (always selected first) and without repeats
pub(crate) fn projection(columns: &[Column]) -> Vec<Column> {
    let mut out: Vec<Column> = Vec::with_capacity(columns.len());
    for column in columns {
        if *column != Column::Id && !out.contains(column) {
            out.push(*column);
        }
    }
    out
}

/// `id, <columns...>`, optionally qualified with a table alias
pub(crate) fn select_list(qualifier: Option<&str>, columns: &[Column]) -> String {
    std::iter::once(Column::Id)
        .chain(columns.iter().copied())
        .map(|c| match qualifier {
            Some(q) => format!("{}.{}", q, c.name()),
            None => c.name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// A row as read from the driver, type tag still encoded
#[derive(Debug)]
pub(crate) struct RawRow {
    id: i64,
    created_at: Attr<Option<NaiveDateTime>>,
    modified_at: Attr<Option<NaiveDateTime>>,
    col_1: Attr<Option<String>>,
    col_2: Attr<Option<String>>,
    type_tag: Attr<Option<String>>,
    value: Attr<Option<f64>>,
}

impl RawRow {
    /// Read `id` and `columns` from the result columns starting at `offset`
    pub(crate) fn read(row: &Row<'_>, offset: usize, columns: &[Column]) -> rusqlite::Result<Self> {
        let mut raw = RawRow {
            id: row.get(offset)?,
            created_at: Attr::Unloaded,
            modified_at: Attr::Unloaded,
            col_1: Attr::Unloaded,
            col_2: Attr::Unloaded,
            type_tag: Attr::Unloaded,
            value: Attr::Unloaded,
        };

        for (i, column) in columns.iter().enumerate() {
            let idx = offset + 1 + i;
            match column {
                Column::Id => {}
                Column::CreatedAt => raw.created_at = Attr::Loaded(row.get(idx)?),
                Column::ModifiedAt => raw.modified_at = Attr::Loaded(row.get(idx)?),
                Column::Col1 => raw.col_1 = Attr::Loaded(row.get(idx)?),
                Column::Col2 => raw.col_2 = Attr::Loaded(row.get(idx)?),
                Column::Type => raw.type_tag = Attr::Loaded(row.get(idx)?),
                Column::Value => raw.value = Attr::Loaded(row.get(idx)?),
            }
        }

        Ok(raw)
    }

    /// Decode the type tag
    ///
    /// # Errors
    /// * `Validation` - the stored tag is not a `ModelType` tag
    pub(crate) fn decode(self) -> Result<RowImage> {
        let model_type = match self.type_tag {
            Attr::Loaded(tag) => Attr::Loaded(decode_tag(tag.as_deref())?),
            Attr::Unloaded => Attr::Unloaded,
        };

        Ok(RowImage {
            id: self.id,
            created_at: self.created_at,
            modified_at: self.modified_at,
            col_1: self.col_1,
            col_2: self.col_2,
            model_type,
            value: self.value,
        })
    }
}

/// Decode an optional stored tag
pub(crate) fn decode_tag(tag: Option<&str>) -> Result<Option<ModelType>> {
    let decoded = tag.map(ModelType::decode).transpose()?;
    Ok(decoded)
}
