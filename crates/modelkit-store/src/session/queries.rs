//! Read-only query surface of [`Session`]
//!
//! Every query is compiled to SQL and evaluated by the database; results
//! are mapped back into records owned by the session.

use rusqlite::params_from_iter;

use modelkit_core::{Column, Model, Predicate, Query, SimpleModel};

use super::aggregate::{Aggregate, Annotated, TypeAggregate};
use super::rows::{self, decode_tag, to_values, RawRow};
use super::Session;
use crate::errors::{from_rusqlite, not_found, Result};

impl Session<'_> {
    /// Number of records matching `query` (paging included)
    pub fn count(&self, query: &Query) -> Result<u64> {
        let compiled = query.compile(None);
        let sql = format!(
            "SELECT COUNT(*) FROM (SELECT id FROM {}{})",
            SimpleModel::table_name(),
            compiled.tail()
        );
        tracing::debug!(sql = %sql, "count");

        let count: i64 = self
            .conn()
            .query_row(&sql, params_from_iter(to_values(&compiled.params)), |row| {
                row.get(0)
            })
            .map_err(from_rusqlite)?;
        Ok(count as u64)
    }

    /// Whether any record matches `predicate`
    pub fn exists(&self, predicate: &Predicate) -> Result<bool> {
        let compiled = Query::new().filter(predicate.clone()).compile(None);
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {}{})",
            SimpleModel::table_name(),
            compiled.tail()
        );
        tracing::debug!(sql = %sql, "exists");

        self.conn()
            .query_row(&sql, params_from_iter(to_values(&compiled.params)), |row| {
                row.get(0)
            })
            .map_err(from_rusqlite)
    }

    /// Fully loaded records matching `query`
    ///
    /// # Errors
    /// * `Validation` - a stored type tag is not a `ModelType` tag
    pub fn fetch(&self, query: &Query) -> Result<Vec<SimpleModel>> {
        self.fetch_only(query, &Column::ALL)
    }

    /// First record matching `query`, if any
    pub fn first(&self, query: &Query) -> Result<Option<SimpleModel>> {
        Ok(self.fetch(&query.clone().limit(1))?.into_iter().next())
    }

    /// Records matching `query` with only `columns` (and `id`) loaded
    ///
    /// Reading any other attribute fails with `NotLoaded` until the record is
    /// refreshed, and with `DetachedAccess` once the session has ended.
    pub fn fetch_only(&self, query: &Query, columns: &[Column]) -> Result<Vec<SimpleModel>> {
        let columns = rows::projection(columns);
        let compiled = query.compile(None);
        let sql = format!(
            "SELECT {} FROM {}{}",
            rows::select_list(None, &columns),
            SimpleModel::table_name(),
            compiled.tail()
        );
        tracing::debug!(sql = %sql, "fetch");

        let mut stmt = self.conn().prepare(&sql).map_err(from_rusqlite)?;
        let raw_rows = stmt
            .query_map(params_from_iter(to_values(&compiled.params)), |row| {
                RawRow::read(row, 0, &columns)
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        raw_rows
            .into_iter()
            .map(|raw| Ok(SimpleModel::from_row(raw.decode()?, self.token.link())))
            .collect()
    }

    /// Record with the given id, if it exists
    pub fn get(&self, id: i64) -> Result<Option<SimpleModel>> {
        self.first(&Query::new().filter_by(Column::Id, id))
    }

    /// Reload every attribute of `record` from the store
    ///
    /// Discards unsaved assignments.
    ///
    /// # Errors
    /// * `InvalidState` - the record is not persistent in this session
    /// * `NotFound` - the row no longer exists
    pub fn refresh(&self, record: &mut SimpleModel) -> Result<()> {
        self.require_owned(record, "refresh")?;
        let id = record.id().unwrap_or_default();
        let raw = self.load_raw(id)?.ok_or_else(|| not_found("refresh", id))?;
        record.apply_row(raw.decode()?);
        Ok(())
    }

    /// Average, sum and count of `value` over the records matching `query`
    pub fn aggregate(&self, query: &Query) -> Result<Aggregate> {
        let compiled = query.compile(None);
        let sql = format!(
            "SELECT AVG(value), SUM(value), COUNT(value) FROM (SELECT value FROM {}{})",
            SimpleModel::table_name(),
            compiled.tail()
        );
        tracing::debug!(sql = %sql, "aggregate");

        self.conn()
            .query_row(&sql, params_from_iter(to_values(&compiled.params)), |row| {
                Ok(Aggregate {
                    avg: row.get(0)?,
                    sum: row.get(1)?,
                    count: row.get::<_, i64>(2)? as u64,
                })
            })
            .map_err(from_rusqlite)
    }

    /// [`Session::aggregate`] grouped by `type`, ordered by type
    ///
    /// Ordering and paging of `query` are ignored; records without a type
    /// form their own group, first.
    pub fn aggregate_by_type(&self, query: &Query) -> Result<Vec<TypeAggregate>> {
        let compiled = query.unordered().compile(None);
        let sql = format!(
            "SELECT type, AVG(value), SUM(value), COUNT(value) FROM {}{} GROUP BY type ORDER BY type",
            SimpleModel::table_name(),
            compiled.tail()
        );
        tracing::debug!(sql = %sql, "aggregate_by_type");

        let mut stmt = self.conn().prepare(&sql).map_err(from_rusqlite)?;
        let groups = stmt
            .query_map(params_from_iter(to_values(&compiled.params)), |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        groups
            .into_iter()
            .map(|(tag, avg, sum, count)| {
                Ok(TypeAggregate {
                    model_type: decode_tag(tag.as_deref())?,
                    avg,
                    sum,
                    count: count as u64,
                })
            })
            .collect()
    }

    /// Records matching `query`, each joined with the aggregate of all
    /// records sharing its type
    ///
    /// The per-type aggregate covers the whole table; `query` only selects
    /// which records are returned. Without an explicit ordering the rows come
    /// back ordered by type, then id. Records without a type have no group
    /// and are not returned.
    pub fn annotate_with_type_aggregates(&self, query: &Query) -> Result<Vec<Annotated>> {
        let table = SimpleModel::table_name();
        let columns = rows::projection(&Column::ALL);

        let mut compiled = query.compile(Some("m"));
        if compiled.order_sql.is_empty() {
            compiled.order_sql = "m.type ASC, m.id ASC".to_string();
        }

        let sql = format!(
            "SELECT {select}, g.avg_value, g.sum_value \
             FROM {table} AS m \
             JOIN (SELECT type, AVG(value) AS avg_value, SUM(value) AS sum_value \
                   FROM {table} GROUP BY type) AS g \
             ON g.type = m.type{tail}",
            select = rows::select_list(Some("m"), &columns),
            table = table,
            tail = compiled.tail()
        );
        tracing::debug!(sql = %sql, "annotate_with_type_aggregates");

        let avg_idx = columns.len() + 1;
        let mut stmt = self.conn().prepare(&sql).map_err(from_rusqlite)?;
        let raw_rows = stmt
            .query_map(params_from_iter(to_values(&compiled.params)), |row| {
                Ok((
                    RawRow::read(row, 0, &columns)?,
                    row.get::<_, Option<f64>>(avg_idx)?,
                    row.get::<_, Option<f64>>(avg_idx + 1)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        raw_rows
            .into_iter()
            .map(|(raw, avg, sum)| {
                Ok(Annotated {
                    record: SimpleModel::from_row(raw.decode()?, self.token.link()),
                    avg,
                    sum,
                })
            })
            .collect()
    }
}
