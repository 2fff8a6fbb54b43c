use super::predicate::{qualified, Predicate};
use super::value::SqlValue;
use crate::model::Column;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Filter, ordering and paging for a `simplemodel` query
///
/// ```
/// use modelkit_core::{Column, Predicate, Query};
///
/// let query = Query::new()
///     .filter(Predicate::eq(Column::Col1, "foo").or(Predicate::eq(Column::Col2, "spam")))
///     .order_by(Column::Col1);
/// let compiled = query.compile(None);
/// assert_eq!(compiled.where_sql, "(col_1 = ?1) OR (col_2 = ?2)");
/// assert_eq!(compiled.order_sql, "col_1 ASC");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    filter: Option<Predicate>,
    order_by: Vec<(Column, Direction)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// SQL fragments produced by [`Query::compile`]
///
/// Fragments are empty strings when the query has no such clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub where_sql: String,
    pub order_sql: String,
    pub limit_sql: String,
    pub params: Vec<SqlValue>,
}

impl CompiledQuery {
    /// ` WHERE ... ORDER BY ... LIMIT ...`, ready to append to a SELECT
    pub fn tail(&self) -> String {
        let mut sql = String::new();
        if !self.where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_sql);
        }
        if !self.order_sql.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_sql);
        }
        if !self.limit_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&self.limit_sql);
        }
        sql
    }
}

impl Query {
    /// Match every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; repeated calls are combined with AND
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Shorthand for `filter(Predicate::eq(column, value))`
    pub fn filter_by(self, column: Column, value: impl Into<SqlValue>) -> Self {
        self.filter(Predicate::eq(column, value))
    }

    pub fn order_by(mut self, column: Column) -> Self {
        self.order_by.push((column, Direction::Asc));
        self
    }

    pub fn order_by_desc(mut self, column: Column) -> Self {
        self.order_by.push((column, Direction::Desc));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub fn ordering(&self) -> &[(Column, Direction)] {
        &self.order_by
    }

    /// Same filter, no ordering or paging (for counts and aggregates)
    pub fn unordered(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            ..Self::default()
        }
    }

    /// Compile into SQL fragments
    ///
    /// `qualifier` prefixes every column (used when the table is aliased in a
    /// join).
    pub fn compile(&self, qualifier: Option<&str>) -> CompiledQuery {
        self.compile_after(qualifier, Vec::new())
    }

    /// Compile with `params` already bound ahead of this query's own values
    pub fn compile_after(&self, qualifier: Option<&str>, mut params: Vec<SqlValue>) -> CompiledQuery {
        let where_sql = self
            .filter
            .as_ref()
            .map(|p| p.to_sql(qualifier, &mut params))
            .unwrap_or_default();

        let order_sql = self
            .order_by
            .iter()
            .map(|(column, direction)| {
                let dir = match direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                format!("{} {}", qualified(qualifier, *column), dir)
            })
            .collect::<Vec<_>>()
            .join(", ");

        // SQLite requires LIMIT whenever OFFSET is present
        let limit_sql = match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => format!("LIMIT {} OFFSET {}", limit, offset),
            (Some(limit), None) => format!("LIMIT {}", limit),
            (None, Some(offset)) => format!("LIMIT -1 OFFSET {}", offset),
            (None, None) => String::new(),
        };

        CompiledQuery {
            where_sql,
            order_sql,
            limit_sql,
            params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_empty_tail() {
        assert_eq!(Query::new().compile(None).tail(), "");
    }

    #[test]
    fn test_repeated_filters_are_conjoined() {
        let compiled = Query::new()
            .filter_by(Column::Col1, "foo")
            .filter_by(Column::Col2, "eggs")
            .compile(None);
        assert_eq!(compiled.where_sql, "(col_1 = ?1) AND (col_2 = ?2)");
    }

    #[test]
    fn test_tail_with_everything() {
        let compiled = Query::new()
            .filter_by(Column::Col1, "foo")
            .order_by_desc(Column::Col1)
            .limit(10)
            .offset(5)
            .compile(Some("t"));
        assert_eq!(
            compiled.tail(),
            " WHERE t.col_1 = ?1 ORDER BY t.col_1 DESC LIMIT 10 OFFSET 5"
        );
    }

    #[test]
    fn test_offset_without_limit() {
        let compiled = Query::new().offset(3).compile(None);
        assert_eq!(compiled.limit_sql, "LIMIT -1 OFFSET 3");
    }

    #[test]
    fn test_compile_after_continues_numbering() {
        let compiled = Query::new()
            .filter_by(Column::Value, 5.0)
            .compile_after(None, vec![SqlValue::Integer(1)]);
        assert_eq!(compiled.where_sql, "value = ?2");
        assert_eq!(compiled.params.len(), 2);
    }

    #[test]
    fn test_unordered_drops_ordering_and_paging() {
        let q = Query::new()
            .filter_by(Column::Col1, "foo")
            .order_by(Column::Col1)
            .limit(1);
        let unordered = q.unordered();
        assert_eq!(unordered.predicate(), q.predicate());
        assert!(unordered.ordering().is_empty());
        assert_eq!(unordered.compile(None).limit_sql, "");
    }
}
