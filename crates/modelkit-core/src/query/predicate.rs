use super::value::SqlValue;
use crate::model::Column;

/// Comparison operators supported by [`Predicate::Compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A boolean condition over `simplemodel` columns
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare(Column, CompareOp, SqlValue),
    IsNull(Column),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CompareOp::Eq, value.into())
    }

    pub fn ne(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CompareOp::Ne, value.into())
    }

    pub fn lt(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CompareOp::Lt, value.into())
    }

    pub fn le(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CompareOp::Le, value.into())
    }

    pub fn gt(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CompareOp::Gt, value.into())
    }

    pub fn ge(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CompareOp::Ge, value.into())
    }

    pub fn is_null(column: Column) -> Self {
        Predicate::IsNull(column)
    }

    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::And(predicates.into_iter().collect())
    }

    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Or(predicates.into_iter().collect())
    }

    /// `self AND other`, flattening nested conjunctions
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut parts) => {
                parts.push(other);
                Predicate::And(parts)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    /// `self OR other`, flattening nested disjunctions
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut parts) => {
                parts.push(other);
                Predicate::Or(parts)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Render as SQL, appending bound values to `params`
    ///
    /// Placeholders are numbered (`?N`) from the current length of `params`,
    /// so several fragments can share one parameter list. `qualifier`
    /// prefixes column names (`t.col_1`) for joined queries.
    pub fn to_sql(&self, qualifier: Option<&str>, params: &mut Vec<SqlValue>) -> String {
        match self {
            // NULL never compares equal; match the row-value semantics callers expect
            Predicate::Compare(column, CompareOp::Eq, SqlValue::Null) => {
                format!("{} IS NULL", qualified(qualifier, *column))
            }
            Predicate::Compare(column, CompareOp::Ne, SqlValue::Null) => {
                format!("{} IS NOT NULL", qualified(qualifier, *column))
            }
            Predicate::Compare(column, op, value) => {
                params.push(value.clone());
                format!(
                    "{} {} ?{}",
                    qualified(qualifier, *column),
                    op.sql(),
                    params.len()
                )
            }
            Predicate::IsNull(column) => format!("{} IS NULL", qualified(qualifier, *column)),
            Predicate::And(parts) => join(parts, " AND ", "1 = 1", qualifier, params),
            Predicate::Or(parts) => join(parts, " OR ", "1 = 0", qualifier, params),
            Predicate::Not(inner) => format!("NOT ({})", inner.to_sql(qualifier, params)),
        }
    }
}

/// `table.column`, or the bare column name
pub(crate) fn qualified(qualifier: Option<&str>, column: Column) -> String {
    match qualifier {
        Some(q) => format!("{}.{}", q, column.name()),
        None => column.name().to_string(),
    }
}

fn join(
    parts: &[Predicate],
    separator: &str,
    empty: &str,
    qualifier: Option<&str>,
    params: &mut Vec<SqlValue>,
) -> String {
    match parts {
        [] => empty.to_string(),
        [single] => single.to_sql(qualifier, params),
        _ => parts
            .iter()
            .map(|p| format!("({})", p.to_sql(qualifier, params)))
            .collect::<Vec<_>>()
            .join(separator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelType;

    fn render(p: &Predicate) -> (String, Vec<SqlValue>) {
        let mut params = Vec::new();
        let sql = p.to_sql(None, &mut params);
        (sql, params)
    }

    #[test]
    fn test_simple_equality() {
        let (sql, params) = render(&Predicate::eq(Column::Col1, "foo"));
        assert_eq!(sql, "col_1 = ?1");
        assert_eq!(params, vec![SqlValue::Text("foo".to_string())]);
    }

    #[test]
    fn test_or_numbers_placeholders_in_order() {
        let p = Predicate::eq(Column::Col1, "foo").or(Predicate::eq(Column::Col2, "spam"));
        let (sql, params) = render(&p);
        assert_eq!(sql, "(col_1 = ?1) OR (col_2 = ?2)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_and_flattens() {
        let p = Predicate::eq(Column::Col1, "a")
            .and(Predicate::eq(Column::Col2, "b"))
            .and(Predicate::eq(Column::Type, ModelType::Super));
        match &p {
            Predicate::And(parts) => assert_eq!(parts.len(), 3),
            other => panic!("expected a conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_null_equality_becomes_is_null() {
        let (sql, params) = render(&Predicate::eq(Column::Value, None::<f64>));
        assert_eq!(sql, "value IS NULL");
        assert!(params.is_empty());

        let (sql, _) = render(&Predicate::ne(Column::Value, None::<f64>));
        assert_eq!(sql, "value IS NOT NULL");
    }

    #[test]
    fn test_empty_combinators() {
        assert_eq!(render(&Predicate::all([])).0, "1 = 1");
        assert_eq!(render(&Predicate::any([])).0, "1 = 0");
    }

    #[test]
    fn test_qualified_not() {
        let mut params = vec![SqlValue::Integer(0)];
        let sql = Predicate::gt(Column::Value, 1.5)
            .not()
            .to_sql(Some("t"), &mut params);
        assert_eq!(sql, "NOT (t.value > ?2)");
    }
}
