use serde::{Deserialize, Serialize};

/// Columns of the `simplemodel` table
///
/// Declaration order is the table's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    CreatedAt,
    ModifiedAt,
    #[serde(rename = "col_1")]
    Col1,
    #[serde(rename = "col_2")]
    Col2,
    Type,
    Value,
}

impl Column {
    /// All columns in table order
    pub const ALL: [Column; 7] = [
        Column::Id,
        Column::CreatedAt,
        Column::ModifiedAt,
        Column::Col1,
        Column::Col2,
        Column::Type,
        Column::Value,
    ];

    /// Column name as stored in the database
    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::CreatedAt => "created_at",
            Column::ModifiedAt => "modified_at",
            Column::Col1 => "col_1",
            Column::Col2 => "col_2",
            Column::Type => "type",
            Column::Value => "value",
        }
    }

    /// Look a column up by its stored name
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Columns the caller may assign after construction
    pub fn is_mutable(&self) -> bool {
        matches!(
            self,
            Column::Col1 | Column::Col2 | Column::Type | Column::Value
        )
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup_round_trips() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name("col_3"), None);
    }

    #[test]
    fn test_identity_columns_are_immutable() {
        assert!(!Column::Id.is_mutable());
        assert!(!Column::CreatedAt.is_mutable());
        assert!(!Column::ModifiedAt.is_mutable());
        assert!(Column::Col1.is_mutable());
    }
}
