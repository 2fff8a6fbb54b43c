use super::table::TableSchema;

/// A record type backed by a table
pub trait Model {
    /// Name used in diagnostics and error messages
    const TYPE_NAME: &'static str;

    /// Table name, derived from the type name
    fn table_name() -> String {
        Self::TYPE_NAME.to_lowercase()
    }

    fn schema() -> &'static TableSchema;
}

/// Shared schema metadata for every registered record type
///
/// Tables are kept in registration order; creation walks them forwards and
/// dropping walks them backwards so referenced tables outlive referrers.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `M`; registering the same table twice is a no-op
    pub fn register<M: Model>(&mut self) -> &mut Self {
        let schema = M::schema();
        if self.get(schema.name()).is_none() {
            self.tables.push(schema.clone());
        }
        self
    }

    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name() == table)
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Name of the key constraint on `table` covering exactly `columns`
    pub fn resolve_key_constraint(&self, table: &str, columns: &[&str]) -> Option<String> {
        self.get(table)?.key_constraint_for(columns)
    }
}
