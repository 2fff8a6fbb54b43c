use super::naming::{ConstraintKind, NameParts, NamingConvention};

/// Store-side expression for "now", with millisecond precision
///
/// Writes `YYYY-MM-DD HH:MM:SS.SSS`, the layout of
/// [`TIMESTAMP_FORMAT`](crate::query::value::TIMESTAMP_FORMAT).
pub const CURRENT_TIMESTAMP_SQL: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Timestamp,
    Varchar(usize),
}

impl ColumnType {
    pub fn sql(&self) -> String {
        match self {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Timestamp => "DATETIME".to_string(),
            ColumnType::Varchar(len) => format!("VARCHAR({})", len),
        }
    }
}

/// Server-side default for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    CurrentTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnType,
    pub nullable: bool,
    pub default: Option<ColumnDefault>,
}

/// Table-level constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    PrimaryKey {
        columns: Vec<String>,
    },
    Unique {
        columns: Vec<String>,
    },
    /// `name` feeds `{constraint_name}` in the naming convention
    Check {
        name: String,
        expr: String,
    },
    ForeignKey {
        columns: Vec<String>,
        referred_table: String,
        referred_columns: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Structural contract of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
    constraints: Vec<Constraint>,
    indexes: Vec<Index>,
    naming: NamingConvention,
}

impl TableSchema {
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            schema: TableSchema {
                name: name.into(),
                columns: Vec::new(),
                constraints: Vec::new(),
                indexes: Vec::new(),
                naming: NamingConvention::default(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Declared width of a text column
    pub fn max_len(&self, column: &str) -> Option<usize> {
        match self.column(column)?.ty {
            ColumnType::Varchar(len) => Some(len),
            _ => None,
        }
    }

    /// Name of `constraint` under this table's naming convention
    pub fn constraint_name(&self, constraint: &Constraint) -> String {
        let (kind, parts) = match constraint {
            Constraint::PrimaryKey { columns } => {
                (ConstraintKind::PrimaryKey, self.parts(columns.first()))
            }
            Constraint::Unique { columns } => (ConstraintKind::Unique, self.parts(columns.first())),
            Constraint::Check { name, .. } => (
                ConstraintKind::Check,
                NameParts {
                    constraint_name: Some(name),
                    ..self.parts(None)
                },
            ),
            Constraint::ForeignKey {
                columns,
                referred_table,
                ..
            } => (
                ConstraintKind::ForeignKey,
                NameParts {
                    referred_table: Some(referred_table),
                    ..self.parts(columns.first())
                },
            ),
        };
        self.naming.name(kind, parts)
    }

    pub fn index_name(&self, index: &Index) -> String {
        self.naming
            .name(ConstraintKind::Index, self.parts(index.columns.first()))
    }

    /// Every constraint and index name, in declaration order
    pub fn constraint_names(&self) -> Vec<String> {
        self.constraints
            .iter()
            .map(|c| self.constraint_name(c))
            .chain(self.indexes.iter().map(|i| self.index_name(i)))
            .collect()
    }

    /// Name of the primary key or unique constraint covering exactly `columns`
    ///
    /// Column order does not matter. Used to turn a driver message such as
    /// `UNIQUE constraint failed: simplemodel.col_1, simplemodel.col_2` back
    /// into `uq_simplemodel_col_1`.
    pub fn key_constraint_for(&self, columns: &[&str]) -> Option<String> {
        let mut wanted: Vec<&str> = columns.to_vec();
        wanted.sort_unstable();

        self.constraints
            .iter()
            .find(|c| match c {
                Constraint::PrimaryKey { columns } | Constraint::Unique { columns } => {
                    let mut have: Vec<&str> = columns.iter().map(String::as_str).collect();
                    have.sort_unstable();
                    have == wanted
                }
                _ => false,
            })
            .map(|c| self.constraint_name(c))
            .or_else(|| {
                self.indexes
                    .iter()
                    .filter(|i| i.unique)
                    .find(|i| {
                        let mut have: Vec<&str> = i.columns.iter().map(String::as_str).collect();
                        have.sort_unstable();
                        have == wanted
                    })
                    .map(|i| self.index_name(i))
            })
    }

    /// `CREATE TABLE` followed by one `CREATE INDEX` per index
    pub fn create_sql(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.columns.iter().map(column_sql).collect();
        lines.extend(self.constraints.iter().map(|c| {
            let body = match c {
                Constraint::PrimaryKey { columns } => format!("PRIMARY KEY ({})", columns.join(", ")),
                Constraint::Unique { columns } => format!("UNIQUE ({})", columns.join(", ")),
                Constraint::Check { expr, .. } => format!("CHECK ({})", expr),
                Constraint::ForeignKey {
                    columns,
                    referred_table,
                    referred_columns,
                } => format!(
                    "FOREIGN KEY ({}) REFERENCES {} ({})",
                    columns.join(", "),
                    referred_table,
                    referred_columns.join(", ")
                ),
            };
            format!("CONSTRAINT {} {}", self.constraint_name(c), body)
        }));

        let mut statements = vec![format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.name,
            lines.join(",\n    ")
        )];

        statements.extend(self.indexes.iter().map(|index| {
            format!(
                "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
                if index.unique { "UNIQUE " } else { "" },
                self.index_name(index),
                self.name,
                index.columns.join(", ")
            )
        }));

        statements
    }

    /// Dropping the table drops its indexes with it
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    fn parts<'a>(&'a self, column_0: Option<&'a String>) -> NameParts<'a> {
        NameParts {
            table: &self.name,
            column_0: column_0.map(String::as_str),
            ..NameParts::default()
        }
    }
}

fn column_sql(column: &ColumnDef) -> String {
    let mut sql = format!("{} {}", column.name, column.ty.sql());
    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if let Some(ColumnDefault::CurrentTimestamp) = column.default {
        sql.push_str(&format!(" DEFAULT ({})", CURRENT_TIMESTAMP_SQL));
    }
    sql
}

/// Builder for [`TableSchema`]
///
/// Text columns get a length CHECK (`ck_<table>_<column>_length`) and enum
/// columns a membership CHECK (`ck_<table>_<column>`), so raw writes are held
/// to the same rules as typed ones.
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    schema: TableSchema,
}

impl TableSchemaBuilder {
    pub fn column(mut self, name: &str, ty: ColumnType, nullable: bool) -> Self {
        if let ColumnType::Varchar(len) = ty {
            self.schema.constraints.push(Constraint::Check {
                name: format!("{}_length", name),
                expr: format!("length({}) <= {}", name, len),
            });
        }
        self.schema.columns.push(ColumnDef {
            name: name.to_string(),
            ty,
            nullable,
            default: None,
        });
        self
    }

    /// Nullable timestamp defaulting to the store's current time
    pub fn timestamp_column(mut self, name: &str) -> Self {
        self.schema.columns.push(ColumnDef {
            name: name.to_string(),
            ty: ColumnType::Timestamp,
            nullable: true,
            default: Some(ColumnDefault::CurrentTimestamp),
        });
        self
    }

    /// Nullable text column restricted to `tags`
    pub fn enum_column(mut self, name: &str, tags: &[&str]) -> Self {
        let width = tags.iter().map(|t| t.len()).max().unwrap_or(1);
        let members = tags
            .iter()
            .map(|t| format!("'{}'", t.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(", ");
        self.schema.columns.push(ColumnDef {
            name: name.to_string(),
            ty: ColumnType::Varchar(width),
            nullable: true,
            default: None,
        });
        self.schema.constraints.push(Constraint::Check {
            name: name.to_string(),
            expr: format!("{} IN ({})", name, members),
        });
        self
    }

    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.schema.constraints.push(Constraint::PrimaryKey {
            columns: owned(columns),
        });
        self
    }

    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.schema.constraints.push(Constraint::Unique {
            columns: owned(columns),
        });
        self
    }

    pub fn check(mut self, name: &str, expr: &str) -> Self {
        self.schema.constraints.push(Constraint::Check {
            name: name.to_string(),
            expr: expr.to_string(),
        });
        self
    }

    pub fn foreign_key(mut self, columns: &[&str], referred_table: &str, referred_columns: &[&str]) -> Self {
        self.schema.constraints.push(Constraint::ForeignKey {
            columns: owned(columns),
            referred_table: referred_table.to_string(),
            referred_columns: owned(referred_columns),
        });
        self
    }

    pub fn index(mut self, columns: &[&str]) -> Self {
        self.schema.indexes.push(Index {
            columns: owned(columns),
            unique: false,
        });
        self
    }

    pub fn naming(mut self, naming: NamingConvention) -> Self {
        self.schema.naming = naming;
        self
    }

    pub fn build(self) -> TableSchema {
        self.schema
    }
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}
