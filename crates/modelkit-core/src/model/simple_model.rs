use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use super::attr::Attr;
use super::column::Column;
use super::lifecycle::{RecordState, SessionLink};
use super::model_type::ModelType;
use super::repr;
use crate::errors::{ModelError, Result};
use crate::query::SqlValue;
use crate::schema::{ColumnType, Model, TableSchema};

/// Maximum length of the `col_1` / `col_2` text columns
pub const TEXT_COLUMN_MAX_LEN: usize = 100;

/// Where a record is in its lifecycle, independent of session liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Transient,
    Pending,
    Persistent,
    Deleted,
}

/// One row of the `simplemodel` table
///
/// `id` and `created_at` have no setters: the id is assigned by the store at
/// the first commit and `created_at` can only be overridden on a transient
/// record through [`SimpleModelBuilder`].
#[derive(Clone)]
pub struct SimpleModel {
    id: Option<i64>,
    created_at: Attr<Option<NaiveDateTime>>,
    modified_at: Attr<Option<NaiveDateTime>>,
    col_1: Attr<Option<String>>,
    col_2: Attr<Option<String>>,
    model_type: Attr<Option<ModelType>>,
    value: Attr<Option<f64>>,
    dirty: BTreeSet<Column>,
    phase: Phase,
    link: SessionLink,
}

/// A full or partial row read back from the store
///
/// Columns that were not selected are `Unloaded`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowImage {
    pub id: i64,
    pub created_at: Attr<Option<NaiveDateTime>>,
    pub modified_at: Attr<Option<NaiveDateTime>>,
    pub col_1: Attr<Option<String>>,
    pub col_2: Attr<Option<String>>,
    pub model_type: Attr<Option<ModelType>>,
    pub value: Attr<Option<f64>>,
}

impl RowImage {
    /// A row with only its id loaded
    pub fn id_only(id: i64) -> Self {
        Self {
            id,
            created_at: Attr::Unloaded,
            modified_at: Attr::Unloaded,
            col_1: Attr::Unloaded,
            col_2: Attr::Unloaded,
            model_type: Attr::Unloaded,
            value: Attr::Unloaded,
        }
    }
}

/// Plain serializable snapshot of a fully loaded record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleModelView {
    pub id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
    pub col_1: Option<String>,
    pub col_2: Option<String>,
    #[serde(rename = "type")]
    pub model_type: Option<ModelType>,
    pub value: Option<f64>,
}

impl SimpleModel {
    /// Start building a transient record
    pub fn builder() -> SimpleModelBuilder {
        SimpleModelBuilder::default()
    }

    /// Rebuild a persistent record from a row owned by a session
    pub fn from_row(row: RowImage, link: SessionLink) -> Self {
        Self {
            id: Some(row.id),
            created_at: row.created_at,
            modified_at: row.modified_at,
            col_1: row.col_1,
            col_2: row.col_2,
            model_type: row.model_type,
            value: row.value,
            dirty: BTreeSet::new(),
            phase: Phase::Persistent,
            link,
        }
    }

    // ----- lifecycle -----

    pub fn state(&self) -> RecordState {
        match self.phase {
            Phase::Transient => RecordState::Transient,
            Phase::Pending => RecordState::Pending,
            Phase::Persistent if self.link.is_live() => RecordState::Persistent,
            Phase::Persistent => RecordState::Detached,
            Phase::Deleted => RecordState::Deleted,
        }
    }

    /// The session link this record observes
    pub fn link(&self) -> &SessionLink {
        &self.link
    }

    /// Move a transient record into a session's staging area
    ///
    /// # Errors
    /// * `InvalidState` - the record is not transient
    pub fn mark_pending(&mut self, link: SessionLink) -> Result<()> {
        self.require(RecordState::Transient, "add")?;
        self.phase = Phase::Pending;
        self.link = link;
        Ok(())
    }

    /// The record as it looks after a committed delete
    pub fn into_deleted(mut self) -> Self {
        self.phase = Phase::Deleted;
        self.dirty.clear();
        self
    }

    /// Replace every attribute present in `row`, discarding pending changes
    pub fn apply_row(&mut self, row: RowImage) {
        self.id = Some(row.id);
        self.created_at = row.created_at;
        self.modified_at = row.modified_at;
        self.col_1 = row.col_1;
        self.col_2 = row.col_2;
        self.model_type = row.model_type;
        self.value = row.value;
        self.dirty.clear();
    }

    /// Fail with `InvalidState` unless the record is in `expected`
    pub fn require(&self, expected: RecordState, action: &'static str) -> Result<()> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(ModelError::InvalidState {
                model: Self::TYPE_NAME,
                state,
                action,
            })
        }
    }

    /// Attributes assigned since the record was loaded
    pub fn dirty_columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.dirty.iter().copied()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    // ----- accessors -----

    /// Store-assigned identifier; `None` until the first commit
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn created_at(&self) -> Result<Option<NaiveDateTime>> {
        self.read(&self.created_at, Column::CreatedAt).copied()
    }

    pub fn modified_at(&self) -> Result<Option<NaiveDateTime>> {
        self.read(&self.modified_at, Column::ModifiedAt).copied()
    }

    pub fn col_1(&self) -> Result<Option<&str>> {
        self.read(&self.col_1, Column::Col1).map(Option::as_deref)
    }

    pub fn col_2(&self) -> Result<Option<&str>> {
        self.read(&self.col_2, Column::Col2).map(Option::as_deref)
    }

    pub fn model_type(&self) -> Result<Option<ModelType>> {
        self.read(&self.model_type, Column::Type).copied()
    }

    pub fn value(&self) -> Result<Option<f64>> {
        self.read(&self.value, Column::Value).copied()
    }

    /// Whether `column` currently holds a loaded value
    pub fn is_loaded(&self, column: Column) -> bool {
        match column {
            Column::Id => true,
            Column::CreatedAt => self.created_at.is_loaded(),
            Column::ModifiedAt => self.modified_at.is_loaded(),
            Column::Col1 => self.col_1.is_loaded(),
            Column::Col2 => self.col_2.is_loaded(),
            Column::Type => self.model_type.is_loaded(),
            Column::Value => self.value.is_loaded(),
        }
    }

    /// Read one attribute as a bindable SQL value
    pub fn column_value(&self, column: Column) -> Result<SqlValue> {
        Ok(match column {
            Column::Id => self.id.into(),
            Column::CreatedAt => self.created_at()?.into(),
            Column::ModifiedAt => self.modified_at()?.into(),
            Column::Col1 => self.col_1()?.into(),
            Column::Col2 => self.col_2()?.into(),
            Column::Type => self.model_type()?.into(),
            Column::Value => self.value()?.into(),
        })
    }

    /// Snapshot every attribute
    ///
    /// # Errors
    /// Fails like the individual accessors when an attribute is not loaded.
    pub fn view(&self) -> Result<SimpleModelView> {
        Ok(SimpleModelView {
            id: self.id,
            created_at: self.created_at()?,
            modified_at: self.modified_at()?,
            col_1: self.col_1()?.map(str::to_string),
            col_2: self.col_2()?.map(str::to_string),
            model_type: self.model_type()?,
            value: self.value()?,
        })
    }

    fn read<'a, T>(&'a self, attr: &'a Attr<T>, column: Column) -> Result<&'a T> {
        match attr {
            Attr::Loaded(v) => Ok(v),
            Attr::Unloaded if self.link.is_live() => Err(ModelError::NotLoaded {
                model: Self::TYPE_NAME,
                attr: column.name(),
                id: self.id,
            }),
            Attr::Unloaded => Err(ModelError::Detached {
                model: Self::TYPE_NAME,
                attr: column.name(),
                id: self.id,
            }),
        }
    }

    // ----- mutation -----

    pub fn set_col_1(&mut self, col_1: Option<impl Into<String>>) {
        self.col_1 = Attr::Loaded(col_1.map(Into::into));
        self.dirty.insert(Column::Col1);
    }

    pub fn set_col_2(&mut self, col_2: Option<impl Into<String>>) {
        self.col_2 = Attr::Loaded(col_2.map(Into::into));
        self.dirty.insert(Column::Col2);
    }

    pub fn set_model_type(&mut self, model_type: Option<ModelType>) {
        self.model_type = Attr::Loaded(model_type);
        self.dirty.insert(Column::Type);
    }

    pub fn set_value(&mut self, value: Option<f64>) {
        self.value = Attr::Loaded(value);
        self.dirty.insert(Column::Value);
    }

    /// Check loaded text attributes against the schema's column widths
    ///
    /// # Errors
    /// * `TooLong` - a text attribute exceeds its column width
    pub fn validate(&self) -> Result<()> {
        let schema = Self::schema();
        for (column, attr) in [(Column::Col1, &self.col_1), (Column::Col2, &self.col_2)] {
            let Some(Some(text)) = attr.as_loaded() else {
                continue;
            };
            if let Some(max) = schema.max_len(column.name()) {
                let len = text.chars().count();
                if len > max {
                    return Err(ModelError::TooLong {
                        column: column.name(),
                        len,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    // ----- diagnostics -----

    /// Render the given attributes as `SimpleModel(field=value, ...)`
    pub fn to_string_with(&self, columns: &[Column]) -> String {
        let fields: Vec<(&str, Result<String>)> = columns
            .iter()
            .map(|column| (column.name(), self.render_column(*column)))
            .collect();
        repr::to_string(Self::TYPE_NAME, self, &fields)
    }

    fn render_column(&self, column: Column) -> Result<String> {
        Ok(match column {
            Column::Id => repr::optional_display(&self.id),
            Column::CreatedAt => repr::optional_display(&self.created_at()?),
            Column::ModifiedAt => repr::optional_display(&self.modified_at()?),
            Column::Col1 => repr::optional_debug(&self.col_1()?),
            Column::Col2 => repr::optional_debug(&self.col_2()?),
            Column::Type => repr::optional_display(&self.model_type()?),
            Column::Value => repr::optional_debug(&self.value()?),
        })
    }

    /// Latest record of `model_type` by `created_at`, ties broken by highest id
    ///
    /// The filter and ordering live here; executing it is the session's job
    /// (`modelkit_store::LatestByType`).
    pub fn latest_by_type_query(model_type: ModelType) -> crate::query::Query {
        crate::query::Query::new()
            .filter_by(Column::Type, model_type)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(1)
    }
}

impl Model for SimpleModel {
    const TYPE_NAME: &'static str = "SimpleModel";

    fn schema() -> &'static TableSchema {
        static SCHEMA: OnceLock<TableSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            TableSchema::builder(Self::table_name())
                .column(Column::Id.name(), ColumnType::Integer, false)
                .timestamp_column(Column::CreatedAt.name())
                .timestamp_column(Column::ModifiedAt.name())
                .column(
                    Column::Col1.name(),
                    ColumnType::Varchar(TEXT_COLUMN_MAX_LEN),
                    true,
                )
                .column(
                    Column::Col2.name(),
                    ColumnType::Varchar(TEXT_COLUMN_MAX_LEN),
                    true,
                )
                .enum_column(Column::Type.name(), &ModelType::tags().collect::<Vec<_>>())
                .column(Column::Value.name(), ColumnType::Float, true)
                .primary_key(&[Column::Id.name()])
                .unique(&[Column::Col1.name(), Column::Col2.name()])
                .index(&[Column::Type.name(), Column::CreatedAt.name()])
                .build()
        })
    }
}

/// Equality of stored identity and attribute values; session links are ignored
impl PartialEq for SimpleModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.created_at == other.created_at
            && self.modified_at == other.modified_at
            && self.col_1 == other.col_1
            && self.col_2 == other.col_2
            && self.model_type == other.model_type
            && self.value == other.value
    }
}

/// `SimpleModel(id=...)`
impl fmt::Display for SimpleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(&[Column::Id]))
    }
}

/// `SimpleModel(id=..., col_1=..., col_2=..., type=..., value=...)`
impl fmt::Debug for SimpleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(&[
            Column::Id,
            Column::Col1,
            Column::Col2,
            Column::Type,
            Column::Value,
        ]))
    }
}

/// Builder for transient records
#[derive(Debug, Clone, Default)]
pub struct SimpleModelBuilder {
    id: Option<i64>,
    created_at: Option<NaiveDateTime>,
    col_1: Option<String>,
    col_2: Option<String>,
    model_type: Option<ModelType>,
    value: Option<f64>,
}

impl SimpleModelBuilder {
    /// Pre-assign the id written on insert (factories use sequential ids)
    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Override the insertion timestamp, e.g. to simulate historical rows
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn col_1(mut self, col_1: impl Into<String>) -> Self {
        self.col_1 = Some(col_1.into());
        self
    }

    pub fn col_2(mut self, col_2: impl Into<String>) -> Self {
        self.col_2 = Some(col_2.into());
        self
    }

    pub fn model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self
    }

    /// Set the type from its stored tag
    ///
    /// # Errors
    /// * `InvalidTag` - `tag` is not a `ModelType` tag
    pub fn type_tag(mut self, tag: &str) -> Result<Self> {
        self.model_type = Some(ModelType::decode(tag)?);
        Ok(self)
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn build(self) -> SimpleModel {
        SimpleModel {
            id: self.id,
            created_at: Attr::Loaded(self.created_at),
            modified_at: Attr::Loaded(None),
            col_1: Attr::Loaded(self.col_1),
            col_2: Attr::Loaded(self.col_2),
            model_type: Attr::Loaded(self.model_type),
            value: Attr::Loaded(self.value),
            dirty: BTreeSet::new(),
            phase: Phase::Transient,
            link: SessionLink::none(),
        }
    }
}
