//! Unit of work over a SQLite connection
//!
//! A [`Session`] stages inserts, updates and deletes and writes them only on
//! [`Session::commit`], atomically. Levels nest: the outermost level is a
//! transaction, every [`Session::begin_nested`] adds a savepoint, and
//! `commit`/`rollback` end the innermost level. A failed commit discards the
//! whole level. Whatever is still open when the session is closed or dropped
//! is rolled back.
//!
//! Records committed or fetched through a session observe it through a weak
//! link; once the session is gone they are `Detached`.
//!
//! # Example
//!
//! ```
//! use modelkit_core::{ModelType, SimpleModel};
//! use modelkit_store::{db, migrations, Session};
//!
//! let mut conn = db::open_in_memory().unwrap();
//! migrations::apply_migrations(&mut conn).unwrap();
//!
//! let mut session = Session::begin(&mut conn).unwrap();
//! session
//!     .add(SimpleModel::builder().col_1("foo").model_type(ModelType::Super).build())
//!     .unwrap();
//! let written = session.commit().unwrap();
//! assert_eq!(written[0].to_string(), format!("SimpleModel(id={})", written[0].id().unwrap()));
//! ```

mod aggregate;
mod latest;
mod queries;
mod rows;

pub use aggregate::{Aggregate, Annotated, TypeAggregate};
pub use latest::LatestByType;

use rusqlite::Connection;
use std::time::Instant;

use modelkit_core::errors::{ExError, ExErrorKind};
use modelkit_core::model::SessionToken;
use modelkit_core::schema::CURRENT_TIMESTAMP_SQL;
use modelkit_core::{log_op_end, log_op_error, log_op_start};
use modelkit_core::{Column, Model, RecordState, SimpleModel, SqlValue};

use crate::errors::{from_rusqlite, from_write_error, not_found, Result};
use crate::schema::registry;
use rows::{to_values, RawRow};

/// One open transactional level
#[derive(Debug)]
enum Level {
    Transaction,
    Savepoint(String),
}

/// A change waiting for the next commit
#[derive(Debug)]
enum Staged {
    Insert(SimpleModel),
    Update(SimpleModel),
    Delete(SimpleModel),
}

impl Staged {
    fn record(&self) -> &SimpleModel {
        match self {
            Staged::Insert(r) | Staged::Update(r) | Staged::Delete(r) => r,
        }
    }
}

/// Unit of work bound to one connection
///
/// The session borrows its connection mutably, so a connection serves one
/// unit of work at a time.
pub struct Session<'c> {
    conn: &'c mut Connection,
    token: SessionToken,
    levels: Vec<Level>,
    staged: Vec<Staged>,
    isolated: bool,
    savepoint_seq: u64,
}

impl<'c> Session<'c> {
    /// Open a session with a fresh transaction
    pub fn begin(conn: &'c mut Connection) -> Result<Self> {
        let mut session = Self {
            conn,
            token: SessionToken::new(),
            levels: Vec::new(),
            staged: Vec::new(),
            isolated: false,
            savepoint_seq: 0,
        };
        session.open_transaction()?;
        Ok(session)
    }

    /// Open a session whose commits never reach the outer transaction
    ///
    /// Work runs inside a savepoint that is reopened after every commit or
    /// rollback; closing the session rolls the outer transaction back. Test
    /// fixtures use this so that no test observes another's rows.
    pub fn begin_isolated(conn: &'c mut Connection) -> Result<Self> {
        let mut session = Self::begin(conn)?;
        session.begin_nested()?;
        session.isolated = true;
        Ok(session)
    }

    /// Open a savepoint; the next commit or rollback ends it
    pub fn begin_nested(&mut self) -> Result<()> {
        if self.levels.is_empty() {
            self.open_transaction()?;
        }
        self.savepoint_seq += 1;
        let name = format!("sp_{}", self.savepoint_seq);
        self.conn
            .execute_batch(&format!("SAVEPOINT {}", name))
            .map_err(from_rusqlite)?;
        tracing::debug!(savepoint = %name, depth = self.levels.len() + 1, "savepoint opened");
        self.levels.push(Level::Savepoint(name));
        Ok(())
    }

    /// Number of open levels (0 once the outermost level has ended)
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    // ----- staging -----

    /// Stage a transient record for insertion
    ///
    /// # Errors
    /// * `Validation` - a text attribute exceeds its column width
    /// * `InvalidState` - the record is not transient
    pub fn add(&mut self, mut record: SimpleModel) -> Result<()> {
        record.validate()?;
        record.mark_pending(self.token.link())?;
        self.staged.push(Staged::Insert(record));
        Ok(())
    }

    /// Stage every record of `records` for insertion
    pub fn add_all(&mut self, records: impl IntoIterator<Item = SimpleModel>) -> Result<()> {
        for record in records {
            self.add(record)?;
        }
        Ok(())
    }

    /// Stage the assigned attributes of a persistent record for writing
    ///
    /// # Errors
    /// * `Validation` - a text attribute exceeds its column width
    /// * `InvalidState` - the record is not persistent in this session
    pub fn update(&mut self, record: SimpleModel) -> Result<()> {
        self.require_owned(&record, "update")?;
        record.validate()?;
        self.staged.push(Staged::Update(record));
        Ok(())
    }

    /// Stage a persistent record for deletion
    ///
    /// # Errors
    /// * `InvalidState` - the record is not persistent in this session
    pub fn delete(&mut self, record: SimpleModel) -> Result<()> {
        self.require_owned(&record, "delete")?;
        self.staged.push(Staged::Delete(record));
        Ok(())
    }

    /// Records staged since the last commit or rollback, in staging order
    pub fn pending(&self) -> impl Iterator<Item = &SimpleModel> {
        self.staged.iter().map(Staged::record)
    }

    // ----- transaction control -----

    /// Write all staged work and end the innermost level
    ///
    /// Returns the written records: re-read from the store after an insert or
    /// update, marked deleted after a delete.
    ///
    /// # Errors
    /// * `ConstraintViolation` - the store rejected a write; the whole level
    ///   is rolled back and the violated constraint is named when known
    /// * `NotFound` - an updated record no longer exists
    pub fn commit(&mut self) -> Result<Vec<SimpleModel>> {
        log_op_start!("commit", staged_len = self.staged.len());
        let start = Instant::now();

        let written = self.commit_impl().map_err(|e| {
            log_op_error!(
                "commit",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "commit",
            duration_ms = start.elapsed().as_millis() as u64,
            written_len = written.len()
        );

        Ok(written)
    }

    fn commit_impl(&mut self) -> Result<Vec<SimpleModel>> {
        if self.levels.is_empty() {
            self.open_transaction()?;
        }

        let staged = std::mem::take(&mut self.staged);
        let mut written = Vec::with_capacity(staged.len());

        for item in staged {
            match self.write(item) {
                Ok(record) => written.push(record),
                Err(err) => {
                    if let Err(rollback_err) = self.end_level(false) {
                        tracing::debug!(error = %rollback_err, "rollback after failed commit failed");
                    }
                    return Err(err);
                }
            }
        }

        self.end_level(true)?;
        Ok(written)
    }

    /// Discard staged work and roll back the innermost level
    pub fn rollback(&mut self) -> Result<()> {
        log_op_start!("rollback", staged_len = self.staged.len());
        let start = Instant::now();

        self.staged.clear();
        let result = if self.levels.is_empty() {
            Ok(())
        } else {
            self.end_level(false)
        };

        match result {
            Ok(()) => {
                log_op_end!(
                    "rollback",
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Ok(())
            }
            Err(e) => {
                log_op_error!(
                    "rollback",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    /// Roll back everything still open and end the session
    ///
    /// Records obtained from the session become `Detached`.
    pub fn close(mut self) -> Result<()> {
        self.staged.clear();
        self.abandon()
    }

    // ----- internals -----

    fn conn(&self) -> &Connection {
        &*self.conn
    }

    fn open_transaction(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN").map_err(from_rusqlite)?;
        tracing::debug!("transaction opened");
        self.levels.push(Level::Transaction);
        Ok(())
    }

    /// End the innermost level, committing or rolling back
    fn end_level(&mut self, commit: bool) -> Result<()> {
        let level = self.levels.pop().ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidState)
                .with_op("end_level")
                .with_message("no open transaction")
        })?;

        let sql = match (&level, commit) {
            (Level::Transaction, true) => "COMMIT".to_string(),
            (Level::Transaction, false) => "ROLLBACK".to_string(),
            (Level::Savepoint(name), true) => format!("RELEASE SAVEPOINT {}", name),
            (Level::Savepoint(name), false) => {
                format!("ROLLBACK TO SAVEPOINT {0}; RELEASE SAVEPOINT {0}", name)
            }
        };

        if let Err(e) = self.conn.execute_batch(&sql) {
            // The engine may have ended the transaction already
            if self.conn.is_autocommit() {
                self.levels.clear();
            }
            return Err(from_rusqlite(e));
        }
        tracing::debug!(depth = self.levels.len(), commit, "level ended");

        if self.isolated && self.levels.len() == 1 {
            self.begin_nested()?;
        }
        Ok(())
    }

    /// Roll back every open level at once
    fn abandon(&mut self) -> Result<()> {
        if self.levels.is_empty() {
            return Ok(());
        }
        self.levels.clear();
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK").map_err(from_rusqlite)?;
        tracing::debug!("session closed with rollback");
        Ok(())
    }

    fn require_owned(&self, record: &SimpleModel, action: &'static str) -> Result<()> {
        record.require(RecordState::Persistent, action)?;
        if !self.token.owns(record.link()) {
            return Err(ExError::new(ExErrorKind::InvalidState)
                .with_op("stage_record")
                .with_entity_id(record.id().map(|id| id.to_string()).unwrap_or_default())
                .with_message(format!(
                    "cannot {} a {} that belongs to another session",
                    action,
                    SimpleModel::TYPE_NAME
                )));
        }
        Ok(())
    }

    fn write(&mut self, item: Staged) -> Result<SimpleModel> {
        match item {
            Staged::Insert(record) => self.insert(&record),
            Staged::Update(record) => self.update_row(record),
            Staged::Delete(record) => self.delete_row(record),
        }
    }

    fn insert(&self, record: &SimpleModel) -> Result<SimpleModel> {
        let mut columns = Vec::with_capacity(Column::ALL.len());
        let mut values: Vec<SqlValue> = Vec::with_capacity(Column::ALL.len());

        if let Some(id) = record.id() {
            columns.push(Column::Id);
            values.push(id.into());
        }
        if let Some(created_at) = record.created_at()? {
            columns.push(Column::CreatedAt);
            values.push(created_at.into());
        }
        for column in [Column::Col1, Column::Col2, Column::Type, Column::Value] {
            columns.push(column);
            values.push(record.column_value(column)?);
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            SimpleModel::table_name(),
            columns.iter().map(Column::name).collect::<Vec<_>>().join(", "),
            (1..=values.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ")
        );
        tracing::debug!(sql = %sql, "insert");

        self.conn()
            .execute(&sql, rusqlite::params_from_iter(to_values(&values)))
            .map_err(|e| from_write_error(e, registry()))?;

        let id = self.conn().last_insert_rowid();
        self.load(id, "commit")
    }

    fn update_row(&self, record: SimpleModel) -> Result<SimpleModel> {
        let id = record.id().ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("commit")
                .with_message("persistent record without id")
        })?;

        let dirty: Vec<Column> = record.dirty_columns().filter(Column::is_mutable).collect();
        if dirty.is_empty() {
            return Ok(record);
        }

        let mut values = Vec::with_capacity(dirty.len() + 1);
        let mut assignments = Vec::with_capacity(dirty.len() + 1);
        for column in &dirty {
            values.push(record.column_value(*column)?);
            assignments.push(format!("{} = ?{}", column.name(), values.len()));
        }
        assignments.push(format!(
            "{} = ({})",
            Column::ModifiedAt.name(),
            CURRENT_TIMESTAMP_SQL
        ));
        values.push(id.into());

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            SimpleModel::table_name(),
            assignments.join(", "),
            values.len()
        );
        tracing::debug!(sql = %sql, "update");

        let changed = self
            .conn()
            .execute(&sql, rusqlite::params_from_iter(to_values(&values)))
            .map_err(|e| from_write_error(e, registry()).with_entity_id(id.to_string()))?;
        if changed == 0 {
            return Err(not_found("commit", id));
        }

        self.load(id, "commit")
    }

    fn delete_row(&self, record: SimpleModel) -> Result<SimpleModel> {
        let id = record.id().unwrap_or_default();
        let sql = format!("DELETE FROM {} WHERE id = ?1", SimpleModel::table_name());
        tracing::debug!(sql = %sql, id, "delete");

        let changed = self
            .conn()
            .execute(&sql, [id])
            .map_err(|e| from_write_error(e, registry()).with_entity_id(id.to_string()))?;
        if changed == 0 {
            return Err(not_found("commit", id));
        }
        Ok(record.into_deleted())
    }

    /// Read the full row `id` as a record owned by this session
    fn load(&self, id: i64, op: &str) -> Result<SimpleModel> {
        match self.load_raw(id)? {
            Some(raw) => Ok(SimpleModel::from_row(raw.decode()?, self.token.link())),
            None => Err(not_found(op, id)),
        }
    }

    fn load_raw(&self, id: i64) -> Result<Option<RawRow>> {
        use rusqlite::OptionalExtension;

        let columns = rows::projection(&Column::ALL);
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            rows::select_list(None, &columns),
            SimpleModel::table_name()
        );
        self.conn()
            .query_row(&sql, [id], |row| RawRow::read(row, 0, &columns))
            .optional()
            .map_err(from_rusqlite)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.abandon() {
            tracing::debug!(error = %e, "rollback on drop failed");
        }
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("depth", &self.levels.len())
            .field("staged", &self.staged.len())
            .field("isolated", &self.isolated)
            .finish()
    }
}
