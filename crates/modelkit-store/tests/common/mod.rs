//! Shared fixtures for store integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use modelkit_core::model::SimpleModelBuilder;
use modelkit_core::SimpleModel;
use modelkit_store::{db, migrations, Session};

/// Fresh in-memory database with every migration applied
pub fn setup_test_db() -> Connection {
    let mut conn = db::open_in_memory().expect("Failed to create in-memory database");
    migrations::apply_migrations(&mut conn).expect("Migrations should apply");
    conn
}

/// Session whose work is rolled back when the test ends
pub fn test_session(conn: &mut Connection) -> Session<'_> {
    Session::begin_isolated(conn).expect("Failed to open session")
}

/// Builds records with sequential ids starting at 1 and commits them
#[derive(Debug, Default)]
pub struct SimpleModelFactory {
    seq: i64,
}

impl SimpleModelFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next transient record, with its id pre-assigned
    pub fn build(&mut self) -> SimpleModelBuilder {
        self.seq += 1;
        SimpleModel::builder().id(self.seq)
    }

    /// Add and commit a record customised by `customize`
    pub fn create<F>(&mut self, session: &mut Session<'_>, customize: F) -> SimpleModel
    where
        F: FnOnce(SimpleModelBuilder) -> SimpleModelBuilder,
    {
        let record = customize(self.build()).build();
        session.add(record).expect("add should succeed");
        session
            .commit()
            .expect("commit should succeed")
            .pop()
            .expect("commit returns the written record")
    }

    /// Add and commit a record with default attributes
    pub fn create_default(&mut self, session: &mut Session<'_>) -> SimpleModel {
        self.create(session, |b| b)
    }
}

pub fn timestamp(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, 0))
        .expect("valid timestamp")
}
