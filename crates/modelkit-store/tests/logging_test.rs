// Lifecycle logging emitted by the session
//
// Kept in its own test binary: the capture layer is the process-wide
// subscriber here.

mod common;

use modelkit_core::logging_facility::init_test_capture;
use modelkit_core::{ModelType, SimpleModel};
use modelkit_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_WRITTEN_LEN,
};
use modelkit_store::LatestByType;

use common::{setup_test_db, test_session};

#[test]
fn test_commit_emits_start_and_end() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let mut session = test_session(&mut conn);

    session
        .add(SimpleModel::builder().col_1("logged").build())
        .unwrap();
    session.commit().unwrap();

    capture.assert_event_exists("commit", EVENT_START);
    capture.assert_event_exists("commit", EVENT_END);

    let ends = capture.events_for_op("commit");
    assert!(ends
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END) && e.field(FIELD_WRITTEN_LEN) == Some("1")));
}

#[test]
fn test_failed_commit_emits_error_code() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let mut session = test_session(&mut conn);

    session
        .add(SimpleModel::builder().col_1("dup").col_2("dup").build())
        .unwrap();
    session
        .add(SimpleModel::builder().col_1("dup").col_2("dup").build())
        .unwrap();
    assert!(session.commit().is_err());

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("commit")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_CONSTRAINT_VIOLATION")
    });
    assert!(errors >= 1);
}

#[test]
fn test_rollback_and_lookup_are_logged() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let mut session = test_session(&mut conn);

    session.rollback().unwrap();
    SimpleModel::get_latest_by_type(&session, ModelType::Normal).unwrap();

    capture.assert_event_exists("rollback", EVENT_END);
    let lookups = capture.events_for_op("get_latest_by_type");
    assert!(lookups
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END) && e.field("found") == Some("false")));
    assert!(lookups
        .iter()
        .all(|e| e.component.as_deref() == Some("modelkit_store::session::latest")));
}
