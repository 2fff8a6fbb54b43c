use std::time::Instant;

use modelkit_core::{log_op_end, log_op_error, log_op_start};
use modelkit_core::{ModelType, SimpleModel};

use super::Session;
use crate::errors::Result;

/// Class-level lookups on [`SimpleModel`] that need a session
///
/// ```
/// use modelkit_core::{ModelType, SimpleModel};
/// use modelkit_store::{db, migrations, LatestByType, Session};
///
/// let mut conn = db::open_in_memory().unwrap();
/// migrations::apply_migrations(&mut conn).unwrap();
/// let session = Session::begin(&mut conn).unwrap();
///
/// assert!(SimpleModel::get_latest_by_type(&session, ModelType::Normal)
///     .unwrap()
///     .is_none());
/// ```
pub trait LatestByType: Sized {
    /// The record of `model_type` with the greatest `created_at`
    ///
    /// Ties on `created_at` go to the highest id. `Ok(None)` when no record
    /// has that type.
    fn get_latest_by_type(session: &Session<'_>, model_type: ModelType) -> Result<Option<Self>>;
}

impl LatestByType for SimpleModel {
    fn get_latest_by_type(session: &Session<'_>, model_type: ModelType) -> Result<Option<Self>> {
        log_op_start!("get_latest_by_type", model_type = %model_type);
        let start = Instant::now();

        let latest = session
            .first(&SimpleModel::latest_by_type_query(model_type))
            .map_err(|e| {
                log_op_error!(
                    "get_latest_by_type",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "get_latest_by_type",
            duration_ms = start.elapsed().as_millis() as u64,
            found = latest.is_some()
        );

        Ok(latest)
    }
}
