//! Raw SQL operations, one module per table family.

pub mod degradation_ops;
pub mod fact_ops;
pub mod interaction_ops;
pub mod review_ops;

use chrono::{DateTime, Utc};

use engram_core::errors::EngramResult;

use crate::to_storage_err;

/// Parse an RFC3339 timestamp column back into UTC.
pub(crate) fn parse_ts(raw: &str) -> EngramResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp '{raw}': {e}")))
}
