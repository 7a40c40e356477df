//! The full JSON dump: every field the service returned, pretty-printed.

use crate::ExportError;
use boardscribe::AdRecord;

/// Serializes the records as an indented JSON array. Non-ASCII text is written as is.
pub fn to_json(records: &[AdRecord]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(records)?)
}
