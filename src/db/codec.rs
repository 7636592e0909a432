//! JSON encoding of stored records.
//!
//! One record per store entry, field names as the HTTP API uses them, so
//! entries written by earlier versions of the service decode unchanged.

use crate::error::{LedgerError, Result};
use crate::models::record::Record;

pub fn encode(record: &Record) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| {
        LedgerError::CorruptRecord(format!("Failed to encode record '{}': {}", record.id, e))
    })
}

pub fn decode(bytes: &[u8]) -> Result<Record> {
    let record: Record = serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::CorruptRecord(format!("Failed to decode record: {}", e)))?;
    if record.id.trim().is_empty() {
        return Err(LedgerError::CorruptRecord("record has an empty id".to_string()));
    }
    Ok(record)
}
