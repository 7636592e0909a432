//! HTTP response types for the ledger server.

use serde::Serialize;

use crate::models::record::Record;

/// Response for submit requests.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    /// Id assigned to the new record.
    pub id: String,
}

impl SubmitResponse {
    pub fn success(id: String) -> Self {
        Self { success: true, id }
    }
}

/// Response for update and delete requests.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn success() -> Self {
        Self { success: true }
    }
}

/// Response for list requests, newest record first.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<Record>,
}
