//! HTTP request parsing for the ledger server.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LedgerError, Result};
use crate::models::transaction::TransactionType;
use crate::operations::validate::{Fields, text};

/// Query parameters for list requests.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Transaction type tag, case-insensitive.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `YYYY-MM`; anything else means the current month.
    pub month: Option<String>,
}

impl ListParams {
    pub fn kind(&self) -> Result<TransactionType> {
        self.kind.as_deref().unwrap_or_default().parse()
    }
}

/// Parses a request body as a JSON object, whatever the declared content type.
pub fn parse_body(body: &[u8]) -> Result<Fields> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(LedgerError::InvalidRequest(
            "body must be a JSON object".to_string(),
        )),
        Err(e) => Err(LedgerError::InvalidRequest(format!(
            "body must be JSON: {}",
            e
        ))),
    }
}

/// Transaction type named by the body's `type` field.
pub fn kind(fields: &Fields) -> Result<TransactionType> {
    text(fields, "type").parse()
}

/// `id` and `type` addressing an existing record. Either one missing or
/// invalid makes the whole request invalid.
pub fn target(fields: &Fields) -> Result<(String, TransactionType)> {
    let id = text(fields, "id");
    let kind = kind(fields).ok();
    match (id.is_empty(), kind) {
        (false, Some(kind)) => Ok((id, kind)),
        _ => Err(LedgerError::InvalidRequest(
            "id or type is not valid".to_string(),
        )),
    }
}
