use crate::error::Result;

/// Minimal key-value capability the ledger needs from its backing store.
///
/// Only single-key operations are atomic. Listing is a plain prefix scan with
/// no snapshot guarantee against concurrent writers.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Inserts or fully replaces the value at `key`.
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, in key order.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
