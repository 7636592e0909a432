//! Create, update, delete and list sale records on top of a [`KeyValueStore`].
//!
//! Each store call runs on the blocking pool and is bounded by a timeout;
//! a call that fails or does not finish in time surfaces as
//! [`LedgerError::StoreUnavailable`]. Validation always happens before the
//! first write, so a rejected request never leaves a partial record behind.
//! A timed-out write is not rolled back, see [`RecordStore::call`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::codec;
use crate::db::store::KeyValueStore;
use crate::error::{LedgerError, Result};
use crate::models::record::Record;
use crate::models::transaction::TransactionType;
use crate::operations::list::{filter_by_month, sort_newest_first};
use crate::operations::month::{month_key, resolve_month, target_month, timestamp, update_chain};
use crate::operations::validate::{Fields, build_sale};

pub struct RecordStore {
    store: Arc<dyn KeyValueStore>,
    timeout: Duration,
    clock: fn() -> DateTime<Utc>,
}

impl RecordStore {
    pub fn new(store: Arc<dyn KeyValueStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates `fields` for `kind` and stores a new record. Returns its id.
    ///
    /// Not idempotent: every call stores a new record under a fresh id.
    pub async fn create(&self, kind: TransactionType, fields: &Fields) -> Result<String> {
        let sale = build_sale(kind, fields)?;
        let now = (self.clock)();

        let record = Record {
            id: Uuid::new_v4().to_string(),
            sale,
            created_at: Some(timestamp(now)),
            month: Some(month_key(now)),
        };
        let key = record.key();
        let bytes = codec::encode(&record)?;

        let put_key = key.clone();
        self.call("put", move |store| store.put(&put_key, &bytes))
            .await?;

        tracing::info!(
            key = %key,
            kind = %kind,
            month = ?record.month,
            keuntungan = ?record.sale.keuntungan(),
            "record created"
        );
        Ok(record.id)
    }

    /// Replaces the payload of an existing record, keeping its id, type,
    /// `createdAt` and month. Never creates a record.
    pub async fn update(&self, id: &str, kind: TransactionType, fields: &Fields) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(LedgerError::InvalidRequest("id must not be empty".to_string()));
        }
        let key = kind.key_for(id);

        let get_key = key.clone();
        let existing = self
            .call("get", move |store| store.get(&get_key))
            .await?
            .ok_or_else(|| LedgerError::NotFound(key.clone()))?;
        let existing = codec::decode(&existing)?;

        let now = (self.clock)();
        let month = resolve_month(&update_chain(now), &existing);
        let created_at = existing
            .created_at
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| timestamp(now));

        let record = Record {
            id: id.to_string(),
            sale: build_sale(kind, fields)?,
            created_at: Some(created_at),
            month,
        };
        let bytes = codec::encode(&record)?;

        let put_key = key.clone();
        self.call("put", move |store| store.put(&put_key, &bytes))
            .await?;

        tracing::info!(key = %key, month = ?record.month, "record updated");
        Ok(())
    }

    /// Removes a record. Deleting a record that does not exist succeeds.
    pub async fn delete(&self, id: &str, kind: TransactionType) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(LedgerError::InvalidRequest("id must not be empty".to_string()));
        }
        let key = kind.key_for(id);

        let delete_key = key.clone();
        self.call("delete", move |store| store.delete(&delete_key))
            .await?;

        tracing::info!(key = %key, "record deleted");
        Ok(())
    }

    /// Records of `kind` in `month` (or the current month when `month` is
    /// not a `YYYY-MM` string), newest first.
    ///
    /// Entries that fail to decode are logged and skipped. The result is a
    /// snapshot of whatever each key held when it was read.
    pub async fn list(&self, kind: TransactionType, month: Option<&str>) -> Result<Vec<Record>> {
        let target = target_month(month, (self.clock)());
        let prefix = kind.prefix();

        let keys = self.call("list", move |store| store.list(prefix)).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let get_key = key.clone();
            let Some(bytes) = self
                .call("get", move |store| store.get(&get_key))
                .await?
            else {
                // deleted between the scan and the read
                continue;
            };

            match codec::decode(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping unreadable record"),
            }
        }

        let records = sort_newest_first(filter_by_month(records, &target));
        tracing::debug!(kind = %kind, month = %target, count = records.len(), "records listed");
        Ok(records)
    }

    /// Runs `f` against the store on the blocking pool, bounded by the timeout.
    ///
    /// The blocking call cannot be cancelled: after a timeout it keeps running
    /// and a `put` may still be written once the caller has seen
    /// `StoreUnavailable`. A client retrying a timed-out create can therefore
    /// end up with two records.
    async fn call<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&dyn KeyValueStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::task::spawn_blocking(move || f(store.as_ref()));

        let result = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(LedgerError::StoreUnavailable(format!(
                "{} task failed: {}",
                op, e
            ))),
            Err(_) => Err(LedgerError::StoreUnavailable(format!(
                "{} timed out after {} ms",
                op,
                self.timeout.as_millis()
            ))),
        };
        if let Err(LedgerError::StoreUnavailable(msg)) = &result {
            tracing::error!(op, error = %msg, "store call failed");
        }
        result
    }
}
