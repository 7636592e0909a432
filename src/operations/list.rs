use crate::models::record::Record;
use crate::operations::month::{LIST_CHAIN, resolve_month};

/// Keeps records of `target` month. Records whose month cannot be worked out
/// at all are kept too, so malformed legacy data stays visible.
pub fn filter_by_month(records: Vec<Record>, target: &str) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| match resolve_month(&LIST_CHAIN, record) {
            Some(month) => month == target,
            None => true,
        })
        .collect()
}

/// Newest first by `createdAt` string.
///
/// Records without `createdAt` have no ordering preference and keep their
/// position; dated records are sorted among the remaining slots.
pub fn sort_newest_first(records: Vec<Record>) -> Vec<Record> {
    let mut slots: Vec<Option<Record>> = Vec::with_capacity(records.len());
    let mut dated_slots = Vec::new();
    let mut dated = Vec::new();

    for record in records {
        if record.created_at.is_some() {
            dated_slots.push(slots.len());
            dated.push(record);
            slots.push(None);
        } else {
            slots.push(Some(record));
        }
    }

    dated.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for (slot, record) in dated_slots.into_iter().zip(dated) {
        slots[slot] = Some(record);
    }

    slots.into_iter().flatten().collect()
}
