//! Deduplication of records fetched by overlapping year queries.

use shared::{CreditCardExpense, FinancialItem};
use std::collections::HashMap;

/// Records that carry a backend identifier
pub trait Identified {
    fn record_id(&self) -> i64;
}

impl Identified for FinancialItem {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Identified for CreditCardExpense {
    fn record_id(&self) -> i64 {
        self.item.id
    }
}

/// Merge `current` with `past`, keeping the `current` copy of any shared id.
///
/// Output holds `current` in order, then the `past` records whose id was not
/// seen yet, in order. Repeated ids within `current` keep the position of the
/// first occurrence and the value of the last one.
pub fn merge_data<T: Identified>(current: Vec<T>, past: Vec<T>) -> Vec<T> {
    let mut positions: HashMap<i64, usize> = HashMap::with_capacity(current.len() + past.len());
    let mut merged: Vec<T> = Vec::with_capacity(current.len() + past.len());

    for record in current {
        match positions.get(&record.record_id()) {
            Some(&index) => merged[index] = record,
            None => {
                positions.insert(record.record_id(), merged.len());
                merged.push(record);
            }
        }
    }

    for record in past {
        if !positions.contains_key(&record.record_id()) {
            positions.insert(record.record_id(), merged.len());
            merged.push(record);
        }
    }

    merged
}
