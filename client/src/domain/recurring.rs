//! # Recurring Amount Resolution
//!
//! A recurring income or expense keeps its original amount until a change log
//! entry amends it. Amendments are matched by calendar month: an entry dated in
//! the evaluated month wins outright, otherwise the latest entry from an
//! earlier month applies.
//!
//! The resolver is a pure function. It walks from the item's start month up to
//! the target month on every call; nothing is cached between calls.

use shared::{ChangeLogEntry, FinancialItem};
use std::iter;

use super::models::YearMonth;

/// First change log entry whose effective date falls inside `month`
pub fn exact_match_log(change_logs: &[ChangeLogEntry], month: YearMonth) -> Option<&ChangeLogEntry> {
    change_logs.iter().find(|log| month.contains(log.effective_date))
}

/// Latest change log entry dated strictly before the first day of `month`.
/// On equal dates the entry listed first wins.
pub fn closest_log(change_logs: &[ChangeLogEntry], month: YearMonth) -> Option<&ChangeLogEntry> {
    change_logs
        .iter()
        .filter(|log| YearMonth::from_date(log.effective_date) < month)
        .reduce(|best, log| if log.effective_date > best.effective_date { log } else { best })
}

/// Amount of a recurring item in effect during `month`
fn amount_in_effect(item: &FinancialItem, month: YearMonth) -> f64 {
    exact_match_log(&item.change_logs, month)
        .or_else(|| closest_log(&item.change_logs, month))
        .map(|log| log.new_amount)
        .unwrap_or(item.amount)
}

/// Resolve the amount of `item` for `target`.
///
/// Non-recurring items always report their own amount. Recurring items report
/// nothing for months before they started.
pub fn resolve_amount(item: &FinancialItem, target: YearMonth) -> Option<f64> {
    if !item.is_recurring {
        return Some(item.amount);
    }

    let start = YearMonth::from_date(item.date);
    iter::successors(Some(start), |month| Some(month.next()))
        .take_while(|month| *month <= target)
        .map(|month| (month, amount_in_effect(item, month)))
        .last()
        .filter(|(month, _)| *month == target)
        .map(|(_, amount)| amount)
}

/// Resolve every item for `target`.
///
/// Recurring items are re-dated to the first of the target month and carry the
/// resolved amount; recurring items that start after `target` are dropped.
/// Non-recurring items pass through unchanged.
pub fn effective_items(items: &[FinancialItem], target: YearMonth) -> Vec<FinancialItem> {
    items
        .iter()
        .filter_map(|item| {
            if !item.is_recurring {
                return Some(item.clone());
            }
            let amount = resolve_amount(item, target)?;
            Some(FinancialItem {
                date: target.first_day().unwrap_or(item.date),
                amount,
                ..item.clone()
            })
        })
        .collect()
}
