//! # Chart Data Preparation
//!
//! Turns the merged multi-year dataset into per-month chart payloads:
//!
//! - **Incomes / expenses**: one slice per lowercase category name. One-off
//!   items count in the month they are dated; recurring items count in every
//!   month from their start, with the amount resolved through the change logs
//!   and never shown above the item's own amount.
//! - **Credit cards**: one slice per card. Charges post after the statement
//!   closes: on or before the close day they land next month, afterwards two
//!   months later. Installment plans spread the surcharged total evenly over
//!   consecutive months.
//! - **Bar chart**: the three summary percentages side by side.
//!
//! Labels keep first-seen order and get stable colors from [`colors`](super::colors).

use anyhow::Result;
use chrono::Datelike;
use shared::{ChartData, ChartDataset, CreditCardExpense, FinancialItem, Percentages};

use super::colors::assign_colors;
use super::models::YearMonth;
use super::recurring::{effective_items, resolve_amount};
use crate::storage::KeyValueStore;

pub const UNDEFINED_CATEGORY: &str = "undefined category";
const SLICE_BORDER_COLOR: &str = "#4b4b4b";

/// Label totals in first-seen order
pub type LabelTotals = Vec<(String, f64)>;

fn accumulate(totals: &mut LabelTotals, label: String, amount: f64) {
    match totals.iter_mut().find(|(existing, _)| *existing == label) {
        Some((_, total)) => *total += amount,
        None => totals.push((label, amount)),
    }
}

fn category_label(item: &FinancialItem) -> String {
    item.category_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| UNDEFINED_CATEGORY.to_string())
}

/// Amount a recurring item contributes to `target`, capped at its own amount
fn capped_recurring_amount(item: &FinancialItem, target: YearMonth) -> Option<f64> {
    resolve_amount(item, target).map(|resolved| resolved.min(item.amount))
}

/// Sum incomes or expenses by category for `target`
pub fn category_totals(items: &[FinancialItem], target: YearMonth) -> LabelTotals {
    let one_off = items
        .iter()
        .filter(|item| !item.is_recurring && target.contains(item.date))
        .map(|item| (item, item.amount));

    // Every item here has started by `target`, so none is dropped and the
    // resolved copies line up with their originals
    let started: Vec<FinancialItem> = items
        .iter()
        .filter(|item| item.is_recurring && YearMonth::from_date(item.date) <= target)
        .cloned()
        .collect();
    let resolved = effective_items(&started, target);
    let recurring = started
        .iter()
        .zip(&resolved)
        .map(|(item, effective)| (item, effective.amount.min(item.amount)));

    let mut totals = LabelTotals::new();
    for (item, amount) in one_off.chain(recurring) {
        accumulate(&mut totals, category_label(item), amount);
    }
    totals
}

/// Billing month of the first payment of a credit-card charge
pub fn posting_month(expense: &CreditCardExpense) -> YearMonth {
    let charged = YearMonth::from_date(expense.item.date);
    if expense.item.date.day() <= expense.credit_card.close_card_day {
        charged.next()
    } else {
        charged.add_months(2)
    }
}

/// What a single credit-card charge bills in `target`, if anything
pub fn credit_card_amount_for_month(expense: &CreditCardExpense, target: YearMonth) -> Option<f64> {
    let first_posting = posting_month(expense);
    if target < first_posting {
        return None;
    }

    let surcharge_factor = 1.0 + expense.surcharge / 100.0;
    if expense.item.is_recurring {
        return capped_recurring_amount(&expense.item, target).map(|amount| amount * surcharge_factor);
    }

    let installments = expense.installment_count();
    if installments > 1 {
        let last_posting = first_posting.add_months(installments - 1);
        (target <= last_posting).then(|| expense.total_with_surcharge() / installments as f64)
    } else {
        (target == first_posting).then(|| expense.total_with_surcharge())
    }
}

/// Sum credit-card charges billed in `target` by card
pub fn credit_card_totals(expenses: &[CreditCardExpense], target: YearMonth) -> LabelTotals {
    let mut totals = LabelTotals::new();
    for expense in expenses {
        if let Some(amount) = credit_card_amount_for_month(expense, target) {
            accumulate(&mut totals, expense.card_label(), amount);
        }
    }
    totals
}

fn build_chart(
    dataset_label: &str,
    totals: LabelTotals,
    shades: &[String],
    store: &dyn KeyValueStore,
) -> Result<ChartData> {
    let (labels, data): (Vec<String>, Vec<f64>) = totals.into_iter().unzip();
    if labels.is_empty() {
        return Ok(ChartData {
            labels,
            datasets: vec![ChartDataset {
                label: dataset_label.to_string(),
                border_color: vec![SLICE_BORDER_COLOR.to_string()],
                ..ChartDataset::default()
            }],
        });
    }

    let color_map = assign_colors(&labels, shades, store)?;
    let background_color = labels
        .iter()
        .map(|label| color_map.get(label).cloned().unwrap_or_default())
        .collect();

    Ok(ChartData {
        labels,
        datasets: vec![ChartDataset {
            label: dataset_label.to_string(),
            data,
            background_color,
            border_color: vec![SLICE_BORDER_COLOR.to_string()],
            border_width: None,
        }],
    })
}

pub fn prepare_income_chart_data(
    incomes: &[FinancialItem],
    target: YearMonth,
    shades: &[String],
    store: &dyn KeyValueStore,
) -> Result<ChartData> {
    build_chart("Incomes", category_totals(incomes, target), shades, store)
}

pub fn prepare_expense_chart_data(
    expenses: &[FinancialItem],
    target: YearMonth,
    shades: &[String],
    store: &dyn KeyValueStore,
) -> Result<ChartData> {
    build_chart("Expenses", category_totals(expenses, target), shades, store)
}

pub fn prepare_credit_card_chart_data(
    expenses: &[CreditCardExpense],
    target: YearMonth,
    shades: &[String],
    store: &dyn KeyValueStore,
) -> Result<ChartData> {
    build_chart("Credit Card Expenses", credit_card_totals(expenses, target), shades, store)
}

/// Horizontal bar chart of the summary percentages
pub fn prepare_bar_chart_data(percentages: &Percentages) -> ChartData {
    let data = [
        &percentages.net_percentage,
        &percentages.cash_flow_percentage,
        &percentages.credit_card_percentage,
    ]
    .iter()
    .map(|value| value.parse::<f64>().unwrap_or(0.0))
    .collect();

    ChartData {
        labels: vec!["Net".to_string(), "Cash Flow".to_string(), "Credit Card".to_string()],
        datasets: vec![ChartDataset {
            label: "Financial Overview (%)".to_string(),
            data,
            background_color: vec![
                "rgba(52, 152, 219, 0.6)".to_string(),
                "rgba(46, 204, 113, 0.6)".to_string(),
                "rgba(231, 76, 60, 0.6)".to_string(),
            ],
            border_color: vec![
                "rgba(52, 152, 219, 1)".to_string(),
                "rgba(46, 204, 113, 1)".to_string(),
                "rgba(231, 76, 60, 1)".to_string(),
            ],
            border_width: Some(1),
        }],
    }
}
