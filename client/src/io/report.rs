//! Plain-text rendering of a monthly summary for terminal output.

use shared::{ChartData, FinancialSummary};
use std::fmt::Write;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Render `summary` as an aligned text report
pub fn render_text(summary: &FinancialSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Budget summary for {} {}", month_name(summary.month), summary.year);
    let _ = writeln!(out);

    write_section(&mut out, "Incomes", &summary.income_chart);
    write_section(&mut out, "Expenses", &summary.expense_chart);
    write_section(&mut out, "Credit cards", &summary.credit_card_chart);

    let _ = writeln!(out, "Totals");
    write_line(&mut out, "income", summary.total_income);
    write_line(&mut out, "expenses", summary.total_expenses);
    write_line(&mut out, "credit card", summary.total_credit_card_debt);
    write_line(&mut out, "net", summary.net);
    let _ = writeln!(out);

    let _ = writeln!(out, "Share of income");
    let _ = writeln!(out, "  {:<24}{:>12}%", "net", summary.percentages.net_percentage);
    let _ = writeln!(out, "  {:<24}{:>12}%", "cash flow", summary.percentages.cash_flow_percentage);
    let _ = writeln!(out, "  {:<24}{:>12}%", "credit card", summary.percentages.credit_card_percentage);
    out
}

fn write_section(out: &mut String, title: &str, chart: &ChartData) {
    let _ = writeln!(out, "{}", title);
    let values = chart.datasets.first().map(|dataset| dataset.data.as_slice()).unwrap_or(&[]);
    if chart.labels.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (label, value) in chart.labels.iter().zip(values) {
        write_line(out, label, *value);
    }
    let _ = writeln!(out);
}

fn write_line(out: &mut String, label: &str, value: f64) {
    let _ = writeln!(out, "  {:<24}{:>12.2}", label, value);
}
