//! Totals and ratios derived from prepared chart data.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::{ChartData, Percentages};
use tracing::debug;

/// Sum of the first dataset, 0 for a chart without datasets
pub fn calculate_total(chart: &ChartData) -> f64 {
    chart
        .datasets
        .first()
        .map(|dataset| dataset.data.iter().sum())
        .unwrap_or(0.0)
}

pub fn calculate_total_income(chart: &ChartData) -> f64 {
    calculate_total(chart)
}

pub fn calculate_total_expenses(chart: &ChartData) -> f64 {
    calculate_total(chart)
}

pub fn calculate_total_credit_card_debt(chart: &ChartData) -> f64 {
    calculate_total(chart)
}

pub fn calculate_net(total_income: f64, total_expenses: f64, total_credit_card_debt: f64) -> f64 {
    total_income - total_expenses - total_credit_card_debt
}

/// Expenses, card debt and net as percentages of income.
///
/// With no income there is nothing to relate to; every ratio reports "0.00".
pub fn calculate_percentages(
    total_income: f64,
    total_expenses: f64,
    total_credit_card_debt: f64,
    net: f64,
) -> Percentages {
    if total_income == 0.0 {
        debug!("Total income is zero, reporting all percentages as 0.00");
        return Percentages {
            net_percentage: format_percentage(0.0),
            cash_flow_percentage: format_percentage(0.0),
            credit_card_percentage: format_percentage(0.0),
        };
    }

    Percentages {
        net_percentage: format_percentage(net / total_income * 100.0),
        cash_flow_percentage: format_percentage(total_expenses / total_income * 100.0),
        credit_card_percentage: format_percentage(total_credit_card_debt / total_income * 100.0),
    }
}

/// Two decimals from the exact binary value; exact ties round away from zero
fn format_percentage(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => format!(
            "{:.2}",
            exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ChartDataset;

    fn chart(data: Vec<f64>) -> ChartData {
        ChartData {
            labels: data.iter().map(|value| value.to_string()).collect(),
            datasets: vec![ChartDataset {
                data,
                ..ChartDataset::default()
            }],
        }
    }

    #[test]
    fn test_totals_sum_first_dataset() {
        assert_eq!(calculate_total_income(&chart(vec![1000.0, 500.0])), 1500.0);
        assert_eq!(calculate_total_expenses(&chart(vec![])), 0.0);
        assert_eq!(calculate_total_credit_card_debt(&ChartData::default()), 0.0);
    }

    #[test]
    fn test_calculate_net() {
        assert_eq!(calculate_net(1000.0, 400.0, 200.0), 400.0);
        assert_eq!(calculate_net(100.0, 400.0, 0.0), -300.0);
    }

    #[test]
    fn test_calculate_percentages() {
        let percentages = calculate_percentages(1000.0, 400.0, 200.0, 400.0);
        assert_eq!(percentages.cash_flow_percentage, "40.00");
        assert_eq!(percentages.credit_card_percentage, "20.00");
        assert_eq!(percentages.net_percentage, "40.00");
    }

    #[test]
    fn test_percentages_round_to_two_decimals() {
        let percentages = calculate_percentages(3.0, 1.0, 2.0, 0.0);
        assert_eq!(percentages.cash_flow_percentage, "33.33");
        assert_eq!(percentages.credit_card_percentage, "66.67");
        assert_eq!(percentages.net_percentage, "0.00");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        let percentages = calculate_percentages(800.0, 1.0, 9.0, 790.0);
        assert_eq!(percentages.cash_flow_percentage, "0.13");
        assert_eq!(percentages.credit_card_percentage, "1.13");
        assert_eq!(percentages.net_percentage, "98.75");

        assert_eq!(format_percentage(0.125), "0.13");
        assert_eq!(format_percentage(1.125), "1.13");
        assert_eq!(format_percentage(-0.125), "-0.13");
    }

    #[test]
    fn test_near_ties_follow_the_binary_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(format_percentage(2.675), "2.67");
        assert_eq!(format_percentage(40.0), "40.00");
    }

    #[test]
    fn test_zero_income_reports_zero_percentages() {
        let percentages = calculate_percentages(0.0, 50.0, 10.0, -60.0);
        assert_eq!(percentages.cash_flow_percentage, "0.00");
        assert_eq!(percentages.credit_card_percentage, "0.00");
        assert_eq!(percentages.net_percentage, "0.00");
    }
}
