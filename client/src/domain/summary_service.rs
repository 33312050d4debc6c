//! # Monthly Summary Service
//!
//! Orchestrates a full refresh for one month: multi-year fetch, chart
//! preparation for incomes, expenses and credit cards, then totals and
//! percentages.
//!
//! Every request takes a ticket from a shared counter. A request whose fetch
//! completes after a newer request was issued is reported as
//! [`SummaryError::Superseded`] instead of returning data for a month the
//! caller has already navigated away from.

use anyhow::Result;
use shared::{FinancialSummary, YearData};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use super::aggregates::{
    calculate_net, calculate_percentages, calculate_total_credit_card_debt, calculate_total_expenses,
    calculate_total_income,
};
use super::charts::{
    prepare_bar_chart_data, prepare_credit_card_chart_data, prepare_expense_chart_data,
    prepare_income_chart_data,
};
use super::colors::Palettes;
use super::financial_data::FinancialDataService;
use super::models::YearMonth;
use crate::error::SummaryError;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct SummaryService {
    financial_data: FinancialDataService,
    preferences: Arc<dyn KeyValueStore>,
    palettes: Palettes,
    latest_request: Arc<AtomicU64>,
}

impl SummaryService {
    pub fn new(financial_data: FinancialDataService, preferences: Arc<dyn KeyValueStore>) -> Self {
        Self {
            financial_data,
            preferences,
            palettes: Palettes::default(),
            latest_request: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch and summarize `month` of `year`
    pub async fn monthly_summary(&self, year: i32, month: u32) -> Result<FinancialSummary, SummaryError> {
        let target = YearMonth::new(year, month).ok_or(SummaryError::InvalidMonth(month))?;
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Summary request {} for {}", request, target);

        let data = self.financial_data.fetch_financial_data(year).await?;

        let latest = self.latest_request.load(Ordering::SeqCst);
        if latest != request {
            warn!(
                "Dropping stale summary for {} (request {}, latest {})",
                target, request, latest
            );
            return Err(SummaryError::Superseded { requested: request, latest });
        }

        Ok(self.build_summary(&data, target)?)
    }

    /// Summarize already fetched data for `target`
    pub fn build_summary(&self, data: &YearData, target: YearMonth) -> Result<FinancialSummary> {
        let store = self.preferences.as_ref();
        let income_chart = prepare_income_chart_data(&data.incomes, target, &self.palettes.incomes, store)?;
        let expense_chart = prepare_expense_chart_data(&data.expenses, target, &self.palettes.expenses, store)?;
        let credit_card_chart = prepare_credit_card_chart_data(
            &data.credit_card_expenses,
            target,
            &self.palettes.credit_cards,
            store,
        )?;

        let total_income = calculate_total_income(&income_chart);
        let total_expenses = calculate_total_expenses(&expense_chart);
        let total_credit_card_debt = calculate_total_credit_card_debt(&credit_card_chart);
        let net = calculate_net(total_income, total_expenses, total_credit_card_debt);
        let percentages = calculate_percentages(total_income, total_expenses, total_credit_card_debt, net);
        let bar_chart = prepare_bar_chart_data(&percentages);

        info!(
            "Summary for {}: income {:.2}, expenses {:.2}, credit card {:.2}, net {:.2}",
            target, total_income, total_expenses, total_credit_card_debt, net
        );

        Ok(FinancialSummary {
            year: target.year,
            month: target.month,
            income_chart,
            expense_chart,
            credit_card_chart,
            bar_chart,
            total_income,
            total_expenses,
            total_credit_card_debt,
            net,
            percentages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_utils::{card_expense, date, expense, income, ScriptedSource};
    use crate::storage::InMemoryStore;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    fn summary_service(source: ScriptedSource) -> SummaryService {
        let financial_data = FinancialDataService::new(Arc::new(source), Arc::new(Semaphore::new(5)));
        SummaryService::new(financial_data, Arc::new(InMemoryStore::new()))
    }

    fn may_2024() -> YearData {
        let mut rent = expense(10, "Rent", date(2024, 1, 1), 400.0, None);
        rent.is_recurring = true;
        YearData {
            incomes: vec![
                income(1, "Salary", date(2024, 5, 1), 1000.0),
                income(2, "Salary", date(2024, 4, 1), 1000.0),
            ],
            expenses: vec![rent],
            credit_card_expenses: vec![card_expense(20, date(2024, 4, 10), 200.0, 1)],
        }
    }

    #[tokio::test]
    async fn test_monthly_summary_totals_and_percentages() {
        let service = summary_service(ScriptedSource::new().with_year(2024, may_2024()));

        let summary = service.monthly_summary(2024, 5).await.unwrap();

        assert_eq!(summary.year, 2024);
        assert_eq!(summary.month, 5);
        assert_eq!(summary.income_chart.labels, vec!["salary"]);
        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.total_expenses, 400.0);
        assert_eq!(summary.total_credit_card_debt, 200.0);
        assert_eq!(summary.net, 400.0);
        assert_eq!(summary.percentages.cash_flow_percentage, "40.00");
        assert_eq!(summary.percentages.credit_card_percentage, "20.00");
        assert_eq!(summary.percentages.net_percentage, "40.00");
        assert_eq!(summary.bar_chart.datasets[0].data, vec![40.0, 40.0, 20.0]);
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected_before_fetching() {
        let source = ScriptedSource::new();
        let service = summary_service(source);

        let result = service.monthly_summary(2024, 13).await;
        assert!(matches!(result, Err(SummaryError::InvalidMonth(13))));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let service = summary_service(ScriptedSource::new().failing_year(2024));

        let result = service.monthly_summary(2024, 1).await;
        assert!(matches!(result, Err(SummaryError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_stale_response_is_superseded() {
        let source = ScriptedSource::new()
            .with_year(2023, YearData::default())
            .with_year(2024, may_2024())
            .with_delay(2023, Duration::from_millis(100));
        let service = summary_service(source);

        let (stale, fresh) = tokio::join!(service.monthly_summary(2023, 12), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            service.monthly_summary(2024, 5).await
        });

        assert!(matches!(
            stale,
            Err(SummaryError::Superseded { requested: 1, latest: 2 })
        ));
        assert_eq!(fresh.unwrap().month, 5);
    }

    #[test]
    fn test_build_summary_with_no_data() {
        let service = summary_service(ScriptedSource::new());
        let summary = service
            .build_summary(&YearData::default(), YearMonth::new(2024, 2).unwrap())
            .unwrap();

        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.net, 0.0);
        assert_eq!(summary.percentages.net_percentage, "0.00");
        assert!(summary.credit_card_chart.labels.is_empty());
    }
}
