//! # Multi-Year Financial Data
//!
//! Installment plans started in earlier years still bill in the requested
//! year, so fetching a single year is not enough. The service:
//!
//! 1. fetches the requested year,
//! 2. derives how many earlier years can still carry open installments
//!    (`ceil(max_installments / 12)`),
//! 3. fetches those years concurrently, admitting at most as many fetches as
//!    the injected semaphore has permits,
//! 4. merges everything by record id, preferring the requested year's copy.
//!
//! Any failed fetch aborts the whole operation; outstanding fetches are
//! cancelled and no partial data is returned.

use async_trait::async_trait;
use shared::YearData;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::merge::merge_data;
use crate::error::FetchError;

pub const DEFAULT_MAX_CONCURRENT_YEAR_FETCHES: usize = 5;

const MONTHS_PER_YEAR: u32 = 12;

/// Anything that can deliver one calendar year of budget records
#[async_trait]
pub trait YearDataSource: Send + Sync {
    /// Incomes, expenses and credit-card expenses for `year`, recurring
    /// items included
    async fn fetch_year(&self, year: i32) -> Result<YearData, FetchError>;
}

/// Number of earlier years that can still hold open installments
pub fn years_to_fetch(max_installments: u32) -> u32 {
    max_installments.div_ceil(MONTHS_PER_YEAR)
}

/// Merge the requested year's data with earlier years (nearest year first)
pub fn merge_year_data(current: YearData, past: Vec<YearData>) -> YearData {
    let mut past_incomes = Vec::new();
    let mut past_expenses = Vec::new();
    let mut past_credit_card_expenses = Vec::new();
    for year in past {
        past_incomes.extend(year.incomes);
        past_expenses.extend(year.expenses);
        past_credit_card_expenses.extend(year.credit_card_expenses);
    }

    YearData {
        incomes: merge_data(current.incomes, past_incomes),
        expenses: merge_data(current.expenses, past_expenses),
        credit_card_expenses: merge_data(current.credit_card_expenses, past_credit_card_expenses),
    }
}

/// Assembles the dataset needed to chart any month of a year
#[derive(Clone)]
pub struct FinancialDataService {
    source: Arc<dyn YearDataSource>,
    year_fetch_limit: Arc<Semaphore>,
}

impl FinancialDataService {
    /// `year_fetch_limit` bounds how many past-year fetches run at once
    pub fn new(source: Arc<dyn YearDataSource>, year_fetch_limit: Arc<Semaphore>) -> Self {
        Self {
            source,
            year_fetch_limit,
        }
    }

    pub async fn fetch_financial_data(&self, year: i32) -> Result<YearData, FetchError> {
        info!("Fetching financial data for {}", year);
        let current = self.source.fetch_year(year).await?;

        let max_installments = current.max_installments();
        let years_back = years_to_fetch(max_installments);
        debug!(
            "Max installments in {} is {}, fetching {} earlier year(s)",
            year, max_installments, years_back
        );

        let past = self.fetch_past_years(year, years_back).await?;
        let merged = merge_year_data(current, past);

        info!(
            "Financial data for {} ready: {} incomes, {} expenses, {} credit card expenses",
            year,
            merged.incomes.len(),
            merged.expenses.len(),
            merged.credit_card_expenses.len()
        );
        Ok(merged)
    }

    /// Fetch `year-1 ..= year-years_back`, returned nearest year first.
    ///
    /// A task is only spawned once it holds a permit, so no more tasks exist
    /// than the limiter admits, however many years are requested.
    async fn fetch_past_years(&self, year: i32, years_back: u32) -> Result<Vec<YearData>, FetchError> {
        let mut tasks = JoinSet::new();
        let mut fetched = Vec::new();
        let mut next_offset = 1;

        while next_offset <= years_back || !tasks.is_empty() {
            tokio::select! {
                permit = Arc::clone(&self.year_fetch_limit).acquire_owned(), if next_offset <= years_back => {
                    let permit = permit
                        .map_err(|_| FetchError::Task("year fetch limiter was closed".to_string()))?;
                    let source = Arc::clone(&self.source);
                    let offset = next_offset;
                    let past_year = year - offset as i32;
                    next_offset += 1;

                    tasks.spawn(async move {
                        let _permit = permit;
                        debug!("Fetching past year {}", past_year);
                        source.fetch_year(past_year).await.map(|data| (offset, data))
                    });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    let outcome = joined.map_err(|e| FetchError::Task(e.to_string())).and_then(|result| result);
                    match outcome {
                        Ok(year_data) => fetched.push(year_data),
                        Err(e) => {
                            warn!("Aborting financial data fetch for {}: {}", year, e);
                            tasks.abort_all();
                            return Err(e);
                        }
                    }
                }
            }
        }

        fetched.sort_by_key(|(offset, _)| *offset);
        Ok(fetched.into_iter().map(|(_, data)| data).collect())
    }
}
