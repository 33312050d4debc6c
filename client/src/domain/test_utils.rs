//! Scripted in-memory backend for exercising the fetch orchestration in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{CreditCard, CreditCardExpense, FinancialItem, YearData};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use super::financial_data::YearDataSource;
use crate::error::FetchError;

/// Serves canned [`YearData`] per year, records calls and tracks how many
/// fetches overlap.
#[derive(Default)]
pub struct ScriptedSource {
    years: HashMap<i32, YearData>,
    failing_years: HashSet<i32>,
    delays: HashMap<i32, Duration>,
    default_delay: Duration,
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<i32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32, data: YearData) -> Self {
        self.years.insert(year, data);
        self
    }

    pub fn failing_year(mut self, year: i32) -> Self {
        self.failing_years.insert(year);
        self
    }

    pub fn with_delay(mut self, year: i32, delay: Duration) -> Self {
        self.delays.insert(year, delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Every fetch consumes one permit of `gate` before answering
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Years requested so far, in call order
    pub fn calls(&self) -> Vec<i32> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl YearDataSource for ScriptedSource {
    async fn fetch_year(&self, year: i32) -> Result<YearData, FetchError> {
        self.calls.lock().unwrap().push(year);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        let delay = self.delays.get(&year).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_years.contains(&year) {
            return Err(FetchError::Status {
                resource: "expenses".to_string(),
                status: 500,
            });
        }
        Ok(self.years.get(&year).cloned().unwrap_or_default())
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn income(id: i64, category: &str, on: NaiveDate, amount: f64) -> FinancialItem {
    FinancialItem {
        id,
        category_name: Some(category.to_string()),
        description: None,
        date: on,
        amount,
        is_recurring: false,
        installments: None,
        change_logs: Vec::new(),
    }
}

pub fn expense(id: i64, category: &str, on: NaiveDate, amount: f64, installments: Option<u32>) -> FinancialItem {
    FinancialItem {
        installments,
        ..income(id, category, on, amount)
    }
}

pub fn card_expense(id: i64, on: NaiveDate, amount: f64, installments: u32) -> CreditCardExpense {
    CreditCardExpense {
        item: expense(id, "Shopping", on, amount, Some(installments)),
        credit_card: CreditCard {
            id: Some(1),
            brand: "Visa".to_string(),
            last_four_digits: "4242".to_string(),
            close_card_day: 15,
        },
        surcharge: 0.0,
    }
}
