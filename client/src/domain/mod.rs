//! # Domain Module
//!
//! Business rules of the budget tracker client, independent of HTTP and of
//! where preferences are stored.
//!
//! ## Module Organization
//!
//! - **recurring**: amount in effect for a recurring item in a given month
//! - **merge**: deduplication of records fetched by overlapping year queries
//! - **financial_data**: multi-year fetch orchestration with bounded concurrency
//! - **colors**: stable label → color assignments for charts
//! - **charts**: per-month chart payloads for incomes, expenses and credit cards
//! - **aggregates**: totals, net and percentages
//! - **summary_service**: one-call monthly summary with stale-response detection
//!
//! ## Core Concepts
//!
//! - **Recurring item**: repeats monthly from its start date until amended
//! - **Change log**: amends a recurring amount from a given month onward
//! - **Installment**: a card charge split into equal monthly postings
//! - **Posting month**: the billing month a card charge lands in, driven by
//!   the card's statement close day

pub mod aggregates;
pub mod charts;
pub mod colors;
pub mod financial_data;
pub mod merge;
pub mod models;
pub mod recurring;
pub mod summary_service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use financial_data::{FinancialDataService, YearDataSource, DEFAULT_MAX_CONCURRENT_YEAR_FETCHES};
pub use models::YearMonth;
pub use summary_service::SummaryService;
