//! # Budget Tracker Client
//!
//! Client-side engine of the budget tracker: pulls incomes, expenses and
//! credit-card expenses from the REST backend and turns them into monthly
//! chart payloads, totals and percentages.
//!
//! ## Layers
//!
//! - **domain**: recurring amounts, installments, merging, charts, aggregates
//! - **io**: HTTP client for the backend and text reports
//! - **storage**: key-value preferences (chart color assignments)
//! - **config**: defaults, environment and validation

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

pub use config::ClientConfig;
pub use error::{FetchError, SummaryError};

use domain::{FinancialDataService, SummaryService};
use io::ApiClient;
use storage::YamlFileStore;

/// Services shared by every command
#[derive(Clone)]
pub struct AppState {
    pub summary_service: SummaryService,
}

/// Wire up HTTP client, preference store and domain services from `config`
pub fn initialize_client(config: &ClientConfig) -> Result<AppState> {
    config.validate()?;

    info!("Setting up preference store in {}", config.data_directory.display());
    let preferences = Arc::new(YamlFileStore::new(&config.data_directory)?);

    info!("Setting up API client for {}", config.base_url);
    let api_client = Arc::new(ApiClient::new(config)?);

    info!("Setting up domain model");
    let year_fetch_limit = Arc::new(Semaphore::new(config.max_concurrent_year_fetches));
    let financial_data = FinancialDataService::new(api_client, year_fetch_limit);
    let summary_service = SummaryService::new(financial_data, preferences);

    Ok(AppState { summary_service })
}
