//! # Budget API Client
//!
//! Thin async HTTP adapter over the budget backend's REST API. One year of
//! data is three GET requests issued together:
//!
//! - `GET {base}/incomes/?year=Y&include_recurring=true`
//! - `GET {base}/expenses/?year=Y&include_recurring=true`
//! - `GET {base}/credit-card-expenses/?year=Y&include_recurring=true`
//!
//! Every request carries `Authorization: Token <token>` when a token is
//! configured. Amounts may arrive as JSON numbers or decimal strings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use shared::{CreditCardExpense, FinancialItem, YearData};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::domain::YearDataSource;
use crate::error::FetchError;

pub const INCOMES_RESOURCE: &str = "incomes";
pub const EXPENSES_RESOURCE: &str = "expenses";
pub const CREDIT_CARD_EXPENSES_RESOURCE: &str = "credit-card-expenses";

#[derive(Debug, Clone)]
struct Endpoints {
    incomes: Url,
    expenses: Url,
    credit_card_expenses: Url,
}

impl Endpoints {
    fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).with_context(|| format!("Invalid API base URL '{}'", base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |resource: &str| {
            base.join(&format!("{}/", resource))
                .with_context(|| format!("Cannot build URL for {}", resource))
        };

        Ok(Self {
            incomes: join(INCOMES_RESOURCE)?,
            expenses: join(EXPENSES_RESOURCE)?,
            credit_card_expenses: join(CREDIT_CARD_EXPENSES_RESOURCE)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoints = Endpoints::new(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Token {}", token))
                .context("API token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, endpoints })
    }

    pub async fn fetch_incomes(&self, year: i32) -> Result<Vec<FinancialItem>, FetchError> {
        self.get_items(INCOMES_RESOURCE, &self.endpoints.incomes, year).await
    }

    pub async fn fetch_expenses(&self, year: i32) -> Result<Vec<FinancialItem>, FetchError> {
        self.get_items(EXPENSES_RESOURCE, &self.endpoints.expenses, year).await
    }

    pub async fn fetch_credit_card_expenses(&self, year: i32) -> Result<Vec<CreditCardExpense>, FetchError> {
        self.get_items(CREDIT_CARD_EXPENSES_RESOURCE, &self.endpoints.credit_card_expenses, year)
            .await
    }

    async fn get_items<T: DeserializeOwned>(&self, resource: &str, url: &Url, year: i32) -> Result<Vec<T>, FetchError> {
        debug!("GET {} for year {}", url, year);

        let response = self
            .http
            .get(url.clone())
            .query(&[("year", year.to_string()), ("include_recurring", "true".to_string())])
            .send()
            .await
            .map_err(|e| {
                error!("Request error for {}: {}", resource, e);
                FetchError::Http {
                    resource: resource.to_string(),
                    source: e,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Response error for {}: status {}", resource, status);
            return Err(FetchError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read {} response body: {}", resource, e);
            FetchError::Http {
                resource: resource.to_string(),
                source: e,
            }
        })?;

        let items: Vec<T> = serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to decode {} response: {}", resource, e);
            FetchError::Decode {
                resource: resource.to_string(),
                source: e,
            }
        })?;

        debug!("Received {} {} for {}", items.len(), resource, year);
        Ok(items)
    }
}

#[async_trait]
impl YearDataSource for ApiClient {
    async fn fetch_year(&self, year: i32) -> Result<YearData, FetchError> {
        let (incomes, expenses, credit_card_expenses) = tokio::try_join!(
            self.fetch_incomes(year),
            self.fetch_expenses(year),
            self.fetch_credit_card_expenses(year),
        )?;

        Ok(YearData {
            incomes,
            expenses,
            credit_card_expenses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_endpoints_with_trailing_slash() {
        let endpoints = Endpoints::new("http://localhost:8000/api/").unwrap();
        assert_eq!(endpoints.incomes.as_str(), "http://localhost:8000/api/incomes/");
        assert_eq!(endpoints.expenses.as_str(), "http://localhost:8000/api/expenses/");
        assert_eq!(
            endpoints.credit_card_expenses.as_str(),
            "http://localhost:8000/api/credit-card-expenses/"
        );
    }

    #[test]
    fn test_endpoints_without_trailing_slash_keep_prefix() {
        let endpoints = Endpoints::new("https://budget.example.com/v1/api").unwrap();
        assert_eq!(endpoints.incomes.as_str(), "https://budget.example.com/v1/api/incomes/");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ApiClient::new(&config("::not a url::")).is_err());
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let mut config = config("http://localhost:8000/api/");
        config.token = Some("abc\ndef".to_string());
        assert!(ApiClient::new(&config).is_err());
    }

    #[test]
    fn test_client_builds_with_token() {
        let mut config = config("http://localhost:8000/api/");
        config.token = Some("abc123".to_string());
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.endpoints.incomes.path(), "/api/incomes/");
    }
}
