use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_tracker_client::domain::YearMonth;
use budget_tracker_client::io::render_text;
use budget_tracker_client::{initialize_client, ClientConfig};
use clap::{Parser, ValueEnum};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Print the monthly budget summary: per-category charts, totals and percentages
#[derive(Debug, Parser)]
#[command(name = "budget-summary", version)]
struct Args {
    /// Year to summarize (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,

    /// Month to summarize, 1-12 (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Step one month back from the selected month
    #[arg(long, conflicts_with = "next")]
    previous: bool,

    /// Step one month forward from the selected month
    #[arg(long)]
    next: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Overrides BUDGET_API_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides BUDGET_API_TOKEN
    #[arg(long)]
    token: Option<String>,

    /// Overrides BUDGET_DATA_DIR
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Overrides BUDGET_FETCH_CONCURRENCY
    #[arg(long)]
    concurrency: Option<usize>,
}

impl Args {
    fn apply_to(&self, config: &mut ClientConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_directory = data_dir.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrent_year_fetches = concurrency;
        }
    }

    fn target_month(&self, today: YearMonth) -> Result<YearMonth> {
        let year = self.year.unwrap_or(today.year);
        let month = self.month.unwrap_or(today.month);
        let selected = YearMonth::new(year, month).with_context(|| format!("Invalid month {}", month))?;

        Ok(if self.previous {
            selected.previous()
        } else if self.next {
            selected.next()
        } else {
            selected
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    args.apply_to(&mut config);
    config.validate()?;

    let target = args.target_month(YearMonth::current())?;
    info!("Building summary for {}", target);

    let app_state = initialize_client(&config)?;
    let summary = app_state
        .summary_service
        .monthly_summary(target.year, target.month)
        .await?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_2024() -> YearMonth {
        YearMonth::new(2024, 5).unwrap()
    }

    #[test]
    fn test_defaults_to_current_month() {
        let args = Args::try_parse_from(["budget-summary"]).unwrap();
        assert_eq!(args.target_month(may_2024()).unwrap(), may_2024());
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_previous_wraps_year() {
        let args = Args::try_parse_from(["budget-summary", "--year", "2024", "--month", "1", "--previous"]).unwrap();
        assert_eq!(args.target_month(may_2024()).unwrap(), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn test_next_wraps_year() {
        let args = Args::try_parse_from(["budget-summary", "--month", "12", "--next"]).unwrap();
        assert_eq!(args.target_month(may_2024()).unwrap(), YearMonth::new(2025, 1).unwrap());
    }

    #[test]
    fn test_previous_and_next_conflict() {
        assert!(Args::try_parse_from(["budget-summary", "--previous", "--next"]).is_err());
    }

    #[test]
    fn test_month_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["budget-summary", "--month", "13"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "budget-summary",
            "--base-url",
            "http://127.0.0.1:9000/api/",
            "--token",
            "secret",
            "--concurrency",
            "2",
            "--format",
            "json",
        ])
        .unwrap();
        let mut config = ClientConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.base_url, "http://127.0.0.1:9000/api/");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.max_concurrent_year_fetches, 2);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
