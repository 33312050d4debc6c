use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An income or expense record as served by the budget backend.
///
/// Incomes and plain expenses share this shape. Recurring items repeat every
/// month from `date` onward, with their amount amended by `change_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialItem {
    pub id: i64,
    /// Category display name (the backend flattens `category.name` into this field)
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// ISO 8601 date (YYYY-MM-DD); for recurring items this is the start date
    pub date: NaiveDate,
    /// Amount; the backend sends decimals either as numbers or as strings
    #[serde(with = "amount")]
    pub amount: f64,
    #[serde(default)]
    pub is_recurring: bool,
    /// Installment count, only present on expenses
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub change_logs: Vec<ChangeLogEntry>,
}

/// An amendment to a recurring item's amount, effective from its month onward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: i64,
    pub effective_date: NaiveDate,
    #[serde(with = "amount")]
    pub new_amount: f64,
}

/// A credit card as nested inside credit-card expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    #[serde(default)]
    pub id: Option<i64>,
    pub brand: String,
    pub last_four_digits: String,
    /// Statement close day (1-31); charges after it post one month later
    pub close_card_day: u32,
}

/// A charge made with a credit card, possibly split into installments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardExpense {
    #[serde(flatten)]
    pub item: FinancialItem,
    pub credit_card: CreditCard,
    /// Surcharge percentage applied to the total before splitting
    #[serde(default, deserialize_with = "amount::deserialize_or_zero")]
    pub surcharge: f64,
}

impl CreditCardExpense {
    /// Number of monthly postings; missing or zero counts as a single payment
    pub fn installment_count(&self) -> u32 {
        self.item.installments.unwrap_or(1).max(1)
    }

    /// Total amount owed including surcharge
    pub fn total_with_surcharge(&self) -> f64 {
        self.item.amount * (1.0 + self.surcharge / 100.0)
    }

    /// Chart label identifying the card, e.g. "Visa ending in 4242"
    pub fn card_label(&self) -> String {
        format!(
            "{} ending in {}",
            self.credit_card.brand, self.credit_card.last_four_digits
        )
    }
}

/// Everything the backend returns for one calendar year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearData {
    pub incomes: Vec<FinancialItem>,
    pub expenses: Vec<FinancialItem>,
    pub credit_card_expenses: Vec<CreditCardExpense>,
}

impl YearData {
    /// Largest installment count across plain and credit-card expenses
    pub fn max_installments(&self) -> u32 {
        self.expenses
            .iter()
            .filter_map(|expense| expense.installments)
            .chain(
                self.credit_card_expenses
                    .iter()
                    .filter_map(|expense| expense.item.installments),
            )
            .max()
            .unwrap_or(0)
    }
}

/// Chart payload in the shape chart widgets consume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
}

/// Spending ratios relative to total income, formatted with two decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentages {
    pub net_percentage: String,
    pub cash_flow_percentage: String,
    pub credit_card_percentage: String,
}

/// Monthly overview handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub year: i32,
    pub month: u32,
    pub income_chart: ChartData,
    pub expense_chart: ChartData,
    pub credit_card_chart: ChartData,
    pub bar_chart: ChartData,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_credit_card_debt: f64,
    pub net: f64,
    pub percentages: Percentages,
}

/// Decimal fields arrive as JSON numbers or as strings such as "1200.00".
mod amount {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    impl RawAmount {
        fn into_f64<E: Error>(self) -> Result<f64, E> {
            match self {
                RawAmount::Number(value) => Ok(value),
                RawAmount::Text(text) => text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| E::custom(format!("invalid decimal amount: {:?}", text))),
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        RawAmount::deserialize(deserializer)?.into_f64()
    }

    pub fn deserialize_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<RawAmount>::deserialize(deserializer)? {
            Some(raw) => raw.into_f64(),
            None => Ok(0.0),
        }
    }
}
