pub mod year_month;

pub use year_month::YearMonth;
