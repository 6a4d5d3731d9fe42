use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header names every input file must carry.
pub const FIELD_VENDOR: &str = "Vendor";
pub const FIELD_CATEGORY: &str = "Category";
pub const FIELD_VALUE: &str = "Value";
pub const FIELD_INVOICE_DATE: &str = "Invoice_Date";
pub const FIELD_POSTING_DATE: &str = "Posting_Date";

pub const REQUIRED_FIELDS: [&str; 5] = [
    FIELD_VENDOR,
    FIELD_CATEGORY,
    FIELD_VALUE,
    FIELD_INVOICE_DATE,
    FIELD_POSTING_DATE,
];

/// One CSV row exactly as it appears in the export, before any parsing.
///
/// `Value` is kept as text so that a malformed amount can be reported with
/// its line number instead of surfacing as a generic deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Vendor")]
    pub vendor: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Invoice_Date")]
    pub invoice_date: String,
    #[serde(rename = "Posting_Date")]
    pub posting_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseRecord {
    #[schemars(description = "Supplier the invoice was raised by")]
    pub vendor: String,

    #[schemars(description = "Expense category used for the treemap and bubble chart")]
    pub category: String,

    #[schemars(
        description = "Signed monetary amount. Negative values are credits or refunds and are kept."
    )]
    pub value: f64,

    pub invoice_date: NaiveDate,

    pub posting_date: NaiveDate,

    pub invoice_year: i32,

    #[schemars(description = "Calendar month of the invoice date, 1-12")]
    pub invoice_month: u32,

    #[schemars(description = "Day of month of the invoice date, 1-31")]
    pub invoice_day: u32,

    #[schemars(description = "1-based line in the source file, header included")]
    pub source_line: usize,
}

impl ExpenseRecord {
    /// Posting date minus invoice date in whole days. Negative when the
    /// posting precedes the invoice.
    pub fn processing_days(&self) -> i64 {
        (self.posting_date - self.invoice_date).num_days()
    }
}

/// Year scope chosen in the dashboard selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum YearSelection {
    #[schemars(description = "A single invoice year")]
    Year(i32),

    #[schemars(description = "Every record regardless of invoice year")]
    AllYears,
}

impl YearSelection {
    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        match self {
            YearSelection::Year(year) => record.invoice_year == *year,
            YearSelection::AllYears => true,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            YearSelection::Year(year) => Some(*year),
            YearSelection::AllYears => None,
        }
    }

    /// Root label used for the category hierarchy.
    pub fn scope_label(&self) -> String {
        match self {
            YearSelection::Year(year) => format!("Year: {}", year),
            YearSelection::AllYears => "All Years".to_string(),
        }
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::Year(year) => write!(f, "{}", year),
            YearSelection::AllYears => write!(f, "All Years"),
        }
    }
}

impl From<i32> for YearSelection {
    fn from(year: i32) -> Self {
        YearSelection::Year(year)
    }
}
