use crate::schema::{ExpenseRecord, YearSelection};
use crate::utils::round2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TopExpense {
    pub vendor: String,
    pub value: f64,
}

/// Sidebar KPIs for one selection.
///
/// An empty selection is a normal state, not an error: the totals are zero
/// and every statistic that needs at least one record is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyMetrics {
    pub selection: YearSelection,

    #[schemars(description = "Sum of all values, rounded to 2 decimal places")]
    pub total_expenditure: f64,

    pub order_count: usize,

    #[schemars(description = "First record holding the largest value, in input order")]
    pub top_expense: Option<TopExpense>,

    #[schemars(
        description = "Mean of posting date minus invoice date, rounded to 2 decimal places"
    )]
    pub average_processing_days: Option<f64>,

    #[schemars(description = "Longest posting date minus invoice date, in days")]
    pub max_processing_days: Option<i64>,
}

impl KeyMetrics {
    pub fn compute(records: &[ExpenseRecord], selection: YearSelection) -> Self {
        let mut total = 0.0;
        let mut count = 0usize;
        let mut top: Option<&ExpenseRecord> = None;
        let mut days_sum = 0i64;
        let mut days_max: Option<i64> = None;

        for record in records.iter().filter(|r| selection.matches(r)) {
            total += record.value;
            count += 1;

            // strict comparison keeps the earliest record on ties
            if top.map_or(true, |t| record.value > t.value) {
                top = Some(record);
            }

            let days = record.processing_days();
            days_sum += days;
            days_max = Some(days_max.map_or(days, |m| m.max(days)));
        }

        let average_processing_days = if count > 0 {
            Some(round2(days_sum as f64 / count as f64))
        } else {
            None
        };

        Self {
            selection,
            total_expenditure: round2(total),
            order_count: count,
            top_expense: top.map(|r| TopExpense {
                vendor: r.vendor.clone(),
                value: r.value,
            }),
            average_processing_days,
            max_processing_days: days_max,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }
}

pub fn key_metrics(records: &[ExpenseRecord], selection: YearSelection) -> KeyMetrics {
    KeyMetrics::compute(records, selection)
}
