//! Vendor and category breakdowns for a selected year.

use crate::schema::{ExpenseRecord, YearSelection};
use crate::utils::round2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VendorTotal {
    pub vendor: String,
    #[schemars(description = "Summed value, rounded to 2 decimal places")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryTotal {
    pub category: String,
    pub value: f64,
}

/// A sized marker for the vendor x category bubble chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BubblePoint {
    pub vendor: String,
    pub category: String,
    #[schemars(description = "Sum of the strictly positive values for this pair")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TreemapNode {
    #[schemars(description = "Root label, e.g. 'Year: 2023' or 'All Years'")]
    pub label: String,
    pub value: f64,
    pub children: Vec<CategoryTotal>,
}

fn by_value_desc<K: Ord>(mut totals: Vec<(K, f64)>) -> Vec<(K, f64)> {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}

/// Spend per vendor, largest first. Ties are ordered by vendor name.
pub fn vendor_totals(records: &[ExpenseRecord], selection: YearSelection) -> Vec<VendorTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| selection.matches(r)) {
        *sums.entry(record.vendor.as_str()).or_insert(0.0) += record.value;
    }

    let rounded = sums.into_iter().map(|(v, total)| (v, round2(total))).collect();
    by_value_desc(rounded)
        .into_iter()
        .map(|(vendor, value)| VendorTotal {
            vendor: vendor.to_string(),
            value,
        })
        .collect()
}

/// Positive spend per (vendor, category). Credits and refunds are dropped
/// before grouping, so a year with none left yields an empty Vec.
pub fn bubble_points(records: &[ExpenseRecord], selection: YearSelection) -> Vec<BubblePoint> {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.value > 0.0 && selection.matches(r))
    {
        *sums
            .entry((record.vendor.as_str(), record.category.as_str()))
            .or_insert(0.0) += record.value;
    }

    sums.into_iter()
        .map(|((vendor, category), value)| BubblePoint {
            vendor: vendor.to_string(),
            category: category.to_string(),
            value,
        })
        .collect()
}

pub fn category_totals(records: &[ExpenseRecord], selection: YearSelection) -> Vec<CategoryTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| selection.matches(r)) {
        *sums.entry(record.category.as_str()).or_insert(0.0) += record.value;
    }

    by_value_desc(sums.into_iter().collect())
        .into_iter()
        .map(|(category, value)| CategoryTotal {
            category: category.to_string(),
            value,
        })
        .collect()
}

/// Category spend rooted under a label naming the year scope.
pub fn category_treemap(records: &[ExpenseRecord], selection: YearSelection) -> TreemapNode {
    let children = category_totals(records, selection);
    let value: f64 = children.iter().map(|c| c.value).sum();
    TreemapNode {
        label: selection.scope_label(),
        // an empty sum is -0.0
        value: if value == 0.0 { 0.0 } else { value },
        children,
    }
}
