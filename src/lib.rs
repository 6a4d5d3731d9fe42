//! # Expense Dashboard
//!
//! A library for turning an invoice/purchase CSV export into the aggregates
//! behind a single-page expense dashboard.
//!
//! ## Core Concepts
//!
//! - **Records**: One row per invoice with vendor, category, a signed value and
//!   two day-first dates (invoice and posting)
//! - **Heatmap Grid**: Daily totals densified onto a (year, month, day 1-31) grid
//!   with zero fill, pivoted per year into a month x day matrix
//! - **Breakdowns**: Vendor totals, a vendor x category bubble set and a category
//!   treemap for the selected year
//! - **Key Metrics**: Total spend, order count, top expense and invoice
//!   processing times
//!
//! Everything is recomputed from the loaded records on each call; nothing is
//! cached between selections.
//!
//! ## Example
//!
//! ```rust,ignore
//! use expense_dashboard::*;
//!
//! let dashboard = Dashboard::from_path("data/startup.csv")?;
//! let year = dashboard.default_year().unwrap();
//! let view = dashboard.view(YearSelection::Year(year));
//!
//! println!("Spent {} over {} orders", view.metrics.total_expenditure, view.metrics.order_count);
//! println!("{}", view.to_json()?);
//! ```

pub mod breakdown;
pub mod error;
pub mod heatmap;
pub mod ingestion;
pub mod metrics;
pub mod schema;
pub mod utils;

pub use breakdown::{
    bubble_points, category_totals, category_treemap, vendor_totals, BubblePoint, CategoryTotal,
    TreemapNode, VendorTotal,
};
pub use error::{DashboardError, Result};
pub use heatmap::{densify_heatmap, DailyTotal, DensifyMode, HeatmapDensifier, HeatmapMatrix};
pub use ingestion::{load_csv, load_records};
pub use metrics::{key_metrics, KeyMetrics, TopExpense};
pub use schema::*;
pub use utils::*;

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardView {
    pub selection: YearSelection,

    #[schemars(
        description = "Month x day totals for the selected year. Empty when all years are selected."
    )]
    pub heatmap: HeatmapMatrix,

    pub treemap: TreemapNode,

    pub bubbles: Vec<BubblePoint>,

    #[schemars(description = "Vendors ranked by total spend, largest first")]
    pub vendor_totals: Vec<VendorTotal>,

    pub metrics: KeyMetrics,
}

impl DashboardView {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DashboardView)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

/// A loaded dataset for one session. Load once, then ask for views.
pub struct Dashboard {
    records: Vec<ExpenseRecord>,
    densify_mode: DensifyMode,
}

impl Dashboard {
    pub fn new(records: Vec<ExpenseRecord>) -> Self {
        info!(
            "Dashboard initialised with {} records across years {:?}",
            records.len(),
            distinct_years(&records)
        );
        Self {
            records,
            densify_mode: DensifyMode::default(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_csv(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(load_records(reader)?))
    }

    pub fn with_densify_mode(mut self, mode: DensifyMode) -> Self {
        self.densify_mode = mode;
        self
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn densify_mode(&self) -> DensifyMode {
        self.densify_mode
    }

    pub fn year_options(&self) -> Vec<i32> {
        distinct_years(&self.records)
    }

    /// Every year followed by the "All Years" sentinel.
    pub fn selection_options(&self) -> Vec<YearSelection> {
        self.year_options()
            .into_iter()
            .map(YearSelection::Year)
            .chain(std::iter::once(YearSelection::AllYears))
            .collect()
    }

    /// The year preselected when the dashboard opens: the second year in the
    /// selector, or the only one when there is a single year.
    pub fn default_year(&self) -> Option<i32> {
        let years = self.year_options();
        years.get(1).or_else(|| years.first()).copied()
    }

    pub fn heatmap(&self) -> Vec<DailyTotal> {
        densify_heatmap(&self.records, self.densify_mode)
    }

    /// Runs the full pipeline for one selection. A year without records
    /// yields a view with empty aggregates and empty metrics.
    pub fn view(&self, selection: YearSelection) -> DashboardView {
        let heatmap = match selection {
            YearSelection::Year(year) => {
                let grid = self.heatmap();
                debug!("Heatmap grid has {} cells", grid.len());
                HeatmapMatrix::for_year(&grid, year)
            }
            YearSelection::AllYears => HeatmapMatrix::empty(None),
        };

        let view = DashboardView {
            selection,
            heatmap,
            treemap: category_treemap(&self.records, selection),
            bubbles: bubble_points(&self.records, selection),
            vendor_totals: vendor_totals(&self.records, selection),
            metrics: key_metrics(&self.records, selection),
        };

        info!(
            "Built view for {}: {} orders, {} vendors, {} bubbles",
            selection,
            view.metrics.order_count,
            view.vendor_totals.len(),
            view.bubbles.len()
        );

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Vendor,Category,Value,Invoice_Date,Posting_Date
A,X,100,01/01/2023,05/01/2023
B,Y,200,02/01/2023,02/01/2023
C,X,75.5,15/06/2022,20/06/2022
";

    #[test]
    fn test_end_to_end_view() {
        let dashboard = Dashboard::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dashboard.year_options(), vec![2022, 2023]);
        assert_eq!(dashboard.default_year(), Some(2023));

        let view = dashboard.view(YearSelection::Year(2023));
        assert_eq!(view.metrics.total_expenditure, 300.0);
        assert_eq!(view.vendor_totals[0].vendor, "B");
        assert_eq!(view.treemap.label, "Year: 2023");
        assert_eq!(view.heatmap.year, Some(2023));
        assert_eq!(view.heatmap.total(), 300.0);
    }

    #[test]
    fn test_year_without_records_gives_empty_view() {
        let dashboard = Dashboard::from_reader(SAMPLE.as_bytes()).unwrap();
        let view = dashboard.view(YearSelection::Year(1999));

        assert_eq!(view.heatmap, HeatmapMatrix::empty(Some(1999)));
        assert_eq!(view.treemap.label, "Year: 1999");
        assert!(view.treemap.children.is_empty());
        assert_eq!(view.treemap.value, 0.0);
        assert!(view.bubbles.is_empty());
        assert!(view.vendor_totals.is_empty());
        assert!(view.metrics.is_empty());

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert!(json["metrics"]["top_expense"].is_null());
        assert!(json["metrics"]["average_processing_days"].is_null());
        assert!(json["metrics"]["max_processing_days"].is_null());
    }

    #[test]
    fn test_all_years_view() {
        let dashboard = Dashboard::from_reader(SAMPLE.as_bytes()).unwrap();
        let view = dashboard.view(YearSelection::AllYears);
        assert!(view.heatmap.is_empty());
        assert_eq!(view.treemap.label, "All Years");
        assert_eq!(view.metrics.order_count, 3);
    }

    #[test]
    fn test_selection_options_end_with_sentinel() {
        let dashboard = Dashboard::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            dashboard.selection_options(),
            vec![
                YearSelection::Year(2022),
                YearSelection::Year(2023),
                YearSelection::AllYears
            ]
        );
    }

    #[test]
    fn test_default_year_edge_cases() {
        assert_eq!(Dashboard::new(vec![]).default_year(), None);

        let single = "\
Vendor,Category,Value,Invoice_Date,Posting_Date
A,X,1,01/01/2021,01/01/2021
";
        let dashboard = Dashboard::from_reader(single.as_bytes()).unwrap();
        assert_eq!(dashboard.default_year(), Some(2021));
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = DashboardView::schema_as_json().unwrap();
        assert!(schema_json.contains("vendor_totals"));
        assert!(schema_json.contains("average_processing_days"));
        assert!(schema_json.contains("month_labels"));
    }
}
