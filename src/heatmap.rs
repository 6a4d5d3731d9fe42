use crate::schema::ExpenseRecord;
use crate::utils::month_abbreviation;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Every (year, month) row of the grid spans days 1 through 31, whether or
/// not the day exists in that month.
pub const GRID_DAYS: u32 = 31;

/// How the sparse daily totals are widened into a full grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DensifyMode {
    /// Every observed year crossed with every month observed in any year.
    /// A (year, month) that never co-occurred still gets 31 zero cells.
    #[default]
    GlobalMonths,

    /// Only the (year, month) pairs that actually have records.
    ObservedPairs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailyTotal {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub value: f64,
}

type DayKey = (i32, u32, u32);

pub struct HeatmapDensifier {
    mode: DensifyMode,
}

impl HeatmapDensifier {
    pub fn new(mode: DensifyMode) -> Self {
        Self { mode }
    }

    /// Sums record values per (year, month, day). Only keys with records.
    pub fn daily_totals(&self, records: &[ExpenseRecord]) -> BTreeMap<DayKey, f64> {
        let mut totals: BTreeMap<DayKey, f64> = BTreeMap::new();
        for record in records {
            *totals
                .entry((record.invoice_year, record.invoice_month, record.invoice_day))
                .or_insert(0.0) += record.value;
        }
        totals
    }

    /// The (year, month) rows the grid will contain, ascending.
    fn grid_rows(&self, totals: &BTreeMap<DayKey, f64>) -> Vec<(i32, u32)> {
        match self.mode {
            DensifyMode::GlobalMonths => {
                let years: BTreeSet<i32> = totals.keys().map(|(y, _, _)| *y).collect();
                let months: BTreeSet<u32> = totals.keys().map(|(_, m, _)| *m).collect();
                years
                    .iter()
                    .flat_map(|y| months.iter().map(move |m| (*y, *m)))
                    .collect()
            }
            DensifyMode::ObservedPairs => totals
                .keys()
                .map(|(y, m, _)| (*y, *m))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    pub fn densify(&self, records: &[ExpenseRecord]) -> Vec<DailyTotal> {
        let totals = self.daily_totals(records);
        let rows = self.grid_rows(&totals);

        debug!(
            "Densifying {} daily totals onto {} (year, month) rows using {:?}",
            totals.len(),
            rows.len(),
            self.mode
        );

        let mut grid = Vec::with_capacity(rows.len() * GRID_DAYS as usize);
        for (year, month) in rows {
            for day in 1..=GRID_DAYS {
                grid.push(DailyTotal {
                    year,
                    month,
                    day,
                    value: totals.get(&(year, month, day)).copied().unwrap_or(0.0),
                });
            }
        }
        grid
    }
}

pub fn densify_heatmap(records: &[ExpenseRecord], mode: DensifyMode) -> Vec<DailyTotal> {
    HeatmapDensifier::new(mode).densify(records)
}

/// One year of the dense grid pivoted into rows = month, columns = day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HeatmapMatrix {
    #[schemars(description = "Year shown, or null when no single year is selected")]
    pub year: Option<i32>,

    #[schemars(description = "Row keys: calendar months present for the year, ascending")]
    pub months: Vec<u32>,

    #[schemars(description = "Three-letter labels matching `months`")]
    pub month_labels: Vec<String>,

    #[schemars(description = "Column keys: days 1 through 31")]
    pub days: Vec<u32>,

    #[schemars(description = "values[row][col] is the total for months[row], days[col]")]
    pub values: Vec<Vec<f64>>,
}

impl HeatmapMatrix {
    pub fn empty(year: Option<i32>) -> Self {
        Self {
            year,
            months: Vec::new(),
            month_labels: Vec::new(),
            days: (1..=GRID_DAYS).collect(),
            values: Vec::new(),
        }
    }

    pub fn for_year(grid: &[DailyTotal], year: i32) -> Self {
        let mut rows: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for cell in grid.iter().filter(|c| c.year == year) {
            let row = rows
                .entry(cell.month)
                .or_insert_with(|| vec![0.0; GRID_DAYS as usize]);
            if (1..=GRID_DAYS).contains(&cell.day) {
                row[(cell.day - 1) as usize] += cell.value;
            }
        }

        let mut matrix = Self::empty(Some(year));
        for (month, values) in rows {
            matrix.months.push(month);
            matrix
                .month_labels
                .push(month_abbreviation(month).unwrap_or("?").to_string());
            matrix.values.push(values);
        }
        matrix
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn record(y: i32, m: u32, d: u32, value: f64) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        ExpenseRecord {
            vendor: "V".to_string(),
            category: "C".to_string(),
            value,
            invoice_date: date,
            posting_date: date,
            invoice_year: date.year(),
            invoice_month: date.month(),
            invoice_day: date.day(),
            source_line: 0,
        }
    }

    fn cell(grid: &[DailyTotal], y: i32, m: u32, d: u32) -> f64 {
        grid.iter()
            .find(|c| c.year == y && c.month == m && c.day == d)
            .map(|c| c.value)
            .unwrap()
    }

    #[test]
    fn test_daily_sums_and_zero_fill() {
        let records = vec![
            record(2023, 1, 5, 10.0),
            record(2023, 1, 5, 15.0),
            record(2023, 1, 6, -5.0),
        ];
        let grid = densify_heatmap(&records, DensifyMode::GlobalMonths);

        assert_eq!(grid.len(), 31);
        assert_eq!(cell(&grid, 2023, 1, 5), 25.0);
        assert_eq!(cell(&grid, 2023, 1, 6), -5.0);
        assert_eq!(cell(&grid, 2023, 1, 31), 0.0);
    }

    #[test]
    fn test_february_keeps_31_days() {
        let grid = densify_heatmap(&[record(2023, 2, 14, 1.0)], DensifyMode::ObservedPairs);
        assert_eq!(grid.len(), 31);
        assert_eq!(cell(&grid, 2023, 2, 31), 0.0);
    }

    #[test]
    fn test_global_months_cross_every_year() {
        let records = vec![record(2022, 3, 1, 1.0), record(2023, 7, 1, 2.0)];

        let global = densify_heatmap(&records, DensifyMode::GlobalMonths);
        assert_eq!(global.len(), 2 * 2 * 31);
        assert_eq!(cell(&global, 2022, 7, 1), 0.0);
        assert_eq!(cell(&global, 2023, 3, 1), 0.0);

        let observed = densify_heatmap(&records, DensifyMode::ObservedPairs);
        assert_eq!(observed.len(), 2 * 31);
        assert!(!observed.iter().any(|c| c.year == 2022 && c.month == 7));
    }

    #[test]
    fn test_grid_is_ordered() {
        let records = vec![record(2023, 7, 1, 2.0), record(2022, 3, 1, 1.0)];
        let grid = densify_heatmap(&records, DensifyMode::GlobalMonths);
        let keys: Vec<_> = grid.iter().map(|c| (c.year, c.month, c.day)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_empty_records() {
        assert!(densify_heatmap(&[], DensifyMode::GlobalMonths).is_empty());
    }

    #[test]
    fn test_matrix_pivot() {
        let records = vec![
            record(2023, 3, 2, 4.0),
            record(2023, 1, 31, 7.5),
            record(2022, 1, 1, 99.0),
        ];
        let grid = densify_heatmap(&records, DensifyMode::GlobalMonths);
        let matrix = HeatmapMatrix::for_year(&grid, 2023);

        assert_eq!(matrix.year, Some(2023));
        assert_eq!(matrix.months, vec![1, 3]);
        assert_eq!(matrix.month_labels, vec!["Jan", "Mar"]);
        assert_eq!(matrix.days.len(), 31);
        assert_eq!(matrix.values[0][30], 7.5);
        assert_eq!(matrix.values[1][1], 4.0);
        assert_eq!(matrix.total(), 11.5);
    }

    #[test]
    fn test_matrix_for_absent_year_is_empty() {
        let grid = densify_heatmap(&[record(2023, 1, 1, 1.0)], DensifyMode::GlobalMonths);
        let matrix = HeatmapMatrix::for_year(&grid, 1999);
        assert!(matrix.is_empty());
        assert_eq!(matrix.total(), 0.0);
    }
}
