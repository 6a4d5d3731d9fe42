use crate::error::{DashboardError, Result};
use crate::schema::{
    ExpenseRecord, RawRecord, FIELD_INVOICE_DATE, FIELD_POSTING_DATE, REQUIRED_FIELDS,
};
use crate::utils::{distinct_years, parse_amount, parse_day_first_date};
use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads and normalizes an invoice CSV export from disk.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<ExpenseRecord>> {
    let path = path.as_ref();
    debug!("Opening expense file {}", path.display());
    let file = File::open(path)?;
    load_records(file)
}

/// Loads and normalizes invoice rows from any CSV source.
///
/// The header is checked before any row is read, so a file missing one of
/// [`REQUIRED_FIELDS`] fails without partial output. Any row with a bad
/// date or amount fails the whole load.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    validate_headers(&headers)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
        let raw: RawRecord = row.deserialize(Some(&headers))?;
        records.push(normalize_record(raw, line)?);
    }

    info!(
        "Loaded {} expense records covering years {:?}",
        records.len(),
        distinct_years(&records)
    );

    Ok(records)
}

pub fn validate_headers(headers: &StringRecord) -> Result<()> {
    for field in REQUIRED_FIELDS {
        if !headers.iter().any(|h| h == field) {
            return Err(DashboardError::MissingField {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// Parses both dates day-first and derives the invoice year, month and day.
pub fn normalize_record(raw: RawRecord, line: usize) -> Result<ExpenseRecord> {
    let value = parse_amount(&raw.value).ok_or_else(|| DashboardError::InvalidValue {
        line,
        value: raw.value.clone(),
    })?;

    let invoice_date = parse_date_field(&raw.invoice_date, FIELD_INVOICE_DATE, line)?;
    let posting_date = parse_date_field(&raw.posting_date, FIELD_POSTING_DATE, line)?;

    if posting_date < invoice_date {
        warn!(
            "Line {}: posting date {} precedes invoice date {} for vendor '{}'",
            line, posting_date, invoice_date, raw.vendor
        );
    }

    Ok(ExpenseRecord {
        vendor: raw.vendor.trim().to_string(),
        category: raw.category.trim().to_string(),
        value,
        invoice_date,
        posting_date,
        invoice_year: invoice_date.year(),
        invoice_month: invoice_date.month(),
        invoice_day: invoice_date.day(),
        source_line: line,
    })
}

fn parse_date_field(text: &str, field: &str, line: usize) -> Result<NaiveDate> {
    parse_day_first_date(text).ok_or_else(|| DashboardError::InvalidDate {
        line,
        field: field.to_string(),
        value: text.to_string(),
    })
}
